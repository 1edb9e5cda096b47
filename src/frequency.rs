//! Frequency analysis
//!
//! Counts occurrences of each distinct symbol.  The table remembers the order
//! in which symbols first appeared, and that order is what the tree builder
//! uses to break ties, so the same stream always produces the same codes.

use std::collections::HashMap;
use std::hash::Hash;

/// Occurrence count for every distinct symbol, in first-appearance order.
#[derive(Clone,Debug)]
pub struct FrequencyTable<S> {
    /// (symbol,count) in first-appearance order, counts are never 0
    entries: Vec<(S,u64)>,
    /// map from symbol to its slot in `entries`
    slot: HashMap<S,usize>
}

impl<S: Copy + Eq + Hash> FrequencyTable<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            slot: HashMap::new()
        }
    }
    /// Scan the stream once, an empty stream gives an empty table.
    pub fn analyze<I: IntoIterator<Item=S>>(stream: I) -> Self {
        let mut ans = Self::new();
        for symbol in stream {
            ans.add(symbol,1);
        }
        log::debug!("found {} distinct symbols in {} total",ans.len(),ans.total());
        ans
    }
    /// Build a table from explicit counts, repeated symbols accumulate.
    pub fn from_pairs<I: IntoIterator<Item=(S,u64)>>(pairs: I) -> Self {
        let mut ans = Self::new();
        for (symbol,count) in pairs {
            ans.add(symbol,count);
        }
        ans
    }
    /// Add `count` occurrences of `symbol`, a zero count does nothing.
    pub fn add(&mut self,symbol: S,count: u64) {
        if count == 0 {
            return;
        }
        match self.slot.get(&symbol) {
            Some(&i) => self.entries[i].1 = self.entries[i].1.saturating_add(count),
            None => {
                self.slot.insert(symbol,self.entries.len());
                self.entries.push((symbol,count));
            }
        }
    }
    /// Fold another table into this one by summing counts.
    /// Symbols new to this table are appended in the other table's order.
    pub fn merge(&mut self,other: &FrequencyTable<S>) {
        for (symbol,count) in other.iter() {
            self.add(symbol,count);
        }
    }
    pub fn get(&self,symbol: &S) -> Option<u64> {
        self.slot.get(symbol).map(|&i| self.entries[i].1)
    }
    /// number of distinct symbols
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    /// number of symbols in the stream that was analyzed, saturates at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.checked_total().unwrap_or(u64::MAX)
    }
    /// sum of the counts, or None if it does not fit in a u64
    pub fn checked_total(&self) -> Option<u64> {
        self.entries.iter().try_fold(0u64,|acc,(_,c)| acc.checked_add(*c))
    }
    /// iterate (symbol,count) in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item=(S,u64)> + '_ {
        self.entries.iter().copied()
    }
}

impl<S: Copy + Eq + Hash> Default for FrequencyTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

// *************** TESTS *****************

#[test]
fn counts_in_first_appearance_order() {
    let freq = FrequencyTable::analyze("mississippi".chars());
    let pairs: Vec<(char,u64)> = freq.iter().collect();
    assert_eq!(pairs,vec![('m',1),('i',4),('s',4),('p',2)]);
    assert_eq!(freq.total(),11);
    assert_eq!(freq.get(&'s'),Some(4));
    assert_eq!(freq.get(&'z'),None);
}

#[test]
fn empty_stream_gives_empty_table() {
    let freq = FrequencyTable::analyze(Vec::<u8>::new());
    assert!(freq.is_empty());
    assert_eq!(freq.len(),0);
    assert_eq!(freq.total(),0);
}

#[test]
fn zero_counts_are_ignored() {
    let freq = FrequencyTable::from_pairs([(b'a',0),(b'b',2),(b'a',3)]);
    let pairs: Vec<(u8,u64)> = freq.iter().collect();
    assert_eq!(pairs,vec![(b'b',2),(b'a',3)]);
}

#[test]
fn chunked_counts_merge() {
    let data = "the quick brown fox jumps over the lazy dog".as_bytes();
    let whole = FrequencyTable::analyze(data.iter().copied());
    let mut first = FrequencyTable::analyze(data[0..20].iter().copied());
    let second = FrequencyTable::analyze(data[20..].iter().copied());
    first.merge(&second);
    assert_eq!(first.len(),whole.len());
    for (symbol,count) in whole.iter() {
        assert_eq!(first.get(&symbol),Some(count));
    }
    // merging in the other order gives the same counts
    let mut reversed = FrequencyTable::analyze(data[20..].iter().copied());
    reversed.merge(&FrequencyTable::analyze(data[0..20].iter().copied()));
    for (symbol,count) in whole.iter() {
        assert_eq!(reversed.get(&symbol),Some(count));
    }
}

#[test]
fn total_does_not_overflow() {
    let freq = FrequencyTable::from_pairs([(b'a',u64::MAX),(b'b',1)]);
    assert_eq!(freq.checked_total(),None);
    assert_eq!(freq.total(),u64::MAX);
    let mut freq = FrequencyTable::from_pairs([(b'a',u64::MAX)]);
    freq.add(b'a',1);
    assert_eq!(freq.get(&b'a'),Some(u64::MAX));
}
