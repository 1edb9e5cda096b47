//! Code assignment
//!
//! Walks the tree once, appending 0 for each step to a left son and 1 for
//! each step to a right son.  The walk uses an explicit stack so that deep
//! trees cannot exhaust the call stack.

use bit_vec::BitVec;
use std::collections::HashMap;
use std::hash::Hash;
use crate::tree::{HuffmanTree,Node};

/// Map from symbols to their bit strings.
#[derive(Clone,Debug)]
pub struct CodeTable<S> {
    /// symbols in the order the walk reached them, left before right
    order: Vec<S>,
    codes: HashMap<S,BitVec>
}

impl<S: Copy + Eq + Hash> CodeTable<S> {
    /// Assign codes to every leaf.  A single-leaf tree gets an empty code,
    /// the codec knows how to handle that.
    pub fn from_tree(tree: &HuffmanTree<S>) -> Self {
        let mut order = Vec::with_capacity(tree.leaf_count());
        let mut codes = HashMap::with_capacity(tree.leaf_count());
        let mut stack = vec![(tree.root(),BitVec::new())];
        while let Some((idx,prefix)) = stack.pop() {
            match tree.node(idx) {
                Node::Leaf { symbol, .. } => {
                    order.push(*symbol);
                    codes.insert(*symbol,prefix);
                },
                Node::Branch { left, right, .. } => {
                    let mut right_code = prefix.clone();
                    right_code.push(true);
                    let mut left_code = prefix;
                    left_code.push(false);
                    // push right first so the left branch is walked first
                    stack.push((*right,right_code));
                    stack.push((*left,left_code));
                }
            }
        }
        log::debug!("assigned {} codes",order.len());
        Self {
            order,
            codes
        }
    }
    pub fn get(&self,symbol: &S) -> Option<&BitVec> {
        self.codes.get(symbol)
    }
    /// code as a string of '0' and '1'
    pub fn code_string(&self,symbol: &S) -> Option<String> {
        self.codes.get(symbol).map(|code| code.iter().map(|b| if b { '1' } else { '0' }).collect())
    }
    pub fn len(&self) -> usize {
        self.order.len()
    }
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
    /// iterate (symbol,code) in tree order
    pub fn iter(&self) -> impl Iterator<Item=(S,&BitVec)> + '_ {
        self.order.iter().map(move |s| (*s,&self.codes[s]))
    }
}

// *************** TESTS *****************

#[cfg(test)]
fn is_prefix(short: &BitVec,long: &BitVec) -> bool {
    short.len() <= long.len() && short.iter().zip(long.iter()).all(|(a,b)| a==b)
}

#[cfg(test)]
fn assert_prefix_free<S: Copy + Eq + Hash + std::fmt::Debug>(codes: &CodeTable<S>) {
    for (s1,c1) in codes.iter() {
        for (s2,c2) in codes.iter() {
            if s1 != s2 {
                assert!(!is_prefix(c1,c2),"code for {:?} is a prefix of code for {:?}",s1,s2);
            }
        }
    }
}

#[cfg(test)]
fn codes_for(text: &str) -> CodeTable<char> {
    let freq = crate::FrequencyTable::analyze(text.chars());
    CodeTable::from_tree(&HuffmanTree::build(&freq).expect("build failed"))
}

#[test]
fn textbook_codes() {
    let freq = crate::FrequencyTable::from_pairs([('a',5),('b',9),('c',12),('d',13),('e',16),('f',45)]);
    let tree = HuffmanTree::build(&freq).expect("build failed");
    let codes = CodeTable::from_tree(&tree);
    let expected = [('f',"0"),('c',"100"),('d',"101"),('e',"111"),('a',"1100"),('b',"1101")];
    for (symbol,code) in expected {
        assert_eq!(codes.code_string(&symbol).expect("missing code"),code);
    }
    for (symbol,code) in codes.iter() {
        assert!(code.len() <= tree.max_depth());
        assert_eq!(Some(code.len()),tree.depth_of(&symbol));
    }
    let order: Vec<char> = codes.iter().map(|(s,_)| s).collect();
    assert_eq!(order,vec!['f','c','d','a','b','e']);
    assert_prefix_free(&codes);
}

#[test]
fn codes_are_prefix_free() {
    assert_prefix_free(&codes_for("I am Sam. Sam I am. I do not like this Sam I am.\n"));
    assert_prefix_free(&codes_for("ab"));
    assert_prefix_free(&codes_for("abcdefghijklmnopqrstuvwxyz"));
}

#[test]
fn single_leaf_has_empty_code() {
    let codes = codes_for("aaaa");
    assert_eq!(codes.len(),1);
    assert!(codes.get(&'a').expect("missing code").is_empty());
    assert_eq!(codes.code_string(&'a'),Some(String::new()));
    assert_eq!(codes.get(&'b'),None);
}

#[test]
fn two_symbols_get_one_bit() {
    let codes = codes_for("abb");
    assert_eq!(codes.code_string(&'a'),Some("0".to_string()));
    assert_eq!(codes.code_string(&'b'),Some("1".to_string()));
}
