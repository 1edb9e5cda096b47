//! Compression ratio and the size report printed by `analyze`.

use std::fmt;
use std::hash::Hash;
use crate::{FrequencyTable,HuffmanTree,CodeTable,codec,Error};

/// every input symbol is assumed to occupy one byte before compression
pub const SYMBOL_BITS: usize = 8;

/// `symbols*8 / compressed_bits`, or infinity if nothing was produced.
pub fn compression_ratio(symbols: usize,compressed_bits: usize) -> f64 {
    if compressed_bits == 0 {
        return f64::INFINITY;
    }
    (symbols * SYMBOL_BITS) as f64 / compressed_bits as f64
}

/// Sizes before and after coding
#[derive(Clone,Debug,PartialEq)]
pub struct Report {
    /// number of symbols in the original stream
    pub original_symbols: usize,
    pub compressed_bits: usize,
    pub ratio: f64
}

impl Report {
    pub fn new(original_symbols: usize,compressed_bits: usize) -> Self {
        Self {
            original_symbols,
            compressed_bits,
            ratio: compression_ratio(original_symbols,compressed_bits)
        }
    }
    /// Run the whole pipeline on a stream that can be traversed twice.
    pub fn analyze<S,I>(stream: I) -> Result<Self,Error>
    where S: Copy + Eq + Hash, I: IntoIterator<Item=S> + Clone {
        let freq = FrequencyTable::analyze(stream.clone());
        let tree = HuffmanTree::build(&freq)?;
        let codes = CodeTable::from_tree(&tree);
        let encoded = codec::encode(stream,&codes)?;
        Ok(Self::new(encoded.symbol_count(),encoded.bit_len()))
    }
}

impl fmt::Display for Report {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f,"Original size: {} symbols",self.original_symbols)?;
        writeln!(f,"Compressed size: {} bits",self.compressed_bits)?;
        write!(f,"Compression Ratio: {:.2}",self.ratio)
    }
}

// *************** TESTS *****************

#[test]
fn ratio_works() {
    let ratio = compression_ratio(100,300);
    assert!((ratio - 800.0/300.0).abs() < 1e-12);
    assert_eq!(format!("{:.2}",ratio),"2.67");
    assert_eq!(compression_ratio(0,0),f64::INFINITY);
    assert_eq!(compression_ratio(4,4),8.0);
}

#[test]
fn report_works() {
    // 45*1 + (12+13+16)*3 + (5+9)*4 = 224
    let mut text = String::new();
    for (c,n) in [('a',5),('b',9),('c',12),('d',13),('e',16),('f',45)] {
        text.push_str(&c.to_string().repeat(n));
    }
    let report = Report::analyze(text.chars()).expect("analysis failed");
    assert_eq!(report.original_symbols,100);
    assert_eq!(report.compressed_bits,224);
    assert_eq!(report.to_string(),"Original size: 100 symbols\nCompressed size: 224 bits\nCompression Ratio: 3.57");
}

#[test]
fn single_symbol_report() {
    let report = Report::analyze("aaaa".bytes()).expect("analysis failed");
    assert_eq!(report,Report::new(4,4));
    assert_eq!(report.ratio,8.0);
}

#[test]
fn empty_report_is_an_error() {
    assert_eq!(Report::analyze("".bytes()).unwrap_err(),Error::EmptyInput);
}
