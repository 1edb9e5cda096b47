//! Encoding and decoding of symbol streams
//!
//! The encoder concatenates codes from a `CodeTable`, the decoder walks the
//! `HuffmanTree` one bit at a time.  Bits are packed MSB first, so the bit
//! count has to travel with the bytes to tell data from padding.
//!
//! A one-symbol alphabet has an empty code.  In that case no bits are written,
//! and the decoder rebuilds the stream from the symbol count alone.

use bit_vec::BitVec;
use std::hash::Hash;
use crate::codes::CodeTable;
use crate::tree::{HuffmanTree,Node};
use crate::Error;

/// Output of the encoder
#[derive(Clone,Debug,PartialEq)]
pub struct EncodedStream {
    bits: BitVec,
    /// number of symbols that were encoded
    symbols: usize
}

impl EncodedStream {
    /// Rebuild from the packed form.  Fails if the buffer length does not
    /// agree with `bit_count`.
    pub fn from_packed(bytes: &[u8],bit_count: usize,symbols: usize) -> Result<Self,Error> {
        if bytes.len() != bit_count.div_ceil(8) {
            log::error!("{} bytes cannot hold exactly {} bits",bytes.len(),bit_count);
            return Err(Error::MalformedStream { bit: bit_count, reason: "bit count does not match buffer" });
        }
        let mut bits = BitVec::from_bytes(bytes);
        bits.truncate(bit_count);
        Ok(Self {
            bits,
            symbols
        })
    }
    /// (bit count,bytes) with the last byte padded with zeros
    pub fn packed(&self) -> (usize,Vec<u8>) {
        (self.bits.len(),self.bits.to_bytes())
    }
    pub fn bits(&self) -> &BitVec {
        &self.bits
    }
    pub fn symbol_count(&self) -> usize {
        self.symbols
    }
    /// Compressed length in bits.  For a one-symbol alphabet this is defined
    /// as the symbol count, even though no bits are stored.
    pub fn bit_len(&self) -> usize {
        match self.bits.is_empty() {
            true => self.symbols,
            false => self.bits.len()
        }
    }
}

/// Concatenate the code of each symbol in stream order.
pub fn encode<S,I>(stream: I,codes: &CodeTable<S>) -> Result<EncodedStream,Error>
where S: Copy + Eq + Hash, I: IntoIterator<Item=S> {
    let mut bits = BitVec::new();
    let mut symbols = 0;
    for symbol in stream {
        match codes.get(&symbol) {
            Some(code) => bits.extend(code.iter()),
            None => {
                log::debug!("no code for symbol {}",symbols);
                return Err(Error::UnknownSymbol { position: symbols });
            }
        }
        symbols += 1;
    }
    log::debug!("encoded {} symbols into {} bits",symbols,bits.len());
    Ok(EncodedStream {
        bits,
        symbols
    })
}

/// Walk the tree for each code until exactly `symbol_count` symbols are
/// produced, consuming every bit.
pub fn decode<S: Copy + Eq + Hash>(tree: &HuffmanTree<S>,encoded: &EncodedStream) -> Result<Vec<S>,Error> {
    // each symbol takes at least one bit, so the count cannot be trusted beyond that
    let mut ans = Vec::with_capacity(encoded.symbols.min(encoded.bits.len().max(1)));
    let root = tree.root();
    if let Node::Leaf { symbol, .. } = tree.node(root) {
        if !encoded.bits.is_empty() {
            return Err(Error::MalformedStream { bit: 0, reason: "bits present for a one-symbol alphabet" });
        }
        ans.resize(encoded.symbols,*symbol);
        return Ok(ans);
    }
    let mut curs = root;
    for (ptr,bit) in encoded.bits.iter().enumerate() {
        if ans.len() == encoded.symbols {
            log::error!("{} bits left over after the last symbol",encoded.bits.len() - ptr);
            return Err(Error::MalformedStream { bit: ptr, reason: "bits left over after the last symbol" });
        }
        curs = match tree.node(curs) {
            Node::Branch { right, .. } if bit => *right,
            Node::Branch { left, .. } => *left,
            Node::Leaf { .. } => unreachable!("cursor is reset at every leaf")
        };
        if let Node::Leaf { symbol, .. } = tree.node(curs) {
            ans.push(*symbol);
            curs = root;
        }
    }
    if curs != root {
        return Err(Error::MalformedStream { bit: encoded.bits.len(), reason: "stream ends inside a code" });
    }
    if ans.len() != encoded.symbols {
        return Err(Error::MalformedStream { bit: encoded.bits.len(), reason: "stream ends before the last symbol" });
    }
    log::debug!("decoded {} symbols",ans.len());
    Ok(ans)
}

// *************** TESTS *****************

#[cfg(test)]
fn pipeline(text: &str) -> (HuffmanTree<u8>,CodeTable<u8>,EncodedStream) {
    let freq = crate::FrequencyTable::analyze(text.bytes());
    let tree = HuffmanTree::build(&freq).expect("build failed");
    let codes = CodeTable::from_tree(&tree);
    let encoded = encode(text.bytes(),&codes).expect("encoding failed");
    (tree,codes,encoded)
}

#[test]
fn encoding_works() {
    // f=0, c=100, d=101, e=111, a=1100, b=1101
    let freq = crate::FrequencyTable::from_pairs([('a',5),('b',9),('c',12),('d',13),('e',16),('f',45)]);
    let codes = CodeTable::from_tree(&HuffmanTree::build(&freq).expect("build failed"));
    let encoded = encode("face".chars(),&codes).expect("encoding failed");
    // 0 1100 100 111 -> 01100100 111
    assert_eq!(encoded.packed(),(11,hex::decode("64E0").unwrap()));
    assert_eq!(encoded.bit_len(),11);
    assert_eq!(encoded.symbol_count(),4);
}

#[test]
fn invertibility() {
    let text = "I am Sam. Sam I am. I do not like this Sam I am.\n";
    let (tree,_,encoded) = pipeline(text);
    assert_eq!(decode(&tree,&encoded).expect("decoding failed"),text.as_bytes().to_vec());
    // through the packed form
    let (bit_count,bytes) = encoded.packed();
    let unpacked = EncodedStream::from_packed(&bytes,bit_count,encoded.symbol_count()).expect("unpack failed");
    assert_eq!(decode(&tree,&unpacked).expect("decoding failed"),text.as_bytes().to_vec());
}

#[test]
fn single_symbol_stream() {
    let (tree,_,encoded) = pipeline("aaaa");
    assert!(encoded.bits().is_empty());
    assert_eq!(encoded.bit_len(),4);
    assert_eq!(decode(&tree,&encoded).expect("decoding failed"),b"aaaa".to_vec());
    let bad = EncodedStream::from_packed(&[0x80],1,4).expect("unpack failed");
    assert!(matches!(decode(&tree,&bad),Err(Error::MalformedStream { .. })));
}

#[test]
fn unknown_symbol() {
    let (_,codes,_) = pipeline("abc");
    assert_eq!(encode("abxc".bytes(),&codes).unwrap_err(),Error::UnknownSymbol { position: 2 });
}

#[test]
fn truncated_stream() {
    // the final 'c' has a 3 bit code
    let text = "abracadabrac";
    let (tree,_,encoded) = pipeline(text);
    let (bit_count,bytes) = encoded.packed();
    // drop the last bit, the walk ends on a branch
    let short = EncodedStream::from_packed(&bytes[0..(bit_count+6)/8],bit_count-1,text.len()).expect("unpack failed");
    assert!(matches!(decode(&tree,&short),Err(Error::MalformedStream { reason: "stream ends inside a code", .. })));
    // claim more symbols than were encoded
    let greedy = EncodedStream::from_packed(&bytes,bit_count,text.len()+1).expect("unpack failed");
    assert!(matches!(decode(&tree,&greedy),Err(Error::MalformedStream { .. })));
}

#[test]
fn leftover_bits() {
    let text = "abracadabra";
    let (tree,_,encoded) = pipeline(text);
    let (bit_count,bytes) = encoded.packed();
    let fewer = EncodedStream::from_packed(&bytes,bit_count,text.len()-1).expect("unpack failed");
    assert!(matches!(decode(&tree,&fewer),Err(Error::MalformedStream { .. })));
}

#[test]
fn packed_length_is_checked() {
    assert!(EncodedStream::from_packed(&[0,0],8,1).is_err());
    assert!(EncodedStream::from_packed(&[0],9,1).is_err());
    assert!(EncodedStream::from_packed(&[],0,0).is_ok());
    assert!(EncodedStream::from_packed(&[0],usize::MAX,1).is_err());
}

#[test]
fn empty_stream_with_a_tree() {
    let (tree,codes,_) = pipeline("ab");
    let encoded = encode(Vec::<u8>::new(),&codes).expect("encoding failed");
    assert_eq!(encoded.bit_len(),0);
    assert_eq!(decode(&tree,&encoded).expect("decoding failed"),Vec::<u8>::new());
}

#[test]
fn huge_symbol_count_is_malformed() {
    let (tree,_,encoded) = pipeline("abracadabra");
    let (bit_count,bytes) = encoded.packed();
    let huge = EncodedStream::from_packed(&bytes,bit_count,usize::MAX/2).expect("unpack failed");
    assert!(matches!(decode(&tree,&huge),Err(Error::MalformedStream { reason: "stream ends before the last symbol", .. })));
}
