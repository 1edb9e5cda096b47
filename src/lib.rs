//! # Huffman Compressor
//!
//! Static (two-pass) Huffman prefix coding.  The pipeline is
//!
//! `stream` → [`frequency`] → [`tree`] → [`codes`] → [`codec`] → [`ratio`]
//!
//! with [`codec::decode`] as the inverse path that takes the tree and the bits.
//! The [`container`] module wraps all of this into a file format, and [`source`]
//! turns files on disk into symbol streams.
//!
//! ```
//! use huffcompressor::{FrequencyTable,HuffmanTree,CodeTable,codec};
//! let text = "abracadabra".as_bytes();
//! let freq = FrequencyTable::analyze(text.iter().copied());
//! let tree = HuffmanTree::build(&freq).expect("empty input");
//! let codes = CodeTable::from_tree(&tree);
//! let encoded = codec::encode(text.iter().copied(),&codes).expect("unknown symbol");
//! assert_eq!(codec::decode(&tree,&encoded).expect("malformed"),text.to_vec());
//! ```

pub mod frequency;
pub mod tree;
pub mod codes;
pub mod codec;
pub mod ratio;
pub mod container;
pub mod source;

pub use frequency::FrequencyTable;
pub use tree::HuffmanTree;
pub use codes::CodeTable;
pub use codec::EncodedStream;
pub use ratio::Report;

type DYNERR = Box<dyn std::error::Error>;

/// Compression Errors
#[derive(thiserror::Error,Debug,Clone,PartialEq)]
pub enum Error {
    #[error("no symbols to build a tree from")]
    EmptyInput,
    #[error("symbol counts do not fit in 64 bits")]
    CountOverflow,
    #[error("symbol at position {position} has no code")]
    UnknownSymbol { position: usize },
    #[error("malformed stream at bit {bit}: {reason}")]
    MalformedStream { bit: usize, reason: &'static str },
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),
    #[error("file format mismatch")]
    FileFormatMismatch,
    #[error("file too large")]
    FileTooLarge
}

// *************** TESTS *****************

#[cfg(test)]
fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn engine_types_are_shareable() {
    assert_send_sync::<HuffmanTree<u8>>();
    assert_send_sync::<HuffmanTree<char>>();
    assert_send_sync::<CodeTable<u8>>();
    assert_send_sync::<CodeTable<char>>();
    assert_send_sync::<EncodedStream>();
    assert_send_sync::<FrequencyTable<u8>>();
    assert_send_sync::<Error>();
}

#[test]
fn decode_on_several_threads() {
    let text = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let tree = HuffmanTree::build(&FrequencyTable::analyze(text.iter().copied())).expect("build failed");
    let codes = CodeTable::from_tree(&tree);
    let encoded = codec::encode(text.iter().copied(),&codes).expect("encoding failed");
    let (tree,encoded) = (&tree,&encoded);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(move || codec::decode(tree,encoded))).collect();
        for handle in handles {
            assert_eq!(handle.join().expect("thread panicked").expect("decoding failed"),text.to_vec());
        }
    });
}
