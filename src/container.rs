//! Huffman container format
//!
//! The frequency table is stored instead of the tree.  Since tree building is
//! deterministic, the expander rebuilds exactly the tree the compressor used.
//!
//! * everything is little endian
//! * the symbols are bytes, so there are at most 256 table entries
//!
//! | field | size |
//! |-------|------|
//! | magic `HUF` + version | 4 |
//! | symbol count | 8 |
//! | table entries `k` | 2 |
//! | (symbol,frequency) | `k` × 9 |
//! | bit count | 8 |
//! | packed bits | ⌈bit count / 8⌉ |

use std::io::{Cursor,Read,Write,Seek,SeekFrom,BufReader,BufWriter};
use crate::{FrequencyTable,HuffmanTree,CodeTable,EncodedStream,codec};
use crate::DYNERR;

const MAGIC: [u8;4] = [b'H',b'U',b'F',1];

/// Options controlling compression
#[derive(Clone)]
pub struct Options {
    /// starting position in the input file
    pub in_offset: u64,
    /// starting position in the output file
    pub out_offset: u64,
    /// return error if file is larger
    pub max_file_size: u64
}

pub const STD_OPTIONS: Options = Options {
    in_offset: 0,
    out_offset: 0,
    max_file_size: u32::MAX as u64
};

fn read_u64<R: Read>(reader: &mut R) -> Result<u64,std::io::Error> {
    let mut buf: [u8;8] = [0;8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Seek to the end to get the length after `in_offset`, then rewind to `in_offset`.
fn measure<R: Read + Seek>(reader: &mut R,opt: &Options) -> Result<u64,DYNERR> {
    let mut len = reader.seek(SeekFrom::End(0))?;
    if opt.in_offset > len {
        return Err(Box::new(crate::Error::FileFormatMismatch));
    }
    len -= opt.in_offset;
    if len > opt.max_file_size {
        return Err(Box::new(crate::Error::FileTooLarge));
    }
    reader.seek(SeekFrom::Start(opt.in_offset))?;
    Ok(len)
}

/// Main compression function.
/// `expanded_in` is an object with `Read` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `compressed_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.  Empty input is an error, there is no tree to store.
pub fn compress<R,W>(expanded_in: &mut R, compressed_out: &mut W, opt: &Options) -> Result<(u64,u64),DYNERR>
where R: Read + Seek, W: Write + Seek {
    let expanded_length = measure(expanded_in,opt)?;
    let mut ibuf = Vec::new();
    BufReader::new(expanded_in).read_to_end(&mut ibuf)?;
    log::debug!("read {} bytes",ibuf.len());

    let freq = FrequencyTable::analyze(ibuf.iter().copied());
    let tree = HuffmanTree::build(&freq)?;
    let codes = CodeTable::from_tree(&tree);
    let encoded = codec::encode(ibuf.iter().copied(),&codes)?;
    let (bit_count,bytes) = encoded.packed();

    let mut writer = BufWriter::new(compressed_out);
    writer.seek(SeekFrom::Start(opt.out_offset))?;
    writer.write_all(&MAGIC)?;
    writer.write_all(&u64::to_le_bytes(ibuf.len() as u64))?;
    writer.write_all(&u16::to_le_bytes(freq.len() as u16))?;
    for (symbol,count) in freq.iter() {
        writer.write_all(&[symbol])?;
        writer.write_all(&u64::to_le_bytes(count))?;
    }
    writer.write_all(&u64::to_le_bytes(bit_count as u64))?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    log::debug!("{} table entries, {} bits of data",freq.len(),bit_count);
    Ok((expanded_length,writer.stream_position()? - opt.out_offset))
}

/// Main decompression function.
/// `compressed_in` is an object with `Read` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `expanded_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.
pub fn expand<R,W>(compressed_in: &mut R, expanded_out: &mut W, opt: &Options) -> Result<(u64,u64),DYNERR>
where R: Read + Seek, W: Write + Seek {
    let compressed_size = measure(compressed_in,opt)?;
    let mut reader = BufReader::new(compressed_in);
    let mut magic: [u8;4] = [0;4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        log::error!("bad signature {}",String::from_utf8_lossy(&magic));
        return Err(Box::new(crate::Error::FileFormatMismatch));
    }
    let symbols = read_u64(&mut reader)?;
    if symbols > opt.max_file_size {
        log::error!("header claims {} symbols",symbols);
        return Err(Box::new(crate::Error::FileTooLarge));
    }
    let mut entries: [u8;2] = [0;2];
    reader.read_exact(&mut entries)?;
    let entries = u16::from_le_bytes(entries);
    if entries == 0 || entries > 256 {
        log::error!("table cannot have {} entries",entries);
        return Err(Box::new(crate::Error::FileFormatMismatch));
    }
    let mut freq = FrequencyTable::new();
    for _i in 0..entries {
        let mut symbol: [u8;1] = [0];
        reader.read_exact(&mut symbol)?;
        let count = read_u64(&mut reader)?;
        if count == 0 || freq.get(&symbol[0]).is_some() {
            log::error!("bad table entry for symbol {}",symbol[0]);
            return Err(Box::new(crate::Error::FileFormatMismatch));
        }
        freq.add(symbol[0],count);
    }
    match freq.checked_total() {
        Some(total) if total == symbols => {},
        Some(total) => {
            log::error!("table accounts for {} symbols, header says {}",total,symbols);
            return Err(Box::new(crate::Error::FileFormatMismatch));
        },
        None => {
            log::error!("table counts overflow");
            return Err(Box::new(crate::Error::FileFormatMismatch));
        }
    }
    let bit_count = read_u64(&mut reader)?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    log::debug!("{} table entries, {} bits of data",entries,bit_count);
    if bit_count > bytes.len() as u64 * 8 {
        log::error!("{} bits do not fit in {} bytes",bit_count,bytes.len());
        return Err(Box::new(crate::Error::FileFormatMismatch));
    }

    let tree = HuffmanTree::build(&freq)?;
    // with two or more symbols every code is at least one bit
    if !tree.is_degenerate() && symbols > bit_count {
        log::error!("{} bits cannot hold {} symbols",bit_count,symbols);
        return Err(Box::new(crate::Error::FileFormatMismatch));
    }
    let encoded = EncodedStream::from_packed(&bytes,bit_count as usize,symbols as usize)?;
    let ans = codec::decode(&tree,&encoded)?;

    let mut writer = BufWriter::new(expanded_out);
    writer.seek(SeekFrom::Start(opt.out_offset))?;
    writer.write_all(&ans)?;
    writer.flush()?;
    Ok((compressed_size,writer.stream_position()? - opt.out_offset))
}

/// Convenience function, calls `compress` with a slice returning a Vec
pub fn compress_slice(slice: &[u8],opt: &Options) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    compress(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

/// Convenience function, calls `expand` with a slice returning a Vec
pub fn expand_slice(slice: &[u8],opt: &Options) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    expand(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

// *************** TESTS *****************

#[test]
fn compression_works() {
    // table is a:2, b:1, the lighter b is pulled first and becomes the left son,
    // so a=1 and b=0 and the data is 110
    let test_data = "aab".as_bytes();
    let huf_str = "48 55 46 01 03 00 00 00 00 00 00 00 02 00 61 02 00 00 00 00 00 00 00 62 01 00 00 00 00 00 00 00 03 00 00 00 00 00 00 00 C0";
    let compressed = compress_slice(test_data,&STD_OPTIONS).expect("compression failed");
    assert_eq!(compressed,hex::decode(huf_str.replace(" ","")).unwrap());
}

#[test]
fn single_symbol_has_no_data() {
    let compressed = compress_slice("aaaa".as_bytes(),&STD_OPTIONS).expect("compression failed");
    // magic, count, entries, one table entry, zero bit count
    assert_eq!(compressed.len(),4+8+2+9+8);
    let expanded = expand_slice(&compressed,&STD_OPTIONS).expect("expansion failed");
    assert_eq!(expanded,"aaaa".as_bytes().to_vec());
}

#[test]
fn invertibility() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let compressed = compress_slice(test_data,&STD_OPTIONS).expect("compression failed");
    let expanded = expand_slice(&compressed,&STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);

    let test_data: Vec<u8> = (0..=255).chain(0..128).collect();
    let compressed = compress_slice(&test_data,&STD_OPTIONS).expect("compression failed");
    let expanded = expand_slice(&compressed,&STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data,expanded);
}

#[test]
fn empty_input_is_an_error() {
    let err = compress_slice(&[],&STD_OPTIONS).unwrap_err();
    assert_eq!(err.downcast_ref::<crate::Error>(),Some(&crate::Error::EmptyInput));
}

#[test]
fn bad_signature() {
    let mut compressed = compress_slice("abc".as_bytes(),&STD_OPTIONS).expect("compression failed");
    compressed[0] = b'X';
    let err = expand_slice(&compressed,&STD_OPTIONS).unwrap_err();
    assert_eq!(err.downcast_ref::<crate::Error>(),Some(&crate::Error::FileFormatMismatch));
}

#[test]
fn truncated_data() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let compressed = compress_slice(test_data,&STD_OPTIONS).expect("compression failed");
    let err = expand_slice(&compressed[0..compressed.len()-1],&STD_OPTIONS).unwrap_err();
    assert!(matches!(err.downcast_ref::<crate::Error>(),Some(crate::Error::MalformedStream { .. })));
}

#[test]
fn offsets_and_size_limit() {
    let mut opt = STD_OPTIONS;
    opt.in_offset = 3;
    let compressed = compress_slice("xyzhello".as_bytes(),&opt).expect("compression failed");
    let expanded = expand_slice(&compressed,&STD_OPTIONS).expect("expansion failed");
    assert_eq!(expanded,"hello".as_bytes().to_vec());

    opt.in_offset = 0;
    opt.max_file_size = 4;
    let err = compress_slice("hello".as_bytes(),&opt).unwrap_err();
    assert_eq!(err.downcast_ref::<crate::Error>(),Some(&crate::Error::FileTooLarge));
}

#[cfg(test)]
fn container(symbols: u64,entries: u16,table: &[(u8,u64)],bit_count: u64,dat: &[u8]) -> Vec<u8> {
    let mut ans = MAGIC.to_vec();
    ans.extend_from_slice(&u64::to_le_bytes(symbols));
    ans.extend_from_slice(&u16::to_le_bytes(entries));
    for (symbol,count) in table {
        ans.push(*symbol);
        ans.extend_from_slice(&u64::to_le_bytes(*count));
    }
    ans.extend_from_slice(&u64::to_le_bytes(bit_count));
    ans.extend_from_slice(dat);
    ans
}

#[cfg(test)]
fn expand_error(compressed: &[u8]) -> crate::Error {
    let err = expand_slice(compressed,&STD_OPTIONS).unwrap_err();
    match err.downcast_ref::<crate::Error>() {
        Some(e) => e.clone(),
        None => panic!("expected a crate error, got {}",err)
    }
}

#[test]
fn hand_built_container() {
    // same bytes the compressor makes for "aab"
    let compressed = container(3,2,&[(b'a',2),(b'b',1)],3,&[0xC0]);
    assert_eq!(expand_slice(&compressed,&STD_OPTIONS).expect("expansion failed"),"aab".as_bytes().to_vec());
}

#[test]
fn no_table_entries() {
    assert_eq!(expand_error(&container(0,0,&[],0,&[])),crate::Error::FileFormatMismatch);
}

#[test]
fn too_many_table_entries() {
    assert_eq!(expand_error(&container(1,257,&[(b'a',1)],0,&[])),crate::Error::FileFormatMismatch);
}

#[test]
fn duplicate_table_symbol() {
    assert_eq!(expand_error(&container(2,2,&[(b'a',1),(b'a',1)],2,&[0x40])),crate::Error::FileFormatMismatch);
}

#[test]
fn zero_table_count() {
    assert_eq!(expand_error(&container(2,2,&[(b'a',0),(b'b',2)],2,&[0xC0])),crate::Error::FileFormatMismatch);
}

#[test]
fn table_disagrees_with_symbol_count() {
    assert_eq!(expand_error(&container(4,2,&[(b'a',2),(b'b',1)],3,&[0xC0])),crate::Error::FileFormatMismatch);
}

#[test]
fn table_counts_overflow() {
    assert_eq!(expand_error(&container(5,2,&[(b'a',u64::MAX),(b'b',1)],3,&[0xC0])),crate::Error::FileFormatMismatch);
}

#[test]
fn huge_symbol_count() {
    // one symbol repeated 2^60 times would need no data bits at all
    let compressed = container(1 << 60,1,&[(b'a',1 << 60)],0,&[]);
    assert_eq!(expand_error(&compressed),crate::Error::FileTooLarge);
}

#[test]
fn bit_count_larger_than_data() {
    assert_eq!(expand_error(&container(3,2,&[(b'a',2),(b'b',1)],u64::MAX,&[0xC0])),crate::Error::FileFormatMismatch);
    assert_eq!(expand_error(&container(3,2,&[(b'a',2),(b'b',1)],9,&[0xC0])),crate::Error::FileFormatMismatch);
}

#[test]
fn too_few_bits_for_symbol_count() {
    // symbol count passes the size limit but two bits cannot hold three symbols
    assert_eq!(expand_error(&container(3,2,&[(b'a',2),(b'b',1)],2,&[0xC0])),crate::Error::FileFormatMismatch);
}
