//! Reading symbol streams from files
//!
//! Only plain text is understood.  Documents that need a parser (PDF, DOCX,
//! HTML, ...) are reported as unsupported so a batch can skip them.

use std::path::Path;
use crate::DYNERR;

/// file extensions treated as plain text, compared without regard to case
pub const TEXT_EXTENSIONS: [&str;5] = ["txt","text","md","csv","log"];

/// Read a text file as a byte stream.  Unknown extensions and text that is
/// not valid UTF-8 give `Error::UnsupportedSource`.
pub fn read_source(path: &Path) -> Result<Vec<u8>,DYNERR> {
    let ext = match path.extension() {
        Some(ext) => ext.to_string_lossy().to_lowercase(),
        None => String::new()
    };
    if !TEXT_EXTENSIONS.contains(&ext.as_str()) {
        log::warn!("unsupported file format: {}",path.display());
        return Err(Box::new(crate::Error::UnsupportedSource(path.display().to_string())));
    }
    let dat = std::fs::read(path)?;
    if let Err(e) = std::str::from_utf8(&dat) {
        log::warn!("{} is not valid text: {}",path.display(),e);
        return Err(Box::new(crate::Error::UnsupportedSource(path.display().to_string())));
    }
    log::debug!("read {} bytes from {}",dat.len(),path.display());
    Ok(dat)
}

// *************** TESTS *****************

#[test]
fn reads_text() {
    let temp_dir = tempfile::tempdir().expect("no temp dir");
    let path = temp_dir.path().join("book.TXT");
    std::fs::write(&path,"to be or not to be").expect("write failed");
    assert_eq!(read_source(&path).expect("read failed"),"to be or not to be".as_bytes().to_vec());
}

#[test]
fn rejects_documents() {
    let temp_dir = tempfile::tempdir().expect("no temp dir");
    for name in ["book.pdf","book.docx","page.html","image.jpg","no_extension"] {
        let path = temp_dir.path().join(name);
        std::fs::write(&path,"whatever").expect("write failed");
        let err = read_source(&path).unwrap_err();
        assert!(matches!(err.downcast_ref::<crate::Error>(),Some(crate::Error::UnsupportedSource(_))));
    }
}

#[test]
fn rejects_binary_text() {
    let temp_dir = tempfile::tempdir().expect("no temp dir");
    let path = temp_dir.path().join("binary.txt");
    std::fs::write(&path,[0xff,0xfe,0x00,0x80]).expect("write failed");
    let err = read_source(&path).unwrap_err();
    assert!(matches!(err.downcast_ref::<crate::Error>(),Some(crate::Error::UnsupportedSource(_))));
}

#[test]
fn missing_file_is_io_error() {
    let err = read_source(Path::new("no/such/book.txt")).unwrap_err();
    assert!(err.downcast_ref::<std::io::Error>().is_some());
}
