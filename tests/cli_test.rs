use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command; // Run programs
use tempfile;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const HAMLET: &str = "Who's there?
Nay, answer me: stand, and unfold yourself.
Long live the king!
Bernardo?
He.
You come most carefully upon your hour.
'Tis now struck twelve; get thee to bed, Francisco.
For this relief much thanks: 'tis bitter cold,
And I am sick at heart.
";

// Write `dat` into the temporary directory under the given name.
fn put_file(temp_dir: &tempfile::TempDir,name: &str,dat: &[u8]) -> Result<PathBuf,Box<dyn std::error::Error>> {
    let path = temp_dir.path().join(name);
    std::fs::write(&path,dat)?;
    Ok(path)
}

#[test]
fn compress_then_expand() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = put_file(&temp_dir,"hamlet.txt",HAMLET.as_bytes())?;
    let huf_path = temp_dir.path().join("hamlet.huf");
    let out_path = temp_dir.path().join("hamlet_expanded.txt");
    Command::cargo_bin("huffcompressor")?
        .arg("compress")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&huf_path)
        .assert()
        .success()
        .stderr(predicate::str::contains(format!("compressed {} into",HAMLET.len())));
    let compressed = std::fs::read(&huf_path)?;
    assert_eq!(&compressed[0..4],&[b'H',b'U',b'F',1]);
    Command::cargo_bin("huffcompressor")?
        .arg("expand")
        .arg("-i").arg(&huf_path)
        .arg("-o").arg(&out_path)
        .assert()
        .success();
    assert_eq!(std::fs::read(&out_path)?,HAMLET.as_bytes().to_vec());
    Ok(())
}

#[test]
fn expand_rejects_garbage() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = put_file(&temp_dir,"garbage.huf","not a huffman file".as_bytes())?;
    let out_path = temp_dir.path().join("garbage.txt");
    Command::cargo_bin("huffcompressor")?
        .arg("expand")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&out_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("FileFormatMismatch"));
    Ok(())
}

#[test]
fn compress_rejects_empty_file() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = put_file(&temp_dir,"empty.txt",&[])?;
    let out_path = temp_dir.path().join("empty.huf");
    Command::cargo_bin("huffcompressor")?
        .arg("compress")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&out_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("EmptyInput"));
    Ok(())
}

#[test]
fn analyze_reports_ratio() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = put_file(&temp_dir,"single.txt","aaaa".as_bytes())?;
    Command::cargo_bin("huffcompressor")?
        .arg("analyze")
        .arg(&in_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Original size: 4 symbols"))
        .stdout(predicate::str::contains("Compressed size: 4 bits"))
        .stdout(predicate::str::contains("Compression Ratio: 8.00"));
    Ok(())
}

#[test]
fn analyze_counts_bytes() -> STDRESULT {
    // three 2-byte characters are six byte symbols, two distinct
    let temp_dir = tempfile::tempdir()?;
    let in_path = put_file(&temp_dir,"accents.txt","ééé".as_bytes())?;
    Command::cargo_bin("huffcompressor")?
        .arg("analyze")
        .arg(&in_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Original size: 6 symbols"))
        .stdout(predicate::str::contains("Compressed size: 6 bits"));
    Ok(())
}

#[test]
fn analyze_skips_bad_inputs() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let pdf = put_file(&temp_dir,"book.pdf","%PDF-1.4".as_bytes())?;
    let empty = put_file(&temp_dir,"empty.txt",&[])?;
    let good = put_file(&temp_dir,"hamlet.txt",HAMLET.as_bytes())?;
    let missing = temp_dir.path().join("missing.txt");
    Command::cargo_bin("huffcompressor")?
        .arg("analyze")
        .arg(&pdf)
        .arg(&empty)
        .arg(&missing)
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("unsupported source"))
        .stdout(predicate::str::contains("no symbols to build a tree from"))
        .stdout(predicate::str::contains(format!("Original size: {} symbols",HAMLET.len())))
        .stdout(predicate::str::contains("skipping").count(3));
    Ok(())
}
