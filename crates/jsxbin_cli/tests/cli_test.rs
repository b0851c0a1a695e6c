use std::fs;

use assert_cmd::Command;
use jsxbin_lib::encode::Encoder;
use predicates::prelude::*;
use tempfile::tempdir;

fn labelled_break() -> Vec<u8> {
    let mut e = Encoder::new();
    e.marker(b'D');
    e.length(1).no_node().length(1).define("loop1", 0);
    e.reference(0).bool(true);
    let mut out = b"@JSXBIN@ES@2.0@".to_vec();
    out.extend(e.finish());
    out
}

#[test]
fn decompiles_file_to_stdout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("break.jsxbin");
    fs::write(&path, labelled_break()).unwrap();

    Command::cargo_bin("jsxbin")
        .unwrap()
        .args(["decompile", "file"])
        .arg(&path)
        .assert()
        .success()
        .stdout("loop1:\nbreak loop1;\n");
}

#[test]
fn writes_output_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("break.jsxbin");
    let out = dir.path().join("break.jsx");
    fs::write(&path, labelled_break()).unwrap();

    Command::cargo_bin("jsxbin")
        .unwrap()
        .args(["decompile", "file"])
        .arg(&path)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout("");
    assert_eq!(fs::read_to_string(&out).unwrap(), "loop1:\nbreak loop1;");
}

#[test]
fn tree_mode_prints_ast() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("break.jsxbin");
    fs::write(&path, labelled_break()).unwrap();

    Command::cargo_bin("jsxbin")
        .unwrap()
        .args(["decompile", "file", "--mode", "tree"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("JumpStatement"));
}

#[test]
fn reports_error_with_offset_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.jsxbin");
    let out = dir.path().join("bad.jsx");
    fs::write(&path, b"@JSXBIN@ES@2.0@Vz").unwrap();

    Command::cargo_bin("jsxbin")
        .unwrap()
        .args(["decompile", "file"])
        .arg(&path)
        .arg("-o")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("decompile error: unexpected end of input at offset 2"));
    assert!(!out.exists());
}

#[test]
fn rejects_missing_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plain.jsx");
    fs::write(&path, b"alert(1)").unwrap();

    Command::cargo_bin("jsxbin")
        .unwrap()
        .args(["decompile", "file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSXBIN header"));
}

#[test]
fn decompiles_stdin_with_forced_version() {
    let mut e = Encoder::new();
    e.marker(b'f').bare_line(1).marker(b'F').variant_string("boom");

    Command::cargo_bin("jsxbin")
        .unwrap()
        .args(["decompile", "stdin", "--version", "v1"])
        .write_stdin(e.finish())
        .assert()
        .success()
        .stdout("throw \"boom\";\n");
}
