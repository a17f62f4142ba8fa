//! Runs the `lzw` binary on files in a scratch directory.
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn lzw(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lzw"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("run lzw")
}

#[test]
fn encode_in_place_keeps_data() {
    let dir = tempfile::tempdir().expect("tempdir");
    let original = b"hello hello hello hello hello";
    fs::write(dir.path().join("in.txt"), original).unwrap();

    let out = lzw(&["-e", "in.txt", "-o", "in.txt"], dir.path());
    assert!(out.status.success(), "{:?}", out);
    let encoded = fs::read(dir.path().join("in.txt")).unwrap();
    assert!(!encoded.is_empty());
    assert!(encoded.len() < original.len());

    let out = lzw(&["-d", "in.txt", "-o", "in.txt"], dir.path());
    assert!(out.status.success(), "{:?}", out);
    assert_eq!(fs::read(dir.path().join("in.txt")).unwrap(), original);
}

#[test]
fn failed_decode_leaves_output_alone() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("bad.tz"), [0x80, 0x00]).unwrap();
    fs::write(dir.path().join("out.txt"), b"keep me").unwrap();

    let out = lzw(&["-d", "bad.tz", "-o", "out.txt"], dir.path());
    assert!(!out.status.success());
    assert_eq!(fs::read(dir.path().join("out.txt")).unwrap(), b"keep me");
}

#[test]
fn failed_decode_creates_no_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("bad.tz"), [b'a', 0x90]).unwrap();

    let out = lzw(&["-d", "bad.tz", "-o", "fresh.txt"], dir.path());
    assert!(!out.status.success());
    assert!(!dir.path().join("fresh.txt").exists());
}

#[test]
fn failure_reported_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("bad.tz"), [0x80, 0x00]).unwrap();

    let out = lzw(&["-d", "bad.tz"], dir.path());
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.matches("invalid code 0").count(), 1, "{}", stderr);
}

#[test]
fn stdout_is_the_default_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("in.txt"), b"abc").unwrap();

    let out = lzw(&["-e", "in.txt"], dir.path());
    assert!(out.status.success(), "{:?}", out);
    assert_eq!(out.stdout, b"abc");
}
