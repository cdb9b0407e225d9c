//! Exit status of `teikoku stage`

use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn stage(config: &Path, files: &[&Path]) -> Output {
    let bin_path = env!("CARGO_BIN_EXE_teikoku");
    Command::new(bin_path)
        .arg("--config")
        .arg(config)
        .arg("stage")
        .args(files)
        .output()
        .expect("run teikoku stage")
}

#[test]
fn stage_existing_file_succeeds() {
    let dir = tempdir().expect("temp dir");
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, b"hello").expect("write file");

    let output = stage(&dir.path().join("config.toml"), &[&file]);
    assert!(output.status.success(), "stage failed: {output:?}");
}

#[test]
fn stage_fails_when_no_file_can_be_staged() {
    let dir = tempdir().expect("temp dir");
    let missing = dir.path().join("missing.txt");

    let output = stage(&dir.path().join("config.toml"), &[&missing]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not be staged"), "stderr: {stderr}");
}

#[test]
fn stage_fails_when_some_files_cannot_be_staged() {
    let dir = tempdir().expect("temp dir");
    let file = dir.path().join("notes.txt");
    let missing = dir.path().join("missing.txt");
    std::fs::write(&file, b"hello").expect("write file");

    let output = stage(&dir.path().join("config.toml"), &[&file, &missing]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(std::fs::read(&file).expect("read file"), b"hello");
}
