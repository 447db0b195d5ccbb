use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_intercom-panel"))
}

fn output_dir() -> &'static Path {
    Path::new("tests/output")
}

fn setup() {
    fs::create_dir_all(output_dir()).expect("Failed to create output directory");
}

fn cleanup_file(name: &str) {
    let path = output_dir().join(name);
    if path.exists() {
        fs::remove_file(&path).ok();
    }
}

fn write_register(dir: &tempfile::TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("register.csv");
    fs::write(&path, content).expect("Failed to write register");
    path
}

#[test]
fn test_basic_register() {
    setup();
    let output_file = "test-basic.pdf";
    cleanup_file(output_file);

    let dir = tempfile::tempdir().unwrap();
    let input = write_register(
        &dir,
        "leilighetsnummer,navn\n\
         A|H0201,Smith\n\
         A|H0202,Jones\n\
         A|H0301,\n\
         A|H0401,Berg\n\
         B|H0101,Lund\n\
         B|H0801,Moe\n",
    );

    let output = cargo_bin()
        .args([
            input.to_str().unwrap(),
            &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Generated"), "Unexpected stdout: {stdout}");

    let path = output_dir().join(output_file);
    assert!(path.exists(), "PDF file was not created");

    let metadata = fs::metadata(&path).expect("Failed to get file metadata");
    assert!(metadata.len() > 1000, "PDF file is too small, likely empty or corrupt");
}

#[test]
fn test_semicolon_register() {
    setup();
    let output_file = "test-semicolon.pdf";
    cleanup_file(output_file);

    let dir = tempfile::tempdir().unwrap();
    let input = write_register(
        &dir,
        "leilighetsnummer;navn\nE|H0201;Hansen\nE|H0202;Olsen\n",
    );

    let output = cargo_bin()
        .args([
            input.to_str().unwrap(),
            &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    let path = output_dir().join(output_file);
    assert!(path.exists(), "PDF file was not created");

    let metadata = fs::metadata(&path).expect("Failed to get file metadata");
    assert!(metadata.len() > 1000, "PDF file is too small");
}

#[test]
fn test_header_only_register_writes_placeholder() {
    setup();
    let output_file = "test-placeholder.pdf";
    cleanup_file(output_file);

    let dir = tempfile::tempdir().unwrap();
    let input = write_register(&dir, "leilighetsnummer,navn\n");

    let output = cargo_bin()
        .args([
            input.to_str().unwrap(),
            &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    let path = output_dir().join(output_file);
    assert!(path.exists(), "Placeholder PDF was not created");

    let metadata = fs::metadata(&path).expect("Failed to get file metadata");
    assert!(metadata.len() > 500, "Placeholder PDF is too small");
}

#[test]
fn test_wrong_argument_count_exits_2() {
    let output = cargo_bin().output().expect("Failed to execute command");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));

    let output = cargo_bin()
        .args(["only-one-arg.csv"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_malformed_identifier_fails_run() {
    setup();
    let output_file = "should-not-exist.pdf";
    cleanup_file(output_file);

    let dir = tempfile::tempdir().unwrap();
    let input = write_register(&dir, "leilighetsnummer,navn\nA|H0101,Berg\nbogus,Who\n");

    let output = cargo_bin()
        .args([
            input.to_str().unwrap(),
            &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for malformed id");
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid section id"), "Unexpected stderr: {stderr}");

    assert!(
        !output_dir().join(output_file).exists(),
        "No PDF should be written for a malformed register"
    );
}

#[test]
fn test_missing_input_file_fails() {
    let output = cargo_bin()
        .args(["nonexistent.csv", "tests/output/should-not-exist-2.pdf"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for missing input");
    assert_eq!(output.status.code(), Some(1));
}
