// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;

pub const SAMPLE_LOG: &str = concat!(
    "192.168.1.1 - - [10/Oct/2023:12:00:00 +0300] \"GET / HTTP/1.1\" 200 1234\n",
    "10.0.0.1 - - [10/Oct/2023:12:00:01 +0300] \"POST /api HTTP/1.1\" 404 5678\n",
    "192.168.1.1 - - [10/Oct/2023:12:00:02 +0300] \"GET /favicon.ico HTTP/1.1\" 200 8910\n",
);

/// Run a binary built from this package with the given arguments
fn run_binary(binary: &str, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(binary)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to start {}: {}", binary, e));

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Run logtally with the given arguments
pub fn run_logtally(args: &[&str]) -> (String, String, i32) {
    run_binary(env!("CARGO_BIN_EXE_logtally"), args)
}

/// Run gen-access-log with the given arguments
pub fn run_generator(args: &[&str]) -> (String, String, i32) {
    run_binary(env!("CARGO_BIN_EXE_gen-access-log"), args)
}

/// Run logtally on a temporary file holding `content`; `--file <tmp>` is appended
pub fn run_logtally_with_file(args: &[&str], content: &str) -> (String, String, i32) {
    let file = create_temp_log(content);
    let mut full_args = args.to_vec();
    full_args.push("--file");
    full_args.push(file.path().to_str().unwrap());
    run_logtally(&full_args)
}

/// Create a temporary log file with the given content
pub fn create_temp_log(content: &str) -> NamedTempFile {
    create_temp_bytes(content.as_bytes())
}

pub fn create_temp_bytes(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content).expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are valid UTF-8")
}
