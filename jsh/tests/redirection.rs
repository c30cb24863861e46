use std::fs;
use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;

fn run_jsh(command: &str) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_jsh"))
        .args(["-c", command])
        .output()
        .expect("failed to execute jsh")
}

#[test]
fn input_redirect_feeds_command() {
    let mut input = NamedTempFile::new().expect("create temp input");
    writeln!(input, "hello").unwrap();
    writeln!(input, "world").unwrap();

    let cmd = format!("cat < {}", input.path().display());
    let output = run_jsh(&cmd);

    assert!(output.status.success(), "command failed: {:?}", output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hello\nworld\n");
}

#[test]
fn input_redirect_missing_file_returns_error() {
    let missing_path = std::env::temp_dir().join("jsh_missing_input_test.txt");
    if missing_path.exists() {
        fs::remove_file(&missing_path).ok();
    }
    let cmd = format!("cat < {}", missing_path.display());
    let output = run_jsh(&cmd);

    assert!(
        !output.status.success(),
        "command unexpectedly succeeded: {:?}",
        output
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No such file or directory"),
        "stderr did not report missing file: {stderr}"
    );
}

#[test]
fn output_redirect_writes_file() {
    let output_file = NamedTempFile::new().expect("create temp output");
    let path = output_file.path().to_path_buf();
    drop(output_file);

    let cmd = format!("printf sample > {}", path.display());
    let output = run_jsh(&cmd);
    assert!(output.status.success(), "command failed: {:?}", output);

    let written = fs::read_to_string(&path).expect("read redirected output");
    assert_eq!(written, "sample");
    fs::remove_file(path).ok();
}

#[test]
fn output_redirect_truncates_previous_contents() {
    let mut output_file = NamedTempFile::new().expect("create temp output");
    writeln!(output_file, "previous contents that are longer").unwrap();
    let path = output_file.path().to_path_buf();

    let cmd = format!("printf short > {}", path.display());
    let output = run_jsh(&cmd);
    assert!(output.status.success(), "command failed: {:?}", output);

    assert_eq!(fs::read_to_string(&path).unwrap(), "short");
}

#[test]
fn append_redirect_preserves_previous_contents() {
    let mut output_file = NamedTempFile::new().expect("create temp output");
    write!(output_file, "first ").unwrap();
    output_file.flush().unwrap();
    let path = output_file.path().to_path_buf();

    let cmd = format!("printf second >> {}", path.display());
    let output = run_jsh(&cmd);
    assert!(output.status.success(), "command failed: {:?}", output);

    assert_eq!(fs::read_to_string(&path).unwrap(), "first second");
}

#[test]
fn stderr_redirect_captures_diagnostics() {
    let err_file = NamedTempFile::new().expect("create temp stderr file");
    let path = err_file.path().to_path_buf();
    drop(err_file);

    let cmd = format!(r#"sh -c "echo oops 1>&2" e> {}"#, path.display());
    let output = run_jsh(&cmd);
    assert!(output.status.success(), "command failed: {:?}", output);

    assert_eq!(fs::read_to_string(&path).unwrap(), "oops\n");
    assert!(output.stderr.is_empty(), "stderr leaked: {:?}", output.stderr);
    fs::remove_file(path).ok();
}

#[test]
fn duplicate_redirections_are_a_syntax_error() {
    let output = run_jsh("cat < a < b");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid command syntax"),
        "unexpected stderr: {stderr}"
    );
}
