use std::process::Command;

fn run_jsh(command: &str) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_jsh"))
        .args(["-c", command])
        .output()
        .expect("failed to execute jsh")
}

#[test]
fn two_stage_pipeline_passes_bytes_through() {
    let output = run_jsh("echo hello | cat");
    assert!(output.status.success(), "command failed: {:?}", output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hello\n");
}

#[test]
fn quoted_pipe_is_literal() {
    let output = run_jsh(r#"echo "a | b" | cat"#);
    assert!(output.status.success(), "command failed: {:?}", output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "a | b\n");
}

#[test]
fn sixteen_stage_pipeline_preserves_the_stream() {
    let cmd = format!("echo pipeline{}", " | cat".repeat(15));
    let output = run_jsh(&cmd);
    assert!(output.status.success(), "command failed: {:?}", output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "pipeline\n");
}

#[test]
fn empty_arguments_reach_the_command() {
    let output = run_jsh(r#"printf [%s] a "" b"#);
    assert!(output.status.success(), "command failed: {:?}", output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "[a][][b]");
}

#[test]
fn pipeline_status_comes_from_the_last_stage() {
    let output = run_jsh("false | true");
    assert!(output.status.success(), "expected success: {:?}", output);

    let output = run_jsh("true | false");
    assert!(!output.status.success(), "expected failure: {:?}", output);
}

#[test]
fn unknown_command_is_reported_by_the_child() {
    let output = run_jsh("jsh_no_such_cmd_zz");
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("jsh_no_such_cmd_zz: command not found"),
        "unexpected stdout: {stdout}"
    );
}

#[test]
fn leading_pipe_is_a_syntax_error() {
    let output = run_jsh("| cat");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid command syntax"));
}

#[test]
fn exit_code_propagates() {
    let output = run_jsh("exit 3");
    assert_eq!(output.status.code(), Some(3));

    let output = run_jsh("sh -c \"exit 7\"");
    assert_eq!(output.status.code(), Some(7));
}
