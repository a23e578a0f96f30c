//! End-to-end runs of the `tally` binary in argument and pipe modes.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn tally() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tally"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run_args(args: &[&str]) -> Output {
    tally().args(args).output().expect("failed to run tally")
}

fn run_piped(args: &[&str], input: &str) -> Output {
    let mut child = tally()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run tally");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for tally")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_argument_success() {
    let output = run_args(&["1 + 2 * 3"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "7\n");
}

#[test]
fn test_argument_python_formatting() {
    assert_eq!(stdout(&run_args(&["sqrt(16)"])), "4.0\n");
    assert_eq!(stdout(&run_args(&["2 ** -1"])), "0.5\n");
    assert_eq!(stdout(&run_args(&["1, 2"])), "(1, 2)\n");
    assert_eq!(stdout(&run_args(&["1,"])), "(1,)\n");
    assert_eq!(stdout(&run_args(&["1e308 * 10"])), "inf\n");
}

#[test]
fn test_leading_minus_is_an_expression() {
    let output = run_args(&["-2 ** 2"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "-4\n");
}

#[test]
fn test_argument_error_exits_nonzero() {
    let output = run_args(&["1 / 0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    let err = stderr(&output);
    assert!(err.contains("division by zero"), "{}", err);
    assert!(err.contains("1 / 0"), "{}", err);
}

#[test]
fn test_disallowed_input_is_reported() {
    let output = run_args(&["__import__('os').system('ls')"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Disallowed expression or node: attribute access"));
}

#[test]
fn test_no_color_output() {
    let output = run_args(&["--no-color", "foo(1)"]);
    let err = stderr(&output);
    assert!(err.contains("Use of function 'foo' is not allowed"));
    assert!(!err.contains('\u{1b}'), "{:?}", err);
}

#[test]
fn test_max_depth_flag() {
    let output = run_args(&["--max-depth", "3", "((((1))))"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("maximum of 3 levels"));

    let output = run_args(&["--max-depth", "10", "((((1))))"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "1\n");
}

#[test]
fn test_debug_parse_prints_tree() {
    let output = run_args(&["--debug-parse", "1 + 2"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("=== Parsed Tree ==="));
    assert!(out.contains("Binary"));
    assert!(out.trim_end().ends_with('3'));
}

#[test]
fn test_pipe_mode_evaluates_each_line() {
    let output = run_piped(&[], "1 + 1\n\n7 // 2\nfactorial(5)\n");
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "2\n3\n120\n");
}

#[test]
fn test_pipe_mode_continues_after_error() {
    let output = run_piped(&[], "sqrt(-1)\n2 + 2\n");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "4\n");
    assert!(stderr(&output).contains("math domain error"));
}
