//! Integration tests for the pipeliner CLI binary.

use std::net::TcpListener;
use std::process::{Command, Output};

fn run_pipeliner(args: &[&str]) -> Output {
  run_pipeliner_with_env(args, &[])
}

/// Run pipeliner with extra env vars. Each pair is (key, value).
fn run_pipeliner_with_env(args: &[&str], env_add: &[(&str, &str)]) -> Output {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_pipeliner"));
  cmd.args(args).env_remove("RUST_LOG");
  for var in [
    "PIPELINER_API_ADDR",
    "PIPELINER_BROADCAST_URL",
    "PIPELINER_POLL_TIME_MS",
    "PIPELINER_REPLY_TIMEOUT_MS",
  ] {
    cmd.env_remove(var);
  }
  for (k, v) in env_add {
    cmd.env(k, v);
  }
  cmd.output().expect("run pipeliner")
}

/// An address nothing listens on.
fn closed_addr() -> String {
  let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
  let addr = listener.local_addr().expect("local addr").to_string();
  drop(listener);
  addr
}

#[test]
fn pipeliner_help_lists_flags_and_env() {
  let out = run_pipeliner(&["--help"]);
  assert!(out.status.success());
  let stdout = String::from_utf8_lossy(&out.stdout);
  assert!(stdout.contains("Usage"), "stdout: {}", stdout);
  assert!(stdout.contains("--api-addr"));
  assert!(stdout.contains("--broadcast-url"));
  assert!(stdout.contains("--poll-time-ms"));
  assert!(stdout.contains("--reply-timeout-ms"));
  assert!(stdout.contains("PIPELINER_API_ADDR"));
}

#[test]
fn pipeliner_rejects_unknown_flag() {
  let out = run_pipeliner(&["--no-such-flag"]);
  assert!(!out.status.success());
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("--no-such-flag"), "stderr: {}", stderr);
}

#[test]
fn pipeliner_exits_1_when_router_unreachable() {
  let addr = closed_addr();
  let out = run_pipeliner(&["--api-addr", &addr]);
  assert_eq!(out.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("Error connecting to router API"), "stderr: {}", stderr);
  assert!(stderr.contains(&addr));
}

#[test]
fn pipeliner_env_overrides_flag() {
  let addr = closed_addr();
  let out = run_pipeliner_with_env(&["--api-addr", "127.0.0.1:1"], &[("PIPELINER_API_ADDR", &addr)]);
  assert_eq!(out.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains(&addr), "stderr: {}", stderr);
}

#[test]
fn pipeliner_exits_1_for_bad_env_number() {
  let out = run_pipeliner_with_env(&[], &[("PIPELINER_POLL_TIME_MS", "soon")]);
  assert_eq!(out.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("Error in configuration"), "stderr: {}", stderr);
  assert!(stderr.contains("PIPELINER_POLL_TIME_MS"));
}
