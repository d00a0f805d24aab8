//! Runs the built relay binary over real stdio.
#![cfg(unix)]

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

/// stdout carries only bus traffic; logs go to stderr and the configured log file.
#[test]
fn test_logs_stay_off_the_bus_output() {
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("relay.log");

    let mut child = Command::new(env!("CARGO_BIN_EXE_order-relay"))
        .current_dir(dir.path())
        .env("RUST_LOG", "info")
        .env("RELAY_PREP_MIN_SECS", "0.1")
        .env("RELAY_PREP_MAX_SECS", "0.2")
        .env("RELAY_LOG_FILE", &log_file)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("relay binary starts");

    let mut stdin = child.stdin.take().unwrap();
    stdin
        .write_all(b"ORDER {\"food\": \"tea\", \"table\": 2}\nKITCHEN ignored\n")
        .unwrap();
    stdin.flush().unwrap();

    std::thread::sleep(Duration::from_millis(1500));
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    drop(stdin);
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, "FOOD {\"food\": \"tea\", \"table\": 2}\n");

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Delivered"), "{stderr}");

    let logged = std::fs::read_to_string(&log_file).unwrap();
    assert!(logged.contains("Order received"), "{logged}");
    assert!(logged.contains("Delivered"), "{logged}");
}
