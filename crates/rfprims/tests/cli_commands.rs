#![cfg(feature = "cli")]

use std::process::Command;

fn rfprims() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rfprims"))
}

#[test]
fn version_prints_package_version() {
    let output = rfprims()
        .arg("version")
        .output()
        .expect("binary should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_lists_subcommands() {
    let output = rfprims().arg("--help").output().expect("binary should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["ports", "send", "listen", "version"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in help");
    }
}

#[test]
fn send_with_invalid_name_exits_with_usage_code() {
    let output = rfprims()
        .args(["send", "/dev/does-not-exist", "--name", "TOOLONG"])
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(64));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid --name"));
}

#[test]
fn send_to_missing_device_exits_with_transport_code() {
    let output = rfprims()
        .args(["send", "/dev/rfprims-missing-device", "--name", "NI"])
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("open failed"));
}

#[test]
fn send_requires_a_command_name() {
    let output = rfprims()
        .args(["send", "/dev/ttyUSB0"])
        .output()
        .expect("binary should run");

    assert!(!output.status.success());
}
