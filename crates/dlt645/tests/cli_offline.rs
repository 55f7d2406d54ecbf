#![cfg(feature = "cli")]

use std::process::Command;

fn dlt645(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_dlt645"))
        .args(["--log-level", "error", "--format", "json"])
        .args(args)
        .output()
        .expect("dlt645 should run")
}

#[test]
fn decode_prints_frame_fields() {
    let output = dlt645(&[
        "decode",
        "fe fe fe fe 68 96 63 07 22 00 00 68 91 08 33 33 33 33 ca 58 33 33 df 16",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(json["address"], "000022076396");
    assert_eq!(json["direction"], "station");
    assert_eq!(json["response"], "correct");
    assert_eq!(json["function"], "READ_DATA");
    assert_eq!(json["data"], "0000259700000000");
    assert_eq!(json["checksum_valid"], true);
}

#[test]
fn decode_broadcast_frame_has_no_address() {
    let output = dlt645(&["decode", "68aaaaaaaaaaaa681300df16"]);
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert!(json["address"].is_null());
    assert_eq!(json["function"], "READ_ADDR");
}

#[test]
fn encode_rejects_signed_address_digits() {
    let output = dlt645(&["encode", "--address", "+0+1+2+3+4+5"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn log_env_filter_overrides_log_level() {
    let output = Command::new(env!("CARGO_BIN_EXE_dlt645"))
        .env("DLT645_LOG", "dlt645_frame=debug")
        .args(["--log-level", "error", "--format", "json"])
        .args(["decode", "68aaaaaaaaaaaa681300df16"])
        .output()
        .expect("dlt645 should run");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("frame loaded"), "stderr: {stderr}");
}

#[test]
fn decode_reports_checksum_failure_with_exit_code() {
    let output = dlt645(&["decode", "68aaaaaaaaaaaa681300de16"]);
    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("checksum mismatch"), "stderr: {stderr}");
}

#[test]
fn decode_truncated_frame_times_out() {
    let output = dlt645(&["decode", "fe fe 68 aa aa"]);
    assert_eq!(output.status.code(), Some(124));
}

#[test]
fn encode_discovery_request() {
    let output = dlt645(&["encode", "--function", "read_addr"]);
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(json["frame"], "fefefefe68aaaaaaaaaaaa681300df16");
    assert_eq!(json["len"], 16);
}

#[test]
fn encode_rejects_function_missing_from_revision() {
    let output = dlt645(&["encode", "--function", "read_addr", "--protocol", "1997"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_prints_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_dlt645"))
        .arg("version")
        .output()
        .expect("dlt645 should run");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("dlt645 {}", env!("CARGO_PKG_VERSION"))
    );
}
