use assert_cmd::prelude::*;
use rstest::rstest;
use std::process::Command;

fn insole() -> Command {
    let mut cmd = Command::cargo_bin("insole_cli").unwrap();
    cmd.env_remove("INSOLE_SIM_RAW")
        .env_remove("INSOLE_SIM_FAIL")
        .env_remove("RUST_LOG");
    cmd
}

#[rstest]
fn convert_json_schema() {
    let out = insole()
        .args(["--json", "convert", "--raw", "3259", "--channel", "2"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["raw"], 3259);
    assert_eq!(v["channel"], 2);
    let f = v["force_n"].as_f64().unwrap();
    assert!((f - 745.56).abs() < 1e-3, "{f}");
}

#[rstest]
fn self_check_json_lists_every_channel() {
    let out = insole()
        .args(["--json", "--log-level", "error", "self-check"])
        .env("INSOLE_SIM_RAW", "2925")
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["status"], "ok");
    let channels = v["channels"].as_array().unwrap();
    assert_eq!(channels.len(), 6);
    let pins: Vec<u64> = channels.iter().map(|c| c["pin"].as_u64().unwrap()).collect();
    assert_eq!(pins, [36, 39, 34, 35, 32, 33]);
    for c in channels {
        assert_eq!(c["raw"], 2925);
    }
    // Q = 5, R = 25 settles at P ~ 8.956, K ~ 0.358
    let p = v["filter"]["steady_covariance"].as_f64().unwrap();
    let k = v["filter"]["steady_gain"].as_f64().unwrap();
    assert!((p - 8.956).abs() < 1e-2, "{p}");
    assert!((k - 0.3583).abs() < 1e-3, "{k}");
}

#[rstest]
fn error_json_on_stderr() {
    let out = insole()
        .args(["--json", "--log-level", "error", "self-check"])
        .env("INSOLE_SIM_FAIL", "1")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(3));
    let stderr = String::from_utf8(out.stderr).unwrap();
    let last = stderr.lines().last().unwrap();
    let v: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(v["reason"], "HardwareFault");
    assert_eq!(v["exit_code"], 3);
}

#[rstest]
fn run_summary_json_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("cfg.toml");
    std::fs::write(&cfg, "[acquisition]\nsettle_us = 0\n[output]\ncycle_delay_ms = 0\n").unwrap();

    let out = insole()
        .arg("--config")
        .arg(&cfg)
        .args(["--json", "--log-level", "error", "run", "--cycles", "4", "--stats"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    let v: serde_json::Value = serde_json::from_str(stderr.lines().last().unwrap()).unwrap();
    assert_eq!(v["cycles"], 4);
    assert_eq!(v["stop"], "cycle_limit");
    assert!(v["stats"]["late_cycles"].as_u64().is_some());
    assert_eq!(String::from_utf8(out.stdout).unwrap().lines().count(), 5);
}
