//! Integration tests for the `netdeck` CLI binary.
//!
//! Every test points `--config` at a scratch directory so the user's
//! real configuration is never read or written.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `netdeck` binary with env isolation.
fn netdeck_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("netdeck");
    cmd.env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir)
        .env("NETDECK_CONFIG", dir.join("config.toml"))
        .env_remove("NETDECK_OUTPUT")
        .env_remove("NETDECK_SIMULATION__INTERVAL_MS")
        .env_remove("NETDECK_SIMULATION__REVEAL_PROBABILITY")
        .env_remove("NETDECK_SIMULATION__SYNC_PROBABILITY")
        .env_remove("NETDECK_NETWORK_FILE")
        .env_remove("RUST_LOG");
    cmd
}

/// Discovery that reveals one catalog entry per tick.
fn eager_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = netdeck_cmd(dir);
    cmd.env("NETDECK_SIMULATION__REVEAL_PROBABILITY", "1.0");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = TempDir::new().unwrap();
    let output = netdeck_cmd(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    netdeck_cmd(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("monitor")
            .and(predicate::str::contains("inspect"))
            .and(predicate::str::contains("pair"))
            .and(predicate::str::contains("remote")),
    );
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    netdeck_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("netdeck"));
}

#[test]
fn test_invalid_subcommand() {
    let dir = TempDir::new().unwrap();
    netdeck_cmd(dir.path())
        .arg("reboot")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    netdeck_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("netdeck"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_follows_flag() {
    let dir = TempDir::new().unwrap();
    let custom = dir.path().join("elsewhere.toml");
    netdeck_cmd(dir.path())
        .args(["config", "path", "--config"])
        .arg(&custom)
        .assert()
        .success()
        .stdout(predicate::str::contains("elsewhere.toml"));
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    netdeck_cmd(dir.path()).args(["config", "init"]).assert().success();
    assert!(dir.path().join("config.toml").exists());

    netdeck_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("--force"));

    netdeck_cmd(dir.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_show_reports_defaults() {
    let dir = TempDir::new().unwrap();
    let output = netdeck_cmd(dir.path())
        .args(["config", "show", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let cfg: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cfg["simulation"]["interval_ms"], 800);
    assert_eq!(cfg["simulation"]["remote_hold_ms"], 300);
    assert_eq!(cfg["defaults"]["output"], "table");
}

#[test]
fn test_bad_output_default_is_usage_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[defaults]\noutput = \"xml\"\n",
    )
    .unwrap();
    netdeck_cmd(dir.path())
        .args(["monitor", "--ticks", "1"])
        .assert()
        .code(2);
}

#[test]
fn test_out_of_range_probability_is_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[simulation]\nreveal_probability = 2.0\n",
    )
    .unwrap();
    netdeck_cmd(dir.path())
        .args(["monitor", "--ticks", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("reveal_probability"));
}

// ── Monitor ─────────────────────────────────────────────────────────

#[test]
fn test_monitor_without_ticks_finds_nothing() {
    let dir = TempDir::new().unwrap();
    netdeck_cmd(dir.path())
        .args(["monitor", "--ticks", "0", "-o", "json-compact"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_monitor_reveals_catalog_in_order() {
    let dir = TempDir::new().unwrap();
    eager_cmd(dir.path())
        .args(["monitor", "--ticks", "3", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "8A:2F:11:XX:XX:XX\nCC:4B:73:XX:XX:XX\nDC:41:A9:XX:XX:XX\n",
        ));
}

#[test]
fn test_monitor_filters() {
    let dir = TempDir::new().unwrap();
    eager_cmd(dir.path())
        .args(["monitor", "--ticks", "3", "--filter", "SAMSUNG", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::diff("CC:4B:73:XX:XX:XX\n"));

    eager_cmd(dir.path())
        .args(["monitor", "--ticks", "3", "--kind", "peripheral", "-o", "json-compact"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_monitor_table_shows_rates() {
    let dir = TempDir::new().unwrap();
    eager_cmd(dir.path())
        .args(["monitor", "--ticks", "1", "--color", "never"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Frank's iPhone 15")
                .and(predicate::str::contains("192.168.50.154"))
                .and(predicate::str::contains("/s")),
        );
}

#[test]
fn test_monitor_runs_in_real_time() {
    let dir = TempDir::new().unwrap();
    eager_cmd(dir.path())
        .env("NETDECK_SIMULATION__INTERVAL_MS", "50")
        .args(["monitor", "--duration", "600ms", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workstation-PC"));
}

// ── Inspect ─────────────────────────────────────────────────────────

#[test]
fn test_inspect_wan() {
    let dir = TempDir::new().unwrap();
    eager_cmd(dir.path())
        .args(["inspect", "wan", "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("193.165.79.58")
                .and(predicate::str::contains("\"connection\": \"Connected\"")),
        );
}

#[test]
fn test_inspect_gateway_counts_clients() {
    let dir = TempDir::new().unwrap();
    let output = eager_cmd(dir.path())
        .args(["inspect", "gateway", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["view"], "gateway");
    assert_eq!(view["model"], "RT-AC1200 V2");
    let clients = view["active_clients"].as_u64().unwrap();
    assert!(clients <= 3);
    assert_eq!(view["memory_mb"].as_u64().unwrap(), 30 + 5 * clients);
}

#[test]
fn test_inspect_device_by_name() {
    let dir = TempDir::new().unwrap();
    eager_cmd(dir.path())
        .args(["inspect", "device", "samsung tv 55", "--color", "never"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("192.168.50.201")
                .and(predicate::str::contains("Real-time"))
                .and(predicate::str::contains("remote")),
        );
}

#[test]
fn test_inspect_unknown_device() {
    let dir = TempDir::new().unwrap();
    eager_cmd(dir.path())
        .args(["inspect", "device", "toaster"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("toaster"));
}

// ── Pair ────────────────────────────────────────────────────────────

#[test]
fn test_pair_connects() {
    let dir = TempDir::new().unwrap();
    let output = netdeck_cmd(dir.path())
        .args([
            "pair",
            "--name",
            "Studio Headphones",
            "--id",
            "a1b2c3d4e5f60718293a4b5c",
            "--rssi",
            "-60",
            "-o",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["name"], "Studio Headphones");
    assert_eq!(view["status"], "CONNECTED");
    assert_eq!(view["category"], "audio");
    assert_eq!(view["fields"]["signal"], "-60 dBm");
    assert_eq!(view["fields"]["identifier"], "a1b2c3d4e5f6071829...");
    assert_eq!(view["actions"]["remote"], true);
}

#[test]
fn test_pair_failure_is_recorded() {
    let dir = TempDir::new().unwrap();
    netdeck_cmd(dir.path())
        .args(["pair", "--fail", "GATT timeout", "--color", "never"])
        .assert()
        .code(7)
        .stdout(
            predicate::str::contains("ERROR").and(predicate::str::contains("GATT timeout")),
        );
}

#[test]
fn test_pair_without_connect_operation() {
    let dir = TempDir::new().unwrap();
    netdeck_cmd(dir.path())
        .args(["pair", "--no-connect", "-o", "json"])
        .assert()
        .code(7)
        .stdout(predicate::str::contains("GATT server unavailable"));
}

#[test]
fn test_pair_cancelled_chooser() {
    let dir = TempDir::new().unwrap();
    netdeck_cmd(dir.path())
        .args(["pair", "--cancel"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cancelled"));
}

#[test]
fn test_pair_and_forget() {
    let dir = TempDir::new().unwrap();
    netdeck_cmd(dir.path())
        .args(["pair", "--id", "kb-01", "--forget", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::diff("kb-01\n"))
        .stderr(predicate::str::contains("Forgot kb-01"));
}

// ── Remote ──────────────────────────────────────────────────────────

#[test]
fn test_remote_reaches_first_capable_device() {
    let dir = TempDir::new().unwrap();
    let output = eager_cmd(dir.path())
        .args(["remote", "menu", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["device"], "Samsung TV 55");
    assert_eq!(report["command"], "MENU");
    assert!(report["held_ms"].as_u64().unwrap() >= 300);
}

#[test]
fn test_remote_rejects_handset() {
    let dir = TempDir::new().unwrap();
    eager_cmd(dir.path())
        .args(["remote", "vol-up", "--device", "8a:2f:11:xx:xx:xx"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("does not accept remote commands"));
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn test_connectivity_results() {
    let dir = TempDir::new().unwrap();
    netdeck_cmd(dir.path())
        .args(["tests", "-o", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("GatewayCanBePinged\tPassed")
                .and(predicate::str::contains("ArcHttp\tPassed")),
        );
}

#[test]
fn test_pair_prints_transitions() {
    let dir = TempDir::new().unwrap();
    netdeck_cmd(dir.path())
        .args(["pair", "--id", "pad-7", "--color", "never", "-o", "plain"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "pad-7: DISCONNECTED -> PAIRING -> CONNECTED",
        ));
}
