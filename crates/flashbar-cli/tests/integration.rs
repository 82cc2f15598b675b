#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn settings_file(dir: &TempDir) -> PathBuf {
    dir.path().join("flashbar/settings.yaml")
}

fn flashbar(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("flashbar").unwrap();
    cmd.current_dir(dir.path())
        .env("FLASHBAR_CONFIG", settings_file(dir))
        .env_remove("RUST_LOG");
    cmd
}

fn write_settings(dir: &TempDir, yaml: &str) {
    let path = settings_file(dir);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, yaml).unwrap();
}

// ---------------------------------------------------------------------------
// flashbar config
// ---------------------------------------------------------------------------

#[test]
fn config_get_reports_defaults_without_a_file() {
    let dir = TempDir::new().unwrap();
    flashbar(&dir)
        .args(["config", "get", "flash-interval"])
        .assert()
        .success()
        .stdout("300\n");
    flashbar(&dir)
        .args(["config", "get", "flash-color"])
        .assert()
        .success()
        .stdout("rgba(255, 0, 0, 0.5)\n");
    assert!(!settings_file(&dir).exists());
}

#[test]
fn config_set_persists_yaml() {
    let dir = TempDir::new().unwrap();
    flashbar(&dir)
        .args(["config", "set", "flash-count", "5"])
        .assert()
        .success()
        .stdout("5\n");

    let content = std::fs::read_to_string(settings_file(&dir)).unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&content).unwrap();
    assert_eq!(doc["flash-count"], serde_yaml::Value::from(5));

    flashbar(&dir)
        .args(["config", "get", "flash-count"])
        .assert()
        .success()
        .stdout("5\n");
}

#[test]
fn config_set_clamps_out_of_range_integers() {
    let dir = TempDir::new().unwrap();
    flashbar(&dir)
        .args(["config", "set", "flash-interval", "2"])
        .assert()
        .success()
        .stdout("10\n")
        .stderr(predicate::str::contains("clamped"));
    flashbar(&dir)
        .args(["config", "set", "flash-duration", "9000"])
        .assert()
        .success()
        .stdout("2000\n");
}

#[test]
fn config_set_accepts_mode_names_and_normalizes_colors() {
    let dir = TempDir::new().unwrap();
    flashbar(&dir)
        .args(["config", "set", "flash-mode", "indicator"])
        .assert()
        .success()
        .stdout("1\n");
    flashbar(&dir)
        .args(["config", "set", "flash-color", "#00ff00"])
        .assert()
        .success()
        .stdout("rgba(0, 255, 0, 1)\n");
}

#[test]
fn config_set_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    flashbar(&dir)
        .args(["config", "set", "flash-color", "not-a-color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
    flashbar(&dir)
        .args(["config", "set", "flash-count", "many"])
        .assert()
        .failure();
    flashbar(&dir)
        .args(["config", "set", "no-such-key", "1"])
        .assert()
        .failure();
    assert!(!settings_file(&dir).exists());
}

#[test]
fn config_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    flashbar(&dir)
        .args(["config", "set", "flash-count", "7"])
        .assert()
        .success();
    flashbar(&dir)
        .args(["config", "reset", "flash-count"])
        .assert()
        .success()
        .stdout("3\n");

    flashbar(&dir)
        .args(["config", "set", "show-indicator", "false"])
        .assert()
        .success();
    flashbar(&dir).args(["config", "reset"]).assert().success();
    flashbar(&dir)
        .args(["config", "get", "show-indicator"])
        .assert()
        .success()
        .stdout("true\n");
}

#[test]
fn config_opacity_keeps_hue() {
    let dir = TempDir::new().unwrap();
    flashbar(&dir)
        .args(["config", "opacity", "80"])
        .assert()
        .success()
        .stdout("rgba(255, 0, 0, 0.8)\n");
    flashbar(&dir)
        .args(["config", "opacity", "101"])
        .assert()
        .failure();
}

#[test]
fn config_validate_flags_hand_edited_values() {
    let dir = TempDir::new().unwrap();
    write_settings(&dir, "flash-interval: 2\n");
    flashbar(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[warning] flash-interval"));

    write_settings(&dir, "flash-color: chartreuse-ish\n");
    flashbar(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"));
}

#[test]
fn config_path_prints_location() {
    let dir = TempDir::new().unwrap();
    flashbar(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("settings.yaml"));
}

#[test]
fn config_show_json_uses_kebab_keys() {
    let dir = TempDir::new().unwrap();
    let output = flashbar(&dir)
        .args(["--json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["timer-enabled"], false);
    assert_eq!(value["flash-duration"], 500);
    assert_eq!(value["show-indicator"], true);
}

// ---------------------------------------------------------------------------
// flashbar enable / disable / toggle / status
// ---------------------------------------------------------------------------

#[test]
fn enable_disable_and_toggle() {
    let dir = TempDir::new().unwrap();
    flashbar(&dir)
        .arg("enable")
        .assert()
        .success()
        .stdout(predicate::str::contains("every 300s"));
    flashbar(&dir)
        .args(["config", "get", "timer-enabled"])
        .assert()
        .success()
        .stdout("true\n");

    flashbar(&dir)
        .arg("toggle")
        .assert()
        .success()
        .stdout(predicate::str::contains("disabled"));
    flashbar(&dir)
        .arg("toggle")
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled"));
    flashbar(&dir)
        .arg("disable")
        .assert()
        .success()
        .stdout("Reminder disabled.\n");
}

#[test]
fn status_json_reports_clamped_config() {
    let dir = TempDir::new().unwrap();
    write_settings(&dir, "timer-enabled: true\nflash-count: 40\nflash-duration: 400\n");
    let output = flashbar(&dir)
        .args(["status", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["config"]["enabled"], true);
    assert_eq!(value["config"]["flash-count"], 10);
    assert_eq!(value["flash-span-ms"], 4000);
    assert_eq!(value["warnings"].as_array().unwrap().len(), 1);
}

#[test]
fn status_table_lists_settings() {
    let dir = TempDir::new().unwrap();
    flashbar(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("interval"))
        .stdout(predicate::str::contains("300s"))
        .stdout(predicate::str::contains("50% opacity"));
}

// ---------------------------------------------------------------------------
// flashbar simulate / flash
// ---------------------------------------------------------------------------

#[test]
fn simulate_prints_flash_timeline() {
    let dir = TempDir::new().unwrap();
    write_settings(&dir, "flash-interval: 30\nflash-duration: 400\nflash-count: 3\n");
    flashbar(&dir)
        .args(["simulate", "--seconds", "65"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30.200s  top-bar on"))
        .stdout(predicate::str::contains("31.200s  top-bar off"))
        .stdout(predicate::str::contains("60.200s  top-bar on"))
        .stdout(predicate::str::contains("2 trigger(s) in 65s"));
}

#[test]
fn simulate_interval_change_json() {
    let dir = TempDir::new().unwrap();
    write_settings(&dir, "flash-interval: 30\nflash-mode: 1\nflash-duration: 100\nflash-count: 1\n");
    let output = flashbar(&dir)
        .args(["--json", "simulate", "--seconds", "110", "--interval-at", "45:60"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["triggers"], 2);
    let first_on: Vec<u64> = value["timeline"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["change"] == "indicator on")
        .map(|e| e["at_ms"].as_u64().unwrap())
        .collect();
    assert_eq!(first_on, vec![30_050, 105_050]);
}

#[test]
fn simulate_disable_stops_reminder() {
    let dir = TempDir::new().unwrap();
    write_settings(&dir, "flash-interval: 10\n");
    flashbar(&dir)
        .args(["simulate", "--seconds", "60", "--disable-at", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reminder disabled"))
        .stdout(predicate::str::contains("2 trigger(s) in 60s"));
}

#[test]
fn simulate_accepts_far_future_disable() {
    let dir = TempDir::new().unwrap();
    write_settings(&dir, "flash-interval: 10\n");
    flashbar(&dir)
        .args(["simulate", "--seconds", "35", "--disable-at", "184467440737095516"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 trigger(s) in 35s"))
        .stdout(predicate::str::contains("reminder disabled").not());
}

#[test]
fn simulate_rejects_malformed_interval_change() {
    let dir = TempDir::new().unwrap();
    flashbar(&dir)
        .args(["simulate", "--seconds", "10", "--interval-at", "45"])
        .assert()
        .failure();
}

#[test]
fn flash_plain_prints_each_toggle() {
    let dir = TempDir::new().unwrap();
    let output = flashbar(&dir)
        .args(["flash", "--plain", "--duration", "100", "--count", "2"])
        .timeout(std::time::Duration::from_secs(10))
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.matches("top-bar on").count(), 2);
    assert_eq!(stdout.matches("top-bar off").count(), 2);
    assert!(!settings_file(&dir).exists());
}

#[test]
fn flash_json_reports_run() {
    let dir = TempDir::new().unwrap();
    let output = flashbar(&dir)
        .args(["-j", "flash", "--mode", "indicator", "--duration", "100", "--count", "1"])
        .timeout(std::time::Duration::from_secs(10))
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["target"], "indicator");
    assert_eq!(value["count"], 1);
    assert!(value["elapsed-ms"].as_u64().unwrap() >= 100);
}
