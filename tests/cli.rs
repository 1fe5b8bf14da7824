// Drives the compiled binary without a TTY: headless sessions and config writes.

use std::fs;
use std::io::Write;

use assert_cmd::Command;
use tempfile::{tempdir, NamedTempFile};

const POSE_LINE: &str = r#"[{"pose":{"keypoints":[{"part":"rightWrist","score":0.8,"position":{"x":100,"y":100}},{"part":"rightElbow","score":0.8,"position":{"x":100,"y":180}}]}}]"#;

fn swat() -> Command {
    Command::cargo_bin("swat").unwrap()
}

#[test]
fn headless_replay_prints_final_score() {
    let dir = tempdir().unwrap();
    let mut poses = NamedTempFile::new().unwrap();
    for _ in 0..3 {
        writeln!(poses, "{POSE_LINE}").unwrap();
    }

    let out = swat()
        .arg("--headless")
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .arg("--pose-file")
        .arg(poses.path())
        .args(["--duration-secs", "0.3", "--seed", "1"])
        .timeout(std::time::Duration::from_secs(20))
        .output()
        .unwrap();

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("score: "), "{stdout}");
    assert!(stdout.contains("hits: "), "{stdout}");
}

#[test]
fn headless_without_pose_feed_fails() {
    let dir = tempdir().unwrap();
    let out = swat()
        .arg("--headless")
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .output()
        .unwrap();

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("pose feed"), "{stderr}");
}

#[test]
fn headless_missing_pose_file_fails() {
    let dir = tempdir().unwrap();
    let out = swat()
        .arg("--headless")
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .arg("--pose-file")
        .arg(dir.path().join("nope.jsonl"))
        .timeout(std::time::Duration::from_secs(20))
        .output()
        .unwrap();

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unavailable"), "{stderr}");
}

#[cfg(unix)]
#[test]
fn headless_estimator_exiting_without_output_fails() {
    let dir = tempdir().unwrap();
    let out = swat()
        .arg("--headless")
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .args(["--pose-cmd", "true"])
        .timeout(std::time::Duration::from_secs(20))
        .output()
        .unwrap();

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("ended before producing a pose"), "{stderr}");
}

#[test]
fn write_config_saves_overrides() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    swat()
        .arg("--config")
        .arg(&path)
        .args(["--write-config", "--duration-secs", "2", "--touch-margin", "50"])
        .assert()
        .success();

    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["session_ms"], 2000);
    assert_eq!(saved["target"]["touch_margin"], 50.0);
    assert_eq!(saved["target"]["visible_ms"], 2000);
}

#[test]
fn invalid_override_is_rejected() {
    let dir = tempdir().unwrap();
    swat()
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .args(["--write-config", "--touch-margin", "0"])
        .assert()
        .failure();
    assert!(!dir.path().join("config.json").exists());
}
