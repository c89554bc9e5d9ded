use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::tempdir;

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name)
}

#[test]
fn replay_writes_report() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("report.json");

    Command::cargo_bin("infovis")
        .expect("binary")
        .args(["replay", "--log-level", "off", "--script"])
        .arg(testdata("session_script.json"))
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("confirmed markers: 4"));

    let raw = std::fs::read_to_string(&out).expect("report");
    let report: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(report["model_points"], 4);
    assert_eq!(report["display_rotation"], "90");
    assert_eq!(report["confirmed_markers"], 4);
    assert_eq!(report["highlight_visible"], false);

    let frames = report["frames"].as_array().expect("frames");
    assert_eq!(frames.len(), 7);
    let measured: Vec<u64> = frames
        .iter()
        .map(|f| f["measured"].as_u64().expect("measured"))
        .collect();
    assert_eq!(measured, vec![0, 1, 2, 3, 4, 3, 4]);
    assert_eq!(frames[4]["highlight"], serde_json::Value::Null);
    assert_eq!(frames[5]["markers_removed"], 1);
    assert_eq!(frames[6]["overlay_placed"], false);
    assert!(frames[6]["overlay_skip_reason"].is_string());

    let scale = report["overlay"]["scale"].as_f64().expect("scale");
    assert!((scale - 2.0).abs() < 1e-9);
}

#[test]
fn replay_reports_missing_script() {
    let dir = tempdir().expect("tempdir");
    Command::cargo_bin("infovis")
        .expect("binary")
        .args(["replay", "--log-level", "off", "--script"])
        .arg(dir.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Io"));
}

#[test]
fn model_info_prints_unit_square() {
    Command::cargo_bin("infovis")
        .expect("binary")
        .args(["model-info", "--log-level", "off"])
        .assert()
        .success()
        .stdout(predicate::str::contains("points: 4"))
        .stdout(predicate::str::contains("0.01"));
}

#[test]
fn model_info_rejects_non_numeric_points() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("model.json");
    std::fs::write(&path, r#"{ "points": [[0, 0, "x"]] }"#).expect("write");

    Command::cargo_bin("infovis")
        .expect("binary")
        .args(["model-info", "--model"])
        .arg(&path)
        .assert()
        .failure();
}
