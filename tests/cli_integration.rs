use assert_cmd::Command;
use image::{Rgb, RgbImage};
use std::path::Path;
use tempfile::TempDir;

fn write_png(path: &Path, seed: u32) {
    let image = RgbImage::from_fn(16, 16, |x, y| {
        let v = ((x * 11 + y * 5 + seed * 37) % 256) as u8;
        Rgb([v, 255 - v, v.wrapping_mul(2)])
    });
    image.save(path).unwrap();
}

fn image_set(count: u32) -> TempDir {
    let dir = TempDir::new().unwrap();
    for i in 0..count {
        write_png(&dir.path().join(format!("frame_{i:03}.png")), i);
    }
    dir
}

#[test]
fn no_arguments_is_a_usage_error() {
    Command::cargo_bin("framescore").unwrap().assert().failure();
}

#[test]
fn score_without_directories_is_a_usage_error() {
    Command::cargo_bin("framescore")
        .unwrap()
        .arg("score")
        .assert()
        .failure();
}

#[test]
fn scores_a_directory_of_images() {
    let dir = image_set(3);
    let output = Command::cargo_bin("framescore")
        .unwrap()
        .arg("score")
        .arg(dir.path())
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("overall score"));
    assert!(stdout.contains("sharpness"));
    assert!(stdout.contains("gram_matrix"));
}

#[test]
fn json_report_round_trips() {
    let dir = image_set(3);
    let output = Command::cargo_bin("framescore")
        .unwrap()
        .arg("score")
        .arg(dir.path())
        .args(["--format", "json"])
        .assert()
        .success();

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.get_output().stdout).unwrap();
    let report = &parsed[0];
    assert!(report["overall_score"]["score"].is_f64());
    assert!(report["aspects"]["visual_quality"]["sharpness"]["elapsed_seconds"].is_f64());
    assert_eq!(report["failures"], serde_json::json!([]));
}

#[test]
fn single_frame_set_isolates_pairwise_metric_failures() {
    let dir = image_set(1);
    let output = Command::cargo_bin("framescore")
        .unwrap()
        .arg("score")
        .arg(dir.path())
        .args(["--format", "json"])
        .assert()
        .success();

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.get_output().stdout).unwrap();
    let failures = parsed[0]["failures"].as_array().unwrap();
    let failed: Vec<&str> = failures
        .iter()
        .map(|f| f["metric"].as_str().unwrap())
        .collect();
    assert!(failed.contains(&"gram_matrix"));
    assert!(failed.contains(&"frame_difference"));
    // The per-frame metrics still scored.
    assert!(parsed[0]["overall_score"]["score"].is_f64());
}

#[test]
fn fail_on_error_aborts_on_a_pairwise_metric() {
    let dir = image_set(1);
    Command::cargo_bin("framescore")
        .unwrap()
        .arg("score")
        .arg(dir.path())
        .arg("--fail-on-error")
        .assert()
        .failure();
}

#[test]
fn skip_flags_remove_whole_aspects() {
    let dir = image_set(2);
    let output = Command::cargo_bin("framescore")
        .unwrap()
        .arg("score")
        .arg(dir.path())
        .args(["--skip-aspect", "temporal_consistency,style_consistency"])
        .args(["--format", "json"])
        .assert()
        .success();

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.get_output().stdout).unwrap();
    let aspects = parsed[0]["aspects"].as_object().unwrap();
    assert!(!aspects.contains_key("temporal_consistency"));
    assert!(!aspects.contains_key("style_consistency"));
    assert!(aspects.contains_key("visual_quality"));
}

#[test]
fn unknown_skip_id_fails_before_any_scoring() {
    let dir = image_set(2);
    Command::cargo_bin("framescore")
        .unwrap()
        .arg("score")
        .arg(dir.path())
        .args(["--skip-metric", "optical_flow_aepe"])
        .assert()
        .failure();
}

#[test]
fn empty_directory_is_rejected() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("framescore")
        .unwrap()
        .arg("score")
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn aspects_lists_the_default_roster() {
    let output = Command::cargo_bin("framescore")
        .unwrap()
        .arg("aspects")
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("visual_quality"));
    assert!(stdout.contains("style_consistency"));
    assert!(stdout.contains("frame_difference"));
}
