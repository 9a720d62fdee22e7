//! Command line interface tests for the `ar-overlay` binary.

mod common;

use assert_cmd::Command;
use common::{four_marker_scene, red_source, ANCHOR_IDS};
use predicates::prelude::*;
use tempfile::TempDir;

fn ar_overlay() -> Command {
    Command::cargo_bin("ar-overlay").expect("binary builds")
}

#[test]
fn missing_scene_file_fails() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.png");
    red_source().save(&source).unwrap();

    ar_overlay()
        .arg("--image")
        .arg(dir.path().join("nope.png"))
        .arg("--source")
        .arg(&source)
        .assert()
        .failure();
}

#[test]
fn blank_scene_exits_cleanly_without_output() {
    let dir = TempDir::new().unwrap();
    let scene = dir.path().join("scene.png");
    let source = dir.path().join("source.png");
    let output = dir.path().join("overlay.png");
    image::RgbImage::from_pixel(600, 450, image::Rgb([255, 255, 255]))
        .save(&scene)
        .unwrap();
    red_source().save(&source).unwrap();

    ar_overlay()
        .arg("--image")
        .arg(&scene)
        .arg("--source")
        .arg(&source)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("exiting without output"));

    assert!(!output.exists());
}

#[test]
fn full_run_writes_output_and_report() {
    let dir = TempDir::new().unwrap();
    let scene = dir.path().join("scene.png");
    let source = dir.path().join("source.png");
    let output = dir.path().join("overlay.png");
    let report = dir.path().join("report.json");
    four_marker_scene(ANCHOR_IDS).save(&scene).unwrap();
    red_source().save(&source).unwrap();

    ar_overlay()
        .arg("--image")
        .arg(&scene)
        .arg("--source")
        .arg(&source)
        .arg("--output")
        .arg(&output)
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stderr(predicate::str::contains("detected 4 marker(s)"));

    assert!(output.exists());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert!(json["error"].is_null());
    assert_eq!(json["markers"].as_array().unwrap().len(), 4);
    assert!(json["reference_points"].is_array());
    assert_eq!(json["scene_width"], 600);
}
