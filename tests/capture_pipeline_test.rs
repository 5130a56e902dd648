//! Capture Pipeline Testing
//!
//! End-to-end processing of synthetic captures: photo persistence, result
//! shaping, depth variance presence, and owned completion handles.

use crabshot::capture::{CapturedPhotoData, PhotoProcessor};
use crabshot::config::CrabShotConfig;
use crabshot::depth::DepthVariability;
use crabshot::errors::CaptureError;
use crabshot::orientation::RotationClass;
use crabshot::quality::{DepthQualityAnalyzer, SceneDepthLevel};
use crabshot::testing::{center_block_depth_map, synthetic_capture, uniform_depth_map};
use std::sync::Arc;
use tempfile::tempdir;

fn processor_in(dir: &std::path::Path) -> PhotoProcessor {
    let mut config = CrabShotConfig::default();
    config.capture.output_directory = dir.join("captures");
    PhotoProcessor::new(config)
}

#[test]
fn test_process_writes_photo_and_shapes_result() {
    let dir = tempdir().unwrap();
    let capture = synthetic_capture(40, 30, 6, Some(uniform_depth_map(20, 15, 1.1)));

    let result = processor_in(dir.path()).process(&capture).unwrap();

    assert!(result.path.starts_with(dir.path().join("captures")));
    assert_eq!(result.path.extension().unwrap(), "jpg");
    assert_eq!(std::fs::read(&result.path).unwrap(), capture.data.unwrap().to_vec());
    assert_eq!((result.width, result.height), (40, 30));
    assert!(!result.is_raw_photo);
    assert_eq!(result.orientation, RotationClass::LandscapeRight);
    assert!(!result.is_mirrored);
    assert_eq!(result.depth_variance, Some(0.0));
    assert_eq!(result.metadata["Orientation"], 6);
}

#[test]
fn test_each_capture_gets_a_unique_file() {
    let dir = tempdir().unwrap();
    let processor = processor_in(dir.path());
    let capture = synthetic_capture(8, 8, 1, None);

    let first = processor.process(&capture).unwrap();
    let second = processor.process(&capture).unwrap();
    assert_ne!(first.path, second.path);
}

#[test]
fn test_result_json_omits_missing_depth_variance() {
    let dir = tempdir().unwrap();
    let processor = processor_in(dir.path());

    let without_depth = processor.process(&synthetic_capture(8, 8, 1, None)).unwrap();
    let json = without_depth.to_json();
    assert!(json.get("depth_variance").is_none());
    assert_eq!(json["orientation"], "portrait");
    assert_eq!(json["width"], 8);

    let with_depth = processor
        .process(&synthetic_capture(8, 8, 1, Some(center_block_depth_map(16, 16, 100.0, 0.0))))
        .unwrap();
    let variance = with_depth.to_json()["depth_variance"].as_f64().unwrap();
    assert!((variance - 49.487).abs() < 1e-2);
}

#[test]
fn test_unknown_orientation_tag_defaults_to_portrait() {
    let dir = tempdir().unwrap();
    let result = processor_in(dir.path())
        .process(&synthetic_capture(8, 8, 99, None))
        .unwrap();
    assert_eq!(result.orientation, RotationClass::Portrait);
    assert!(!result.is_mirrored);
}

#[test]
fn test_result_round_trips_through_json() {
    let dir = tempdir().unwrap();
    let result = processor_in(dir.path())
        .process(&synthetic_capture(12, 6, 2, Some(uniform_depth_map(4, 4, 0.5))))
        .unwrap();

    let json = serde_json::to_string(&result).unwrap();
    let parsed: crabshot::PhotoCaptureResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);
}

#[test]
fn test_depth_quality_of_processed_capture() {
    let dir = tempdir().unwrap();
    let processor = processor_in(dir.path());
    let analyzer = DepthQualityAnalyzer::from_config(&processor.config().depth);

    let deep = processor
        .process(&synthetic_capture(16, 16, 1, Some(center_block_depth_map(32, 32, 3.0, 1.0))))
        .unwrap();
    let report = analyzer.classify(DepthVariability::Measured(deep.depth_variance.unwrap()));
    assert_eq!(report.level, SceneDepthLevel::Deep);

    let flat = processor
        .process(&synthetic_capture(16, 16, 1, Some(uniform_depth_map(8, 8, 1.5))))
        .unwrap();
    let report = analyzer.classify(DepthVariability::Measured(flat.depth_variance.unwrap()));
    assert_eq!(report.level, SceneDepthLevel::Flat);
}

#[tokio::test]
async fn test_process_async() {
    let dir = tempdir().unwrap();
    let processor = Arc::new(processor_in(dir.path()));

    let result = processor
        .process_async(synthetic_capture(16, 16, 3, None))
        .await
        .unwrap();
    assert_eq!(result.orientation, RotationClass::PortraitUpsideDown);
}

#[tokio::test]
async fn test_pending_capture_resolves_after_completion() {
    let dir = tempdir().unwrap();
    let processor = Arc::new(processor_in(dir.path()));
    let (completion, pending) = processor.begin_capture();

    tokio::task::spawn_blocking(move || {
        let capture = synthetic_capture(10, 20, 5, Some(uniform_depth_map(5, 10, 2.0)));
        completion.complete(&capture);
    });

    let result = pending.wait().await.unwrap();
    assert_eq!(result.orientation, RotationClass::LandscapeLeft);
    assert!(result.is_mirrored);
    assert_eq!(result.depth_variance, Some(0.0));
}

#[tokio::test]
async fn test_pending_capture_reports_processing_error() {
    let dir = tempdir().unwrap();
    let processor = Arc::new(processor_in(dir.path()));
    let (completion, pending) = processor.begin_capture();

    completion.complete(&CapturedPhotoData::default());

    assert!(matches!(
        pending.wait().await,
        Err(CaptureError::MissingPhotoData(_))
    ));
}
