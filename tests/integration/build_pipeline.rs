//! `run_build` end to end: JSON records in, artifact out, searchable.

use super::common::*;
use docsift::build::{parse_records, run_build};
use docsift::{EngineConfig, SearchEngine, SearchError};
use tempfile::tempdir;

fn skipped_positions(errors: &[SearchError]) -> Vec<usize> {
    errors
        .iter()
        .filter_map(|e| match e {
            SearchError::MalformedRecord { position, .. } => Some(*position),
            _ => None,
        })
        .collect()
}

#[test]
fn test_build_and_search() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("records.json");
    let output = dir.path().join("out").join("docs.dsft");
    std::fs::write(&input, records_json(&sample_corpus())).unwrap();

    let summary = run_build(&input, &output, EngineConfig::default()).unwrap();
    assert_eq!(summary.documents, 5);
    assert!(summary.skipped.is_empty());
    assert_eq!(summary.categories, 2);
    assert_eq!(
        summary.artifact_bytes as u64,
        std::fs::metadata(&output).unwrap().len()
    );
    assert!(summary.compression_ratio() > 0.0);

    let engine = SearchEngine::open(&output).unwrap();
    let results = engine.search("play", None).unwrap();
    assert_eq!(results[0].id, "sdk/audio");
    assert_eq!(results[0].title, "Audio Player");
    assert_eq!(results[0].highlighted_title, "Audio <mark>Play</mark>er");
}

#[test]
fn test_build_skips_bad_elements_by_input_position() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("records.json");
    let output = dir.path().join("docs.dsft");
    let json = r#"[
        {"id": "one", "title": "Camera"},
        42,
        {"id": "", "title": "No id"},
        {"title": "Also no id"},
        {"id": "two", "title": "Microphone", "isDeprecated": "yes"},
        {"id": "three", "title": "Camera roll", "content": "Browse photos."}
    ]"#;
    std::fs::write(&input, json).unwrap();

    let summary = run_build(&input, &output, EngineConfig::default()).unwrap();
    assert_eq!(summary.documents, 2);
    assert_eq!(skipped_positions(&summary.skipped), [1, 2, 3, 4]);

    let engine = SearchEngine::open(&output).unwrap();
    assert_eq!(ids(&engine.search("camera", None).unwrap()), ["one", "three"]);
}

#[test]
fn test_build_rejects_non_array_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("records.json");
    let output = dir.path().join("docs.dsft");
    std::fs::write(&input, r#"{"id": "one"}"#).unwrap();

    let err = run_build(&input, &output, EngineConfig::default()).unwrap_err();
    assert!(matches!(err, SearchError::InvalidInput(_)));
    assert!(!output.exists());
}

#[test]
fn test_build_missing_input_is_io_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("missing.json");
    let err = run_build(&input, &dir.path().join("docs.dsft"), EngineConfig::default())
        .unwrap_err();
    match err {
        SearchError::Io { path, .. } => assert_eq!(path, input),
        other => panic!("expected Io, got {:?}", other),
    }
}

#[test]
fn test_build_empty_array() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("records.json");
    let output = dir.path().join("docs.dsft");
    std::fs::write(&input, "[]").unwrap();

    let summary = run_build(&input, &output, EngineConfig::default()).unwrap();
    assert_eq!(summary.documents, 0);
    let engine = SearchEngine::open(&output).unwrap();
    assert!(engine.is_initialized());
    assert!(engine.search("anything", None).unwrap().is_empty());
}

#[test]
fn test_build_overwrites_existing_artifact() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("records.json");
    let output = dir.path().join("docs.dsft");

    std::fs::write(&input, records_json(&camera_pair())).unwrap();
    run_build(&input, &output, EngineConfig::default()).unwrap();
    std::fs::write(&input, records_json(&sample_corpus())).unwrap();
    run_build(&input, &output, EngineConfig::default()).unwrap();

    let engine = SearchEngine::open(&output).unwrap();
    assert_eq!(engine.len(), 5);
    assert!(engine.get("a").is_none());
}

#[test]
fn test_parse_records_matches_crawler_output() {
    let parsed = parse_records(&records_json(&sample_corpus())).unwrap();
    assert_eq!(parsed.records, sample_corpus());
    assert_eq!(parsed.positions, [0, 1, 2, 3, 4]);
    assert!(parsed.malformed.is_empty());
}
