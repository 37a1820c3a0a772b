//! Export/import round trips, in memory and through files.

use super::common::*;
use docsift::binary::{inspect, ArtifactHeader, MAGIC, VERSION};
use docsift::SearchEngine;
use tempfile::tempdir;

const QUERIES: &[&str] = &["camera", "play", "permissions camera", "guides", "reference", "token"];

#[test]
fn test_roundtrip_preserves_results() {
    let engine = sample_engine();
    let restored = roundtrip(&engine);
    for query in QUERIES {
        assert_eq!(
            engine.search_scored(query, Some(20)).unwrap(),
            restored.search_scored(query, Some(20)).unwrap(),
            "query {:?}",
            query
        );
    }
}

#[test]
fn test_roundtrip_preserves_deprecation() {
    let restored = roundtrip(&engine_with(camera_pair()));
    assert!(restored.get("b").unwrap().deprecated());
    assert_eq!(ids(&restored.search("camera", None).unwrap()), ["a", "b"]);
}

#[test]
fn test_reexport_is_byte_identical() {
    let engine = sample_engine();
    let first = engine.export_compressed().unwrap();
    let second = roundtrip(&engine).export_compressed().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_import_replaces_previous_state() {
    let artifact = engine_with(camera_pair()).export_compressed().unwrap();
    let mut engine = sample_engine();
    engine.import_compressed(&artifact).unwrap();
    assert_eq!(engine.len(), 2);
    assert!(engine.get("sdk/audio").is_none());
    assert!(engine.search("audio", None).unwrap().is_empty());
}

#[test]
fn test_load_after_import_extends() {
    let mut engine = roundtrip(&engine_with(camera_pair()));
    engine.load_documents(vec![make_record("c", "Camera roll", "")]);
    assert_eq!(engine.len(), 3);
    let found = ids(&engine.search("camera", Some(10)).unwrap());
    assert!(found.contains(&"c".to_string()));
}

#[test]
fn test_artifact_header_layout() {
    let bytes = sample_engine().export_compressed().unwrap();
    assert_eq!(&bytes[..4], &MAGIC);
    assert_eq!(bytes[4], VERSION);
    let summary = inspect(&bytes).unwrap();
    assert!(summary.checksum_ok());
    assert!(summary.header.flags.is_brotli());
    assert_eq!(summary.document_count, Some(5));
    assert_eq!(
        summary.header.payload_len as usize,
        bytes.len() - ArtifactHeader::SIZE - 8
    );
    let names: Vec<&str> = summary.fragments.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        [
            "cfg",
            "map.content",
            "map.hierarchy.lvl0",
            "map.hierarchy.lvl1",
            "map.title",
            "reg"
        ]
    );
}

#[test]
fn test_artifact_compresses() {
    let engine = engine_with(generated_corpus(200, "configuration"));
    let bytes = engine.export_compressed().unwrap();
    let summary = inspect(&bytes).unwrap();
    assert!((summary.header.payload_len as usize) < summary.header.raw_len as usize / 2);
}

#[test]
fn test_file_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("docs.dsft");

    let engine = sample_engine();
    let written = engine.write_artifact(&path).unwrap();
    assert_eq!(written as u64, std::fs::metadata(&path).unwrap().len());

    let opened = SearchEngine::open(&path).unwrap();
    assert_eq!(
        ids(&opened.search("camera", None).unwrap()),
        ids(&engine.search("camera", None).unwrap())
    );
}

#[test]
fn test_read_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = SearchEngine::open(dir.path().join("nope.dsft")).unwrap_err();
    assert!(matches!(err, docsift::SearchError::Io { .. }));
    assert!(!err.needs_rebuild());
}

#[test]
fn test_write_uninitialized_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.dsft");
    assert!(matches!(
        SearchEngine::new().write_artifact(&path),
        Err(docsift::SearchError::NotInitialized)
    ));
    assert!(!path.exists());
}
