//! Damaged and hostile artifacts must fail cleanly with `CorruptArtifact`
//! and leave the engine untouched.

use std::io::Write;

use super::common::*;
use docsift::binary::{ArtifactFooter, ArtifactHeader, FormatFlags, VERSION};
use docsift::{ArtifactFault, SearchEngine, SearchError};
use tempfile::tempdir;

/// Wrap raw JSON in a valid envelope (correct lengths and checksum).
fn seal(raw: &[u8]) -> Vec<u8> {
    let mut compressed = Vec::new();
    {
        let mut encoder = brotli::CompressorWriter::new(&mut compressed, 4096, 5, 22);
        encoder.write_all(raw).unwrap();
    }
    let header = ArtifactHeader {
        version: VERSION,
        flags: FormatFlags::new().with_brotli(),
        payload_len: compressed.len() as u32,
        raw_len: raw.len() as u32,
    };
    let mut bytes = Vec::new();
    header.write(&mut bytes).unwrap();
    bytes.extend_from_slice(&compressed);
    let crc32 = ArtifactFooter::compute_crc32(&bytes);
    ArtifactFooter { crc32 }.write(&mut bytes).unwrap();
    bytes
}

fn import_fault(bytes: &[u8]) -> ArtifactFault {
    let mut engine = SearchEngine::new();
    match engine.import_compressed(bytes) {
        Err(SearchError::CorruptArtifact(fault)) => {
            assert!(!engine.is_initialized());
            fault
        }
        other => panic!("expected CorruptArtifact, got {:?}", other),
    }
}

fn valid_artifact() -> Vec<u8> {
    sample_engine().export_compressed().unwrap()
}

#[test]
fn test_empty_input() {
    assert!(matches!(import_fault(&[]), ArtifactFault::TooShort { len: 0 }));
}

#[test]
fn test_random_garbage() {
    let garbage: Vec<u8> = (0..200u32).map(|i| (i * 37 % 251) as u8).collect();
    assert!(matches!(import_fault(&garbage), ArtifactFault::BadMagic { .. }));
}

#[test]
fn test_every_single_byte_flip_is_caught() {
    let original = valid_artifact();
    // Step through the file; every position is covered by magic, version,
    // length, or checksum validation.
    for pos in (0..original.len()).step_by(7) {
        let mut bytes = original.clone();
        bytes[pos] ^= 0x40;
        let mut engine = SearchEngine::new();
        assert!(
            engine.import_compressed(&bytes).is_err(),
            "flip at {} went unnoticed",
            pos
        );
    }
}

#[test]
fn test_truncation_at_any_length() {
    let original = valid_artifact();
    for len in [1, 15, 16, 24, original.len() / 2, original.len() - 1] {
        let mut engine = SearchEngine::new();
        let err = engine.import_compressed(&original[..len]).unwrap_err();
        assert!(err.needs_rebuild(), "len {} gave {:?}", len, err);
    }
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut bytes = valid_artifact();
    bytes.extend_from_slice(b"extra");
    assert!(matches!(
        import_fault(&bytes),
        ArtifactFault::BadFooterMagic { .. }
    ));
}

#[test]
fn test_future_version_rejected() {
    let mut bytes = valid_artifact();
    bytes[4] = VERSION + 1;
    assert!(matches!(
        import_fault(&bytes),
        ArtifactFault::UnsupportedVersion { .. }
    ));
}

#[test]
fn test_non_json_payload() {
    let fault = import_fault(&seal(b"this is not json"));
    assert!(matches!(fault, ArtifactFault::Decode(_)), "{:?}", fault);
}

#[test]
fn test_wrong_format_version_in_payload() {
    let raw = br#"{"formatVersion": 9, "indexData": {}, "documents": []}"#;
    assert!(matches!(
        import_fault(&seal(raw)),
        ArtifactFault::UnsupportedVersion { found: 9, .. }
    ));
}

#[test]
fn test_missing_fragments() {
    let raw = br#"{"formatVersion": 1, "indexData": {}, "documents": []}"#;
    assert!(matches!(
        import_fault(&seal(raw)),
        ArtifactFault::Fragment { .. }
    ));
}

/// Decode the payload of a valid artifact, let `edit` mangle it, reseal.
fn tampered(edit: impl FnOnce(&mut serde_json::Value)) -> Vec<u8> {
    let bytes = valid_artifact();
    let payload = &bytes[ArtifactHeader::SIZE..bytes.len() - ArtifactFooter::SIZE];
    let mut raw = Vec::new();
    std::io::Read::read_to_end(&mut brotli::Decompressor::new(payload, 4096), &mut raw).unwrap();
    let mut value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    edit(&mut value);
    seal(&serde_json::to_vec(&value).unwrap())
}

#[test]
fn test_posting_for_unknown_document() {
    let bytes = tampered(|v| {
        v["indexData"]["map.title"] = serde_json::Value::String(r#"{"x":[[99,0]]}"#.to_string());
    });
    match import_fault(&bytes) {
        ArtifactFault::Fragment { name, .. } => assert_eq!(name, "map.title"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_undecodable_fragment() {
    let bytes = tampered(|v| {
        v["indexData"]["reg"] = serde_json::Value::String("{not json".to_string());
    });
    assert!(matches!(import_fault(&bytes), ArtifactFault::Fragment { .. }));
}

#[test]
fn test_document_key_mismatch() {
    let bytes = tampered(|v| {
        v["documents"][0][0] = serde_json::Value::String("someone-else".to_string());
    });
    assert!(matches!(import_fault(&bytes), ArtifactFault::Decode(_)));
}

#[test]
fn test_indexed_document_without_record() {
    let bytes = tampered(|v| {
        if let Some(docs) = v["documents"].as_array_mut() {
            docs.pop();
        }
    });
    assert!(matches!(import_fault(&bytes), ArtifactFault::Decode(_)));
}

#[test]
fn test_lying_raw_len() {
    let mut bytes = valid_artifact();
    // raw_len lives at bytes 12..16; shrink it and fix the checksum
    let raw_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
    bytes[12..16].copy_from_slice(&(raw_len - 1).to_le_bytes());
    let end = bytes.len() - ArtifactFooter::SIZE;
    let crc32 = ArtifactFooter::compute_crc32(&bytes[..end]);
    bytes[end..end + 4].copy_from_slice(&crc32.to_le_bytes());
    assert!(matches!(import_fault(&bytes), ArtifactFault::Decompress(_)));
}

#[test]
fn test_failed_import_keeps_previous_index() {
    let mut engine = sample_engine();
    let before = engine.search_scored("camera", None).unwrap();

    let mut bad = valid_artifact();
    let mid = bad.len() / 2;
    bad[mid] ^= 0xFF;
    let err = engine.import_compressed(&bad).unwrap_err();
    assert!(err.needs_rebuild());

    assert_eq!(engine.search_scored("camera", None).unwrap(), before);
}

#[test]
fn test_corrupt_file_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.dsft");
    let mut bytes = valid_artifact();
    let last = bytes.len() - 1;
    bytes[last] = b'?';
    std::fs::write(&path, &bytes).unwrap();

    let err = SearchEngine::open(&path).unwrap_err();
    assert!(err.needs_rebuild());
    assert!(err.to_string().contains("footer magic"));
}
