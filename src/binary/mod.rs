// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Persisted artifact format.
//!
//! The artifact is a JSON document wrapped in a small binary envelope. The
//! JSON is where the data lives; the envelope exists so that a truncated or
//! bit-flipped file is caught by a checksum instead of surfacing as a
//! confusing JSON error halfway through a decode (or worse, decoding into
//! something plausible).
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER (16 bytes)                                          │
//! │   magic: [u8; 4] = "DSFT"                                  │
//! │   version: u8 = 1                                          │
//! │   flags: u8   (bit 0: brotli payload)                      │
//! │   reserved: [u8; 2]                                        │
//! │   payload_len: u32, raw_len: u32                           │
//! ├────────────────────────────────────────────────────────────┤
//! │ PAYLOAD (brotli, quality 11, window 22)                    │
//! │   {"formatVersion": 1,                                     │
//! │    "indexData": {"<fragment>": "<json>", ...},             │
//! │    "documents": [[id, record], ...]}                       │
//! ├────────────────────────────────────────────────────────────┤
//! │ FOOTER (8 bytes): crc32 + magic "TFSD"                     │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Security Considerations
//!
//! Artifacts may come from anywhere, so decoding is defensive:
//! - Artifact size is capped before anything is parsed
//! - The checksum is verified before the payload is decompressed
//! - Decompression output is bounded by the header's `raw_len`, which is
//!   itself capped, so a brotli bomb cannot exhaust memory
//! - Every fragment is validated against the registry before use

mod header;

pub use header::{
    ArtifactFooter, ArtifactHeader, FormatFlags, FOOTER_MAGIC, MAGIC, MAX_ARTIFACT_SIZE,
    MAX_RAW_SIZE, VERSION,
};

use std::collections::{BTreeMap, HashSet};
use std::io::{Read, Write};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::CompressionConfig;
use crate::error::{ArtifactFault, Result, SearchError};
use crate::index::MultiFieldIndex;
use crate::store::DocumentStore;
use crate::types::DocumentRecord;

/// Brotli buffer size used on both sides.
const BROTLI_BUFFER: usize = 4096;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportPayload<'a> {
    format_version: u8,
    index_data: BTreeMap<String, String>,
    documents: Vec<(&'a str, &'a DocumentRecord)>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportPayload {
    format_version: u8,
    index_data: BTreeMap<String, String>,
    documents: Vec<(String, DocumentRecord)>,
}

/// Serialize an index and its store into a complete artifact.
pub fn encode_artifact(
    index: &MultiFieldIndex,
    store: &DocumentStore,
    compression: &CompressionConfig,
) -> Result<Vec<u8>> {
    let start = Instant::now();

    let index_data = index
        .export_fragments()
        .map_err(|e| SearchError::Encode(e.to_string()))?;
    let payload = ExportPayload {
        format_version: VERSION,
        index_data,
        documents: store.pairs(),
    };
    let raw = serde_json::to_vec(&payload).map_err(|e| SearchError::Encode(e.to_string()))?;
    if raw.len() > MAX_RAW_SIZE {
        return Err(SearchError::Encode(format!(
            "payload is {} bytes, limit is {}",
            raw.len(),
            MAX_RAW_SIZE
        )));
    }

    let compressed = compress(&raw, compression).map_err(|e| SearchError::Encode(e.to_string()))?;
    if ArtifactHeader::SIZE + compressed.len() + ArtifactFooter::SIZE > MAX_ARTIFACT_SIZE {
        return Err(SearchError::Encode(format!(
            "compressed artifact exceeds {} bytes",
            MAX_ARTIFACT_SIZE
        )));
    }

    let header = ArtifactHeader {
        version: VERSION,
        flags: FormatFlags::new().with_brotli(),
        payload_len: compressed.len() as u32,
        raw_len: raw.len() as u32,
    };

    let mut buf = Vec::with_capacity(header.total_size());
    header
        .write(&mut buf)
        .map_err(|e| SearchError::Encode(e.to_string()))?;
    buf.extend_from_slice(&compressed);
    let footer = ArtifactFooter {
        crc32: ArtifactFooter::compute_crc32(&buf),
    };
    footer
        .write(&mut buf)
        .map_err(|e| SearchError::Encode(e.to_string()))?;

    tracing::debug!(
        docs = store.len(),
        raw_bytes = raw.len(),
        artifact_bytes = buf.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "encoded artifact"
    );
    Ok(buf)
}

/// Decode and validate a complete artifact.
///
/// # Validation
///
/// 1. Artifact size is within `MAX_ARTIFACT_SIZE`
/// 2. Header and footer magic are valid
/// 3. Version is supported
/// 4. `payload_len` matches the bytes actually present
/// 5. CRC32 checksum matches
/// 6. Payload decompresses to exactly `raw_len` bytes
/// 7. JSON decodes, fragments validate, every document key matches its record
pub fn decode_artifact(bytes: &[u8]) -> std::result::Result<(MultiFieldIndex, DocumentStore), ArtifactFault> {
    let start = Instant::now();
    let (header, payload) = check_envelope(bytes)?;
    let raw = decompress(payload, &header)?;

    let decoded: ImportPayload =
        serde_json::from_slice(&raw).map_err(|e| ArtifactFault::Decode(e.to_string()))?;
    if decoded.format_version != VERSION {
        return Err(ArtifactFault::UnsupportedVersion {
            found: decoded.format_version,
            supported: VERSION,
        });
    }

    let index = MultiFieldIndex::from_fragments(&decoded.index_data)?;

    let mut seen = HashSet::with_capacity(decoded.documents.len());
    let mut records = Vec::with_capacity(decoded.documents.len());
    for (id, record) in decoded.documents {
        if id != record.id {
            return Err(ArtifactFault::Decode(format!(
                "document key '{}' does not match record id '{}'",
                id, record.id
            )));
        }
        if !seen.insert(id) {
            return Err(ArtifactFault::Decode(format!(
                "document '{}' appears twice",
                record.id
            )));
        }
        records.push(record);
    }

    for ordinal in 0..index.doc_count() as u32 {
        if let Some(id) = index.id_of(ordinal) {
            if !seen.contains(id) {
                return Err(ArtifactFault::Decode(format!(
                    "indexed document '{}' has no stored record",
                    id
                )));
            }
        }
    }

    let mut store = DocumentStore::new();
    store.replace_all(records);

    tracing::debug!(
        docs = store.len(),
        raw_bytes = raw.len(),
        artifact_bytes = bytes.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "decoded artifact"
    );
    Ok((index, store))
}

/// What `inspect` reports about an artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactSummary {
    pub header: ArtifactHeader,
    pub stored_crc32: u32,
    pub computed_crc32: u32,
    /// `(name, bytes)` of every index fragment, empty if the payload could
    /// not be decoded.
    pub fragments: Vec<(String, usize)>,
    pub document_count: Option<usize>,
    /// Why the payload could not be decoded, if it could not.
    pub problem: Option<ArtifactFault>,
}

impl ArtifactSummary {
    pub fn checksum_ok(&self) -> bool {
        self.stored_crc32 == self.computed_crc32
    }
}

/// Describe an artifact without building an index from it.
///
/// Only a missing header or footer is an error; anything past that is
/// reported in `problem` so the caller can still print what was readable.
pub fn inspect(bytes: &[u8]) -> std::result::Result<ArtifactSummary, ArtifactFault> {
    check_minimum(bytes)?;
    let header = read_header(bytes)?;
    let footer = read_footer(bytes)?;
    let content = &bytes[..bytes.len() - ArtifactFooter::SIZE];

    let mut summary = ArtifactSummary {
        header,
        stored_crc32: footer.crc32,
        computed_crc32: ArtifactFooter::compute_crc32(content),
        fragments: Vec::new(),
        document_count: None,
        problem: None,
    };

    let decoded = check_envelope(bytes).and_then(|(header, payload)| {
        let raw = decompress(payload, &header)?;
        serde_json::from_slice::<ImportPayload>(&raw).map_err(|e| ArtifactFault::Decode(e.to_string()))
    });
    match decoded {
        Ok(payload) => {
            summary.fragments = payload
                .index_data
                .iter()
                .map(|(name, blob)| (name.clone(), blob.len()))
                .collect();
            summary.document_count = Some(payload.documents.len());
        }
        Err(fault) => summary.problem = Some(fault),
    }
    Ok(summary)
}

fn check_minimum(bytes: &[u8]) -> std::result::Result<(), ArtifactFault> {
    if bytes.len() > MAX_ARTIFACT_SIZE {
        return Err(ArtifactFault::TooLarge {
            what: "artifact",
            len: bytes.len(),
            limit: MAX_ARTIFACT_SIZE,
        });
    }
    if bytes.len() < ArtifactHeader::SIZE + ArtifactFooter::SIZE {
        return Err(ArtifactFault::TooShort { len: bytes.len() });
    }
    Ok(())
}

fn read_header(bytes: &[u8]) -> std::result::Result<ArtifactHeader, ArtifactFault> {
    let found = [bytes[0], bytes[1], bytes[2], bytes[3]];
    if found != MAGIC {
        return Err(ArtifactFault::BadMagic { found });
    }
    let mut cursor = &bytes[..ArtifactHeader::SIZE];
    ArtifactHeader::read(&mut cursor).map_err(|_| ArtifactFault::TooShort { len: bytes.len() })
}

fn read_footer(bytes: &[u8]) -> std::result::Result<ArtifactFooter, ArtifactFault> {
    let end = bytes.len();
    let found = [bytes[end - 4], bytes[end - 3], bytes[end - 2], bytes[end - 1]];
    if found != FOOTER_MAGIC {
        return Err(ArtifactFault::BadFooterMagic { found });
    }
    ArtifactFooter::read(bytes).map_err(|_| ArtifactFault::TooShort { len: end })
}

/// Everything short of decompression: sizes, magic, version, length, CRC.
fn check_envelope(bytes: &[u8]) -> std::result::Result<(ArtifactHeader, &[u8]), ArtifactFault> {
    check_minimum(bytes)?;
    let header = read_header(bytes)?;
    let footer = read_footer(bytes)?;

    if header.version != VERSION {
        return Err(ArtifactFault::UnsupportedVersion {
            found: header.version,
            supported: VERSION,
        });
    }

    let actual = bytes.len() - ArtifactHeader::SIZE - ArtifactFooter::SIZE;
    if header.payload_len as usize != actual {
        return Err(ArtifactFault::LengthMismatch {
            declared: header.payload_len as usize,
            actual,
        });
    }

    let content = &bytes[..bytes.len() - ArtifactFooter::SIZE];
    let computed = ArtifactFooter::compute_crc32(content);
    if footer.crc32 != computed {
        return Err(ArtifactFault::ChecksumMismatch {
            expected: footer.crc32,
            actual: computed,
        });
    }

    Ok((header, &content[ArtifactHeader::SIZE..]))
}

fn compress(raw: &[u8], config: &CompressionConfig) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder =
            brotli::CompressorWriter::new(&mut out, BROTLI_BUFFER, config.quality, config.lgwin);
        encoder.write_all(raw)?;
        encoder.flush()?;
    }
    Ok(out)
}

fn decompress(payload: &[u8], header: &ArtifactHeader) -> std::result::Result<Vec<u8>, ArtifactFault> {
    let declared = header.raw_len as usize;
    if declared > MAX_RAW_SIZE {
        return Err(ArtifactFault::TooLarge {
            what: "decompressed payload",
            len: declared,
            limit: MAX_RAW_SIZE,
        });
    }

    if !header.flags.is_brotli() {
        if payload.len() != declared {
            return Err(ArtifactFault::LengthMismatch {
                declared,
                actual: payload.len(),
            });
        }
        return Ok(payload.to_vec());
    }

    let mut raw = Vec::with_capacity(declared);
    // One extra byte so an overlong stream is detectable.
    brotli::Decompressor::new(payload, BROTLI_BUFFER)
        .take(declared as u64 + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ArtifactFault::Decompress(e.to_string()))?;

    if raw.len() != declared {
        return Err(ArtifactFault::Decompress(format!(
            "header declares {} bytes, stream holds {}{}",
            declared,
            raw.len().min(declared),
            if raw.len() > declared { "+" } else { "" }
        )));
    }
    Ok(raw)
}
