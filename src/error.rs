// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for the search engine.
//!
//! Callers care about three distinct situations and should never have to
//! string-match to tell them apart:
//!
//! - the artifact on disk is unusable (`CorruptArtifact`): rebuild it
//! - a query arrived before any index existed (`NotInitialized`)
//! - one input record was bad (`MalformedRecord`): it was skipped, the rest
//!   of the batch went in

use std::path::PathBuf;
use thiserror::Error;

/// What exactly was wrong with an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactFault {
    #[error("artifact is {len} bytes, too short for header and footer")]
    TooShort { len: usize },

    #[error("invalid magic: expected DSFT, got {found:?}")]
    BadMagic { found: [u8; 4] },

    #[error("invalid footer magic: expected TFSD, got {found:?}")]
    BadFooterMagic { found: [u8; 4] },

    #[error("unsupported format version {found} (this build reads {supported})")]
    UnsupportedVersion { found: u8, supported: u8 },

    #[error("header declares {declared} payload bytes but {actual} are present")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("checksum mismatch: footer says {expected:08x}, content hashes to {actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("{what} size {len} exceeds limit {limit}")]
    TooLarge {
        what: &'static str,
        len: usize,
        limit: usize,
    },

    #[error("decompression failed: {0}")]
    Decompress(String),

    #[error("payload is not valid JSON for this format: {0}")]
    Decode(String),

    #[error("index fragment '{name}' is invalid: {reason}")]
    Fragment { name: String, reason: String },
}

/// Main error type for engine operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("corrupt index artifact: {0}")]
    CorruptArtifact(#[from] ArtifactFault),

    #[error("no index loaded: load documents or import an artifact before searching")]
    NotInitialized,

    #[error("malformed record at position {position}: {reason}")]
    MalformedRecord { position: usize, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode artifact: {0}")]
    Encode(String),

    #[error("records input is not a JSON array: {0}")]
    InvalidInput(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// True when the right response is to rebuild the artifact from source
    /// records rather than retry.
    pub fn needs_rebuild(&self) -> bool {
        matches!(self, SearchError::CorruptArtifact(_))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SearchError::Io {
            path: path.into(),
            source,
        }
    }
}
