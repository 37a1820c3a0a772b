// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Offline full-text search for documentation sites.
//!
//! Records from a docs crawler go in; a single compressed artifact comes
//! out. Load that artifact anywhere (a CLI, a desktop app, an edge worker)
//! and answer partial-word queries with highlighted, breadcrumbed results.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐     ┌──────────────┐
//! │  types.rs   │────▶│  index/       │────▶│  search/     │
//! │ (Document-  │     │ (tokenize,    │     │ (probe, merge│
//! │  Record)    │     │  FieldIndex)  │     │  highlight)  │
//! └─────────────┘     └───────────────┘     └──────────────┘
//!        │                   │                     │
//!        ▼                   ▼                     ▼
//! ┌──────────────┐    ┌─────────────────────────────────────┐
//! │  store.rs    │───▶│  binary/ (header, brotli, CRC32)     │
//! └──────────────┘    └─────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use docsift::{DocumentRecord, SearchEngine};
//!
//! let mut engine = SearchEngine::new();
//! engine.load_documents(vec![
//!     DocumentRecord::new("sdk/audio", "Audio Player", "Play sounds."),
//! ]);
//!
//! let artifact = engine.export_compressed().unwrap();
//! let mut restored = SearchEngine::new();
//! restored.import_compressed(&artifact).unwrap();
//!
//! let results = restored.search("play", None).unwrap();
//! assert_eq!(results[0].highlighted_title, "Audio <mark>Play</mark>er");
//! ```

pub mod binary;
pub mod build;
pub mod cache;
pub mod config;
pub mod error;
pub mod index;
pub mod scoring;
pub mod search;
pub mod store;
pub mod testing;
pub mod types;
mod utils;

pub use cache::{FetchPolicy, ReferenceCache};
pub use config::{CompressionConfig, EngineConfig, SearchConfig, TokenizerConfig};
pub use error::{ArtifactFault, Result, SearchError};
pub use search::{EngineStats, LoadReport, SearchEngine};
pub use types::{DocumentRecord, Hierarchy, IndexedField, SearchResult};
pub use utils::normalize;
