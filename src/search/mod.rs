// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search engine: loading, querying, and persisting.
//!
//! A query runs in four steps:
//!
//! 1. Tokenize the query the same way the index was tokenized
//! 2. Probe each field, title first, keeping at most `limit` hits per field
//! 3. Merge: one point per field a document matched in, deprecated
//!    documents penalized, stable sort
//! 4. Hydrate the top `limit` from the document store
//!
//! The engine starts empty. Until `load_documents` or `import_compressed`
//! succeeds, searching and exporting fail with `NotInitialized`.

pub mod format;
pub mod merge;

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use crate::binary::{decode_artifact, encode_artifact, MAX_ARTIFACT_SIZE};
use crate::config::EngineConfig;
use crate::error::{ArtifactFault, Result, SearchError};
use crate::index::{collapse_batch, query_terms, FieldStats, MultiFieldIndex};
use crate::store::DocumentStore;
use crate::types::{DocumentRecord, IndexedField, SearchResult};

pub use format::{category, highlight, to_result};
pub use merge::{ScoreAccumulator, ScoredHit};

/// Outcome of one `load_documents` call.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Distinct records indexed from this batch.
    pub indexed: usize,
    /// How many of those replaced a document that was already loaded.
    pub replaced: usize,
    /// One `MalformedRecord` per rejected input record.
    pub skipped: Vec<SearchError>,
}

/// Corpus statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineStats {
    pub documents: usize,
    pub deprecated: usize,
    /// Distinct non-empty `lvl0` values.
    pub categories: usize,
    /// Mean content length in characters.
    pub average_content_chars: f64,
    pub fields: Vec<FieldStats>,
}

#[derive(Debug, Clone)]
struct EngineState {
    index: MultiFieldIndex,
    store: DocumentStore,
}

/// An in-memory full-text index over documentation records.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    config: EngineConfig,
    state: Option<EngineState>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// True once a load or import has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Index a batch of records.
    ///
    /// Records are upserted by id: an id seen before is re-indexed in place
    /// and its old postings removed. Within the batch, a repeated id keeps
    /// its last version. Records without an id are skipped and reported;
    /// they never abort the batch.
    pub fn load_documents(&mut self, records: impl IntoIterator<Item = DocumentRecord>) -> LoadReport {
        let start = Instant::now();
        let tokenizer = self.config.tokenizer;
        let state = self.state.get_or_insert_with(|| EngineState {
            index: MultiFieldIndex::new(tokenizer),
            store: DocumentStore::new(),
        });

        let (batch, rejected) = collapse_batch(records);
        let skipped: Vec<SearchError> = rejected
            .into_iter()
            .map(|(position, reason)| {
                tracing::warn!(position, %reason, "skipping malformed record");
                SearchError::MalformedRecord { position, reason }
            })
            .collect();

        let replaced = state.index.index(&batch);
        let indexed = batch.len();
        state.store.load(batch);

        tracing::debug!(
            indexed,
            replaced,
            skipped = skipped.len(),
            total = state.store.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded documents"
        );

        LoadReport {
            indexed,
            replaced,
            skipped,
        }
    }

    /// Search, returning up to `limit` results (default 5, never more than 20).
    pub fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<SearchResult>> {
        self.run_query(query, limit, false)
    }

    /// Like [`search`](Self::search), with each result's score filled in.
    pub fn search_scored(&self, query: &str, limit: Option<usize>) -> Result<Vec<SearchResult>> {
        self.run_query(query, limit, true)
    }

    fn run_query(&self, query: &str, limit: Option<usize>, scored: bool) -> Result<Vec<SearchResult>> {
        let state = self.state.as_ref().ok_or(SearchError::NotInitialized)?;
        let limit = self.config.search.effective_limit(limit);

        let terms = query_terms(query, state.index.tokenizer());
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut scores = ScoreAccumulator::new();
        for field in IndexedField::ALL {
            let hits = state.index.probe(field, &terms, limit);
            tracing::trace!(field = field.as_str(), hits = hits.len(), "probed field");
            scores.add_field_hits(&hits);
        }

        scores.penalize(self.config.search.deprecation_penalty, |doc| {
            state
                .index
                .id_of(doc)
                .and_then(|id| state.store.get(id))
                .is_some_and(DocumentRecord::deprecated)
        });

        let results = scores
            .into_ranked(limit)
            .into_iter()
            .filter_map(|hit| {
                // A registry entry without a stored record is dropped, not an error.
                let id = state.index.id_of(hit.doc)?;
                let record = state.store.get(id)?;
                let score = scored.then_some(hit.score);
                Some(to_result(record, query, score, &self.config.search))
            })
            .collect();
        Ok(results)
    }

    /// Serialize the whole engine state into a self-contained artifact.
    pub fn export_compressed(&self) -> Result<Vec<u8>> {
        let state = self.state.as_ref().ok_or(SearchError::NotInitialized)?;
        encode_artifact(&state.index, &state.store, &self.config.compression)
    }

    /// Replace the engine state with an artifact's contents.
    ///
    /// The artifact is fully decoded and validated before anything is
    /// swapped in. On error the engine is exactly as it was.
    pub fn import_compressed(&mut self, bytes: &[u8]) -> Result<()> {
        let (index, store) = decode_artifact(bytes)?;
        tracing::debug!(docs = store.len(), "imported artifact");
        self.state = Some(EngineState { index, store });
        Ok(())
    }

    /// Export and write to `path`. Returns the artifact size in bytes.
    pub fn write_artifact(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let bytes = self.export_compressed()?;
        std::fs::write(path, &bytes).map_err(|e| SearchError::io(path, e))?;
        Ok(bytes.len())
    }

    /// Read `path` and import it.
    pub fn read_artifact(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path).map_err(|e| SearchError::io(path, e))?;
        if meta.len() > MAX_ARTIFACT_SIZE as u64 {
            return Err(ArtifactFault::TooLarge {
                what: "artifact",
                len: meta.len() as usize,
                limit: MAX_ARTIFACT_SIZE,
            }
            .into());
        }
        let bytes = std::fs::read(path).map_err(|e| SearchError::io(path, e))?;
        self.import_compressed(&bytes)
    }

    /// Open an artifact file as a new engine.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut engine = Self::new();
        engine.read_artifact(path)?;
        Ok(engine)
    }

    /// A stored record by id.
    pub fn get(&self, id: &str) -> Option<&DocumentRecord> {
        self.state.as_ref().and_then(|s| s.store.get(id))
    }

    /// Number of stored documents (0 before initialization).
    pub fn len(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.store.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> EngineStats {
        let Some(state) = &self.state else {
            return EngineStats::default();
        };

        let documents = state.store.len();
        let mut categories = HashSet::new();
        let mut deprecated = 0;
        let mut content_chars = 0usize;
        for record in state.store.iter() {
            if let Some(lvl0) = &record.hierarchy.lvl0 {
                categories.insert(lvl0.as_str());
            }
            if record.deprecated() {
                deprecated += 1;
            }
            content_chars += record.content.chars().count();
        }

        EngineStats {
            documents,
            deprecated,
            categories: categories.len(),
            average_content_chars: if documents == 0 {
                0.0
            } else {
                content_chars as f64 / documents as f64
            },
            fields: state.index.stats(),
        }
    }
}
