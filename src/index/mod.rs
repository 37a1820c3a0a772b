// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index construction: one inverted index per searchable field.
//!
//! Documents are addressed internally by a dense `u32` ordinal, assigned the
//! first time an id is seen and never reused. The registry maps ordinals back
//! to ids. Re-indexing an id keeps its ordinal, strips its old postings from
//! every field, and inserts the new ones, so loading the same batch twice
//! leaves the index exactly as loading it once.
//!
//! # Fragments
//!
//! For export the index splits into named fragments, each an opaque JSON
//! string:
//!
//! | Name                 | Contents                                   |
//! |----------------------|--------------------------------------------|
//! | `reg`                | ordinal → id table                         |
//! | `cfg`                | tokenizer settings the index was built with|
//! | `map.<field>`        | token → `[[ordinal, slot], ...]`           |

pub mod field;
pub mod tokenize;

use std::collections::{BTreeMap, HashMap, HashSet};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::TokenizerConfig;
use crate::error::ArtifactFault;
use crate::types::{DocumentRecord, IndexedField};

pub use field::{FieldIndex, Posting};
pub use tokenize::{query_terms, resolution_slot, tokenize_field, FieldTokens};

/// Fragment holding the ordinal → id table.
pub const REGISTRY_FRAGMENT: &str = "reg";

/// Fragment holding the tokenizer settings.
pub const CONFIG_FRAGMENT: &str = "cfg";

/// Below this batch size, tokenization stays on the calling thread.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 64;

/// Name of the fragment holding `field`'s term map.
pub fn map_fragment_name(field: IndexedField) -> String {
    format!("map.{}", field.as_str())
}

/// Term and posting counts for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldStats {
    pub field: IndexedField,
    pub terms: usize,
    pub postings: usize,
}

/// The complete multi-field inverted index.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiFieldIndex {
    config: TokenizerConfig,
    registry: Vec<String>,
    ordinals: HashMap<String, u32>,
    fields: [FieldIndex; IndexedField::COUNT],
}

impl MultiFieldIndex {
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            config,
            registry: Vec::new(),
            ordinals: HashMap::new(),
            fields: Default::default(),
        }
    }

    /// Tokenizer settings this index was built with. Queries must use these.
    pub fn tokenizer(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Number of registered documents.
    pub fn doc_count(&self) -> usize {
        self.registry.len()
    }

    pub fn ordinal(&self, id: &str) -> Option<u32> {
        self.ordinals.get(id).copied()
    }

    pub fn id_of(&self, ordinal: u32) -> Option<&str> {
        self.registry.get(ordinal as usize).map(String::as_str)
    }

    pub fn field(&self, field: IndexedField) -> &FieldIndex {
        &self.fields[field.slot()]
    }

    /// Index a batch of records.
    ///
    /// Records must already be validated and free of duplicate ids (see
    /// [`collapse_batch`]). Returns how many records replaced an existing
    /// document.
    pub fn index(&mut self, records: &[DocumentRecord]) -> usize {
        let mut replaced = HashSet::new();
        let mut ordinals = Vec::with_capacity(records.len());

        for record in records {
            let ordinal = match self.ordinals.get(&record.id) {
                Some(&existing) => {
                    replaced.insert(existing);
                    existing
                }
                None => {
                    let next = self.registry.len() as u32;
                    self.registry.push(record.id.clone());
                    self.ordinals.insert(record.id.clone(), next);
                    next
                }
            };
            ordinals.push(ordinal);
        }

        // Stale postings go before new ones come in.
        for field in &mut self.fields {
            field.remove_docs(&replaced);
        }

        let tokenized = tokenize_records(records, &self.config);
        for (ordinal, per_field) in ordinals.into_iter().zip(tokenized) {
            for (slot, tokens) in per_field.into_iter().enumerate() {
                self.fields[slot].insert(ordinal, tokens);
            }
        }

        replaced.len()
    }

    /// Probe one field. See [`FieldIndex::probe`].
    pub fn probe(&self, field: IndexedField, terms: &[String], cap: usize) -> Vec<u32> {
        self.fields[field.slot()].probe(terms, cap)
    }

    pub fn stats(&self) -> Vec<FieldStats> {
        IndexedField::ALL
            .iter()
            .map(|&field| {
                let index = self.field(field);
                FieldStats {
                    field,
                    terms: index.term_count(),
                    postings: index.posting_count(),
                }
            })
            .collect()
    }

    /// Split into named JSON fragments for the artifact.
    pub fn export_fragments(&self) -> Result<BTreeMap<String, String>, serde_json::Error> {
        let mut fragments = BTreeMap::new();
        fragments.insert(REGISTRY_FRAGMENT.to_string(), to_fragment(&self.registry)?);
        fragments.insert(CONFIG_FRAGMENT.to_string(), to_fragment(&self.config)?);
        for field in IndexedField::ALL {
            fragments.insert(map_fragment_name(field), to_fragment(self.field(field))?);
        }
        Ok(fragments)
    }

    /// Rebuild from fragments produced by [`export_fragments`](Self::export_fragments).
    ///
    /// Every fragment is validated; any missing, undecodable, or inconsistent
    /// fragment fails the whole restore.
    pub fn from_fragments(fragments: &BTreeMap<String, String>) -> Result<Self, ArtifactFault> {
        let registry: Vec<String> = from_fragment(fragments, REGISTRY_FRAGMENT)?;
        let config: TokenizerConfig = from_fragment(fragments, CONFIG_FRAGMENT)?;
        config
            .validate()
            .map_err(|reason| fragment_fault(CONFIG_FRAGMENT, reason))?;

        if registry.len() > u32::MAX as usize {
            return Err(fragment_fault(REGISTRY_FRAGMENT, "too many documents".to_string()));
        }

        let mut ordinals = HashMap::with_capacity(registry.len());
        for (ordinal, id) in registry.iter().enumerate() {
            if id.is_empty() {
                return Err(fragment_fault(
                    REGISTRY_FRAGMENT,
                    format!("empty id at ordinal {}", ordinal),
                ));
            }
            if ordinals.insert(id.clone(), ordinal as u32).is_some() {
                return Err(fragment_fault(
                    REGISTRY_FRAGMENT,
                    format!("duplicate id '{}'", id),
                ));
            }
        }

        let mut fields: [FieldIndex; IndexedField::COUNT] = Default::default();
        for field in IndexedField::ALL {
            let name = map_fragment_name(field);
            let mut index: FieldIndex = from_fragment(fragments, &name)?;
            index
                .validate(registry.len())
                .map_err(|reason| fragment_fault(&name, reason))?;
            fields[field.slot()] = index;
        }

        for name in fragments.keys() {
            let known = name == REGISTRY_FRAGMENT
                || name == CONFIG_FRAGMENT
                || IndexedField::ALL.iter().any(|&f| map_fragment_name(f) == *name);
            if !known {
                tracing::debug!(fragment = %name, "ignoring unknown index fragment");
            }
        }

        Ok(Self {
            config,
            registry,
            ordinals,
            fields,
        })
    }
}

/// Drop invalid records and collapse duplicate ids.
///
/// A duplicated id keeps the position of its first occurrence and the
/// contents of its last (last write wins). Returns the surviving records and
/// `(position, reason)` for every rejected one.
pub fn collapse_batch(
    records: impl IntoIterator<Item = DocumentRecord>,
) -> (Vec<DocumentRecord>, Vec<(usize, String)>) {
    let mut kept: Vec<DocumentRecord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut rejected = Vec::new();

    for (position, record) in records.into_iter().enumerate() {
        if let Err(reason) = record.validate() {
            rejected.push((position, reason));
            continue;
        }
        let record = DocumentRecord {
            hierarchy: record.hierarchy.normalized(),
            ..record
        };
        match positions.get(&record.id) {
            Some(&slot) => kept[slot] = record,
            None => {
                positions.insert(record.id.clone(), kept.len());
                kept.push(record);
            }
        }
    }

    (kept, rejected)
}

type RecordTokens = Vec<FieldTokens>;

fn tokenize_record(record: &DocumentRecord, config: &TokenizerConfig) -> RecordTokens {
    IndexedField::ALL
        .iter()
        .map(|field| {
            field
                .text(record)
                .map(|text| tokenize_field(text, config))
                .unwrap_or_default()
        })
        .collect()
}

/// Tokenize records, fanning out across threads for large batches.
/// Output order matches input order.
#[cfg(feature = "parallel")]
fn tokenize_records(records: &[DocumentRecord], config: &TokenizerConfig) -> Vec<RecordTokens> {
    if records.len() < PARALLEL_THRESHOLD {
        return records.iter().map(|r| tokenize_record(r, config)).collect();
    }
    records
        .par_iter()
        .map(|r| tokenize_record(r, config))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn tokenize_records(records: &[DocumentRecord], config: &TokenizerConfig) -> Vec<RecordTokens> {
    records.iter().map(|r| tokenize_record(r, config)).collect()
}

fn to_fragment<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

fn from_fragment<T: DeserializeOwned>(
    fragments: &BTreeMap<String, String>,
    name: &str,
) -> Result<T, ArtifactFault> {
    let blob = fragments
        .get(name)
        .ok_or_else(|| fragment_fault(name, "missing".to_string()))?;
    serde_json::from_str(blob).map_err(|e| fragment_fault(name, e.to_string()))
}

fn fragment_fault(name: &str, reason: String) -> ArtifactFault {
    ArtifactFault::Fragment {
        name: name.to_string(),
        reason,
    }
}
