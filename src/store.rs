// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The authoritative `id → DocumentRecord` map.
//!
//! The index only knows ordinals and tokens. Everything a result needs to
//! display (title, url, breadcrumb, the deprecation flag) comes from here.
//! Iteration follows first-insertion order so exports are deterministic.

use std::collections::HashMap;

use crate::types::DocumentRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentStore {
    records: Vec<DocumentRecord>,
    positions: HashMap<String, usize>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from scratch. Later duplicates overwrite earlier ones.
    pub fn from_records(records: impl IntoIterator<Item = DocumentRecord>) -> Self {
        let mut store = Self::new();
        store.load(records);
        store
    }

    /// Insert or replace each record by id. Returns how many were replacements.
    pub fn load(&mut self, records: impl IntoIterator<Item = DocumentRecord>) -> usize {
        let mut replaced = 0;
        for record in records {
            match self.positions.get(&record.id) {
                Some(&slot) => {
                    self.records[slot] = record;
                    replaced += 1;
                }
                None => {
                    self.positions.insert(record.id.clone(), self.records.len());
                    self.records.push(record);
                }
            }
        }
        replaced
    }

    /// Drop everything and load `records` in their place.
    pub fn replace_all(&mut self, records: impl IntoIterator<Item = DocumentRecord>) {
        self.records.clear();
        self.positions.clear();
        self.load(records);
    }

    /// Look up a record. Absence is an expected outcome, not an error.
    pub fn get(&self, id: &str) -> Option<&DocumentRecord> {
        self.positions.get(id).map(|&slot| &self.records[slot])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.records.iter()
    }

    /// `(id, record)` pairs in first-insertion order, borrowed for export.
    pub fn pairs(&self) -> Vec<(&str, &DocumentRecord)> {
        self.records.iter().map(|r| (r.id.as_str(), r)).collect()
    }
}
