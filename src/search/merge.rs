// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Merging per-field hits into one ranked list.
//!
//! A document can match in up to four fields. It must still appear at most
//! once in the results, with one point per field it matched in.
//! `ScoreAccumulator` keys on the document ordinal, so a second hit for the
//! same document can only add to its score, never add a second row.
//!
//! **Invariant**: each document appears at most once in the ranked output.
//!
//! **Invariant**: equal scores keep first-seen order. Fields are probed in
//! `IndexedField::ALL` order, so a title hit outranks a content hit with the
//! same score.

use std::collections::HashMap;

use crate::scoring::{apply_deprecation, FIELD_MATCH_SCORE};

/// A document and its accumulated score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredHit {
    pub doc: u32,
    pub score: f64,
}

/// Collects field hits in probe order.
#[derive(Debug, Default)]
pub struct ScoreAccumulator {
    /// First-seen order.
    hits: Vec<ScoredHit>,
    /// Ordinal → position in `hits`.
    slots: HashMap<u32, usize>,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit every document in one field's probe result.
    pub fn add_field_hits(&mut self, docs: &[u32]) {
        for &doc in docs {
            match self.slots.get(&doc) {
                Some(&slot) => self.hits[slot].score += FIELD_MATCH_SCORE,
                None => {
                    self.slots.insert(doc, self.hits.len());
                    self.hits.push(ScoredHit {
                        doc,
                        score: FIELD_MATCH_SCORE,
                    });
                }
            }
        }
    }

    /// Multiply the score of every document `is_deprecated` flags.
    pub fn penalize(&mut self, penalty: f64, mut is_deprecated: impl FnMut(u32) -> bool) {
        for hit in &mut self.hits {
            hit.score = apply_deprecation(hit.score, is_deprecated(hit.doc), penalty);
        }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Best first, ties in first-seen order, at most `limit`.
    pub fn into_ranked(self, limit: usize) -> Vec<ScoredHit> {
        let mut hits = self.hits;
        // sort_by is stable
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        hits
    }
}
