// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring functions for search results.
//!
//! Scoring is deliberately flat: a document earns one point for every indexed
//! field that matched the query, and deprecated documents have their total
//! multiplied by a penalty. There is no per-field weighting and no term
//! frequency. Within a field, position already decided which documents made
//! the cut (see `FieldIndex::probe`).
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! ## DEPRECATION_DEMOTES
//! For a penalty in `[0, 1)`, a deprecated document never outranks a current
//! one that matched the same number of fields:
//!
//! ```text
//! n * penalty < n   for every n >= 1
//! ```
//!
//! ## SCORE_BOUNDS
//! `0 <= score <= IndexedField::COUNT * FIELD_MATCH_SCORE`

use crate::types::IndexedField;

/// Points for matching in one field.
pub const FIELD_MATCH_SCORE: f64 = 1.0;

/// Highest score any document can reach.
pub const MAX_SCORE: f64 = IndexedField::COUNT as f64 * FIELD_MATCH_SCORE;

/// Score after the deprecation penalty, if it applies.
#[inline]
pub fn apply_deprecation(score: f64, deprecated: bool, penalty: f64) -> f64 {
    if deprecated {
        score * penalty
    } else {
        score
    }
}
