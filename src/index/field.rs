// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-field inverted index.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **POSTING_LIST_SORTED**: each posting list is sorted by doc ordinal,
//!    strictly (one posting per document per term).
//! 2. **NON_EMPTY**: every term has at least one posting. Removal drops
//!    terms whose list becomes empty.
//!
//! Probing relies on (1) for its merge-join intersection.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::tokenize::FieldTokens;

/// One document's occurrence of a term in this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u8)", into = "(u32, u8)")]
pub struct Posting {
    /// Document ordinal (index into the registry).
    pub doc: u32,
    /// Resolution slot of the earliest occurrence. Lower is better.
    pub slot: u8,
}

impl From<(u32, u8)> for Posting {
    fn from((doc, slot): (u32, u8)) -> Self {
        Posting { doc, slot }
    }
}

impl From<Posting> for (u32, u8) {
    fn from(p: Posting) -> Self {
        (p.doc, p.slot)
    }
}

/// Token → postings for a single indexed field.
///
/// `BTreeMap` keeps export output deterministic: the same index always
/// serializes to the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldIndex {
    terms: BTreeMap<String, Vec<Posting>>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document's tokens. The document must not already be present
    /// (callers remove stale postings first).
    pub fn insert(&mut self, doc: u32, tokens: FieldTokens) {
        for (token, slot) in tokens {
            let postings = self.terms.entry(token).or_default();
            let posting = Posting { doc, slot };
            match postings.binary_search_by_key(&doc, |p| p.doc) {
                Ok(i) => postings[i] = posting,
                Err(i) => postings.insert(i, posting),
            }
        }
    }

    /// Drop every posting that belongs to one of `docs`.
    pub fn remove_docs(&mut self, docs: &HashSet<u32>) {
        if docs.is_empty() {
            return;
        }
        self.terms.retain(|_, postings| {
            postings.retain(|p| !docs.contains(&p.doc));
            !postings.is_empty()
        });
    }

    /// Postings for an exact token.
    pub fn postings(&self, token: &str) -> Option<&[Posting]> {
        self.terms.get(token).map(Vec::as_slice)
    }

    /// Documents containing every term, best first, at most `cap` of them.
    ///
    /// Rank is the summed resolution slot across terms (lower is better).
    /// Equal ranks keep ordinal order, which is insertion order.
    pub fn probe(&self, terms: &[String], cap: usize) -> Vec<u32> {
        if terms.is_empty() || cap == 0 {
            return Vec::new();
        }

        let mut lists: Vec<&[Posting]> = Vec::with_capacity(terms.len());
        for term in terms {
            match self.postings(term) {
                Some(list) => lists.push(list),
                None => return Vec::new(),
            }
        }
        // Intersect shortest-first; the slot sum is order independent.
        lists.sort_by_key(|l| l.len());

        let mut candidates: Vec<(u32, u32)> =
            lists[0].iter().map(|p| (p.doc, u32::from(p.slot))).collect();
        for list in &lists[1..] {
            candidates = intersect(&candidates, list);
            if candidates.is_empty() {
                return Vec::new();
            }
        }

        // Stable: equal slot sums stay in ordinal order.
        candidates.sort_by_key(|&(_, rank)| rank);
        candidates.truncate(cap);
        candidates.into_iter().map(|(doc, _)| doc).collect()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn posting_count(&self) -> usize {
        self.terms.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Check invariants against a registry of `doc_count` documents, sorting
    /// lists that arrive out of order. Used when restoring from an artifact.
    pub fn validate(&mut self, doc_count: usize) -> Result<(), String> {
        for (term, postings) in &mut self.terms {
            if postings.is_empty() {
                return Err(format!("term '{}' has no postings", term));
            }
            postings.sort_by_key(|p| p.doc);
            for pair in postings.windows(2) {
                if pair[0].doc == pair[1].doc {
                    return Err(format!(
                        "term '{}' lists document {} twice",
                        term, pair[0].doc
                    ));
                }
            }
            if let Some(last) = postings.last() {
                if last.doc as usize >= doc_count {
                    return Err(format!(
                        "term '{}' references document {} but only {} are registered",
                        term, last.doc, doc_count
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Merge-join a candidate list against a posting list, both sorted by doc.
fn intersect(candidates: &[(u32, u32)], list: &[Posting]) -> Vec<(u32, u32)> {
    let mut out = Vec::with_capacity(candidates.len().min(list.len()));
    let (mut i, mut j) = (0, 0);
    while i < candidates.len() && j < list.len() {
        let (doc, rank) = candidates[i];
        match doc.cmp(&list[j].doc) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push((doc, rank + u32::from(list[j].slot)));
                i += 1;
                j += 1;
            }
        }
    }
    out
}
