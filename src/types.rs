// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of the search engine.
//!
//! `DocumentRecord` is what the crawler hands us. `SearchResult` is what we
//! hand back. `IndexedField` names the four slices of a record that get their
//! own inverted index.
//!
//! # Invariants
//!
//! - **DocumentRecord**: `id` is non-empty. Hierarchy levels are either absent
//!   or non-empty (`Hierarchy::normalized` folds `Some("")` into `None`).
//! - **IndexedField::ALL** is the probe order. Merge tie-breaking depends on
//!   it, so reordering it changes rankings.

use serde::{Deserialize, Serialize};

// =============================================================================
// DOCUMENT TYPES
// =============================================================================

/// Up to four breadcrumb levels, most general first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lvl0: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lvl1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lvl2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lvl3: Option<String>,
}

impl Hierarchy {
    /// Build from the first two levels, the common case for doc pages.
    pub fn new(lvl0: &str, lvl1: Option<&str>) -> Self {
        Self {
            lvl0: Some(lvl0.to_string()),
            lvl1: lvl1.map(str::to_string),
            lvl2: None,
            lvl3: None,
        }
    }

    /// Fold empty strings into `None` so "present" always means "has text".
    pub fn normalized(self) -> Self {
        fn keep(level: Option<String>) -> Option<String> {
            level.filter(|s| !s.trim().is_empty())
        }
        Self {
            lvl0: keep(self.lvl0),
            lvl1: keep(self.lvl1),
            lvl2: keep(self.lvl2),
            lvl3: keep(self.lvl3),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lvl0.is_none() && self.lvl1.is_none() && self.lvl2.is_none() && self.lvl3.is_none()
    }
}

/// One crawled documentation page.
///
/// Field names serialize in camelCase so the crawler's JSON output
/// deserializes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Stable key derived from the source path.
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Plain text body, markup already stripped.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub hierarchy: Hierarchy,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deprecated: Option<bool>,
}

impl DocumentRecord {
    pub fn new(id: &str, title: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            hierarchy: Hierarchy::default(),
            url: String::new(),
            path: String::new(),
            is_deprecated: None,
        }
    }

    pub fn with_hierarchy(mut self, hierarchy: Hierarchy) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.is_deprecated = Some(deprecated);
        self
    }

    /// Only an explicit `true` counts; absent means current.
    pub fn deprecated(&self) -> bool {
        self.is_deprecated == Some(true)
    }

    /// Check the record invariants, returning the reason it is unusable.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("missing or empty id".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// INDEXED FIELDS
// =============================================================================

/// Which slice of a record a posting came from.
///
/// Unlike a title/heading/content weighting scheme, every field counts the
/// same: a hit in any field adds one to the document's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndexedField {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "content")]
    Content,
    #[serde(rename = "hierarchy.lvl0")]
    HierarchyLvl0,
    #[serde(rename = "hierarchy.lvl1")]
    HierarchyLvl1,
}

impl IndexedField {
    pub const COUNT: usize = 4;

    /// Probe order. Equal scores keep the order in which fields first hit.
    pub const ALL: [IndexedField; Self::COUNT] = [
        IndexedField::Title,
        IndexedField::Content,
        IndexedField::HierarchyLvl0,
        IndexedField::HierarchyLvl1,
    ];

    /// Dotted field path, also used to name artifact fragments.
    pub fn as_str(self) -> &'static str {
        match self {
            IndexedField::Title => "title",
            IndexedField::Content => "content",
            IndexedField::HierarchyLvl0 => "hierarchy.lvl0",
            IndexedField::HierarchyLvl1 => "hierarchy.lvl1",
        }
    }

    /// Position in `ALL`.
    pub fn slot(self) -> usize {
        match self {
            IndexedField::Title => 0,
            IndexedField::Content => 1,
            IndexedField::HierarchyLvl0 => 2,
            IndexedField::HierarchyLvl1 => 3,
        }
    }

    /// The text this field covers in `record`, if any.
    pub fn text(self, record: &DocumentRecord) -> Option<&str> {
        match self {
            IndexedField::Title => Some(record.title.as_str()),
            IndexedField::Content => Some(record.content.as_str()),
            IndexedField::HierarchyLvl0 => record.hierarchy.lvl0.as_deref(),
            IndexedField::HierarchyLvl1 => record.hierarchy.lvl1.as_deref(),
        }
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// A ranked hit, hydrated from the document store.
///
/// `score` is only populated by scored searches. Plain searches leave it
/// `None` and it disappears from serialized output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub highlighted_title: String,
    pub category: String,
    pub url: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}
