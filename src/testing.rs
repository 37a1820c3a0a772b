// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit tests, integration tests, and benches.
//!
//! Always compiled but hidden from documentation.

#![doc(hidden)]

use crate::search::SearchEngine;
use crate::types::{DocumentRecord, Hierarchy};

/// A record with a URL and path derived from `id`.
pub fn make_record(id: &str, title: &str, content: &str) -> DocumentRecord {
    DocumentRecord::new(id, title, content)
        .with_url(&format!("https://docs.example.com/{}", id))
        .with_path(&format!("{}.mdx", id))
}

/// A record under `lvl0 > lvl1`.
pub fn make_record_in(id: &str, title: &str, content: &str, lvl0: &str, lvl1: &str) -> DocumentRecord {
    make_record(id, title, content).with_hierarchy(Hierarchy::new(lvl0, Some(lvl1)))
}

/// Minimal record titled `Doc <n>`.
pub fn make_record_simple(n: usize) -> DocumentRecord {
    make_record(&format!("doc-{}", n), &format!("Doc {}", n), "")
}

/// A small documentation corpus with one deprecated page.
pub fn sample_corpus() -> Vec<DocumentRecord> {
    vec![
        make_record_in(
            "sdk/camera",
            "Camera",
            "A React component that renders a preview for the device's camera.",
            "Reference",
            "Camera",
        ),
        make_record_in(
            "sdk/camera-legacy",
            "Camera (legacy)",
            "The previous camera module. Use the new camera API instead.",
            "Reference",
            "Camera",
        )
        .with_deprecated(true),
        make_record_in(
            "sdk/audio",
            "Audio Player",
            "Play sounds and stream audio from a URL.",
            "Reference",
            "Audio",
        ),
        make_record_in(
            "guides/permissions",
            "Permissions",
            "Request camera and microphone permissions at runtime.",
            "Documentation",
            "Guides",
        ),
        make_record_in(
            "guides/push-notifications",
            "Push notifications",
            "Send push notifications to devices using a token.",
            "Documentation",
            "Guides",
        ),
    ]
}

/// `count` generated records, every one mentioning `word` in its content.
pub fn generated_corpus(count: usize, word: &str) -> Vec<DocumentRecord> {
    (0..count)
        .map(|n| {
            make_record_in(
                &format!("gen/{}", n),
                &format!("Generated page {}", n),
                &format!("Page {} talks about {} in some detail.", n, word),
                "Reference",
                &format!("Section {}", n % 7),
            )
        })
        .collect()
}

/// An engine already loaded with `records`.
pub fn engine_with(records: Vec<DocumentRecord>) -> SearchEngine {
    let mut engine = SearchEngine::new();
    engine.load_documents(records);
    engine
}
