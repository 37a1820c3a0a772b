// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Arbitrary query strings against a small fixed corpus.

#![no_main]

use docsift::testing::{engine_with, sample_corpus};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(query) = std::str::from_utf8(data) else {
        return;
    };
    let engine = engine_with(sample_corpus());
    let results = engine.search_scored(query, Some(20)).unwrap();
    assert!(results.len() <= 20);
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
});
