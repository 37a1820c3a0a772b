// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Artifact import under adversarial input.
//!
//! A crafted artifact file must produce `CorruptArtifact`, never a panic or
//! an unbounded allocation.

#![no_main]

use docsift::SearchEngine;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = docsift::binary::inspect(data);

    let mut engine = SearchEngine::new();
    match engine.import_compressed(data) {
        Ok(()) => {
            // Anything that imports must also search and re-export.
            assert!(engine.is_initialized());
            let _ = engine.search("a", Some(20)).unwrap();
            engine.export_compressed().unwrap();
        }
        Err(err) => {
            assert!(err.needs_rebuild(), "unexpected error kind: {}", err);
            assert!(!engine.is_initialized());
        }
    }
});
