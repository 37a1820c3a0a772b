// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Building an artifact from the crawler's records file.
//!
//! Input is a JSON array of records (the crawler's `search-docs.json`).
//! Each element is decoded on its own, so one bad record costs one record,
//! not the build. Malformed elements are reported with their position in
//! the input array.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::EngineConfig;
use crate::error::{Result, SearchError};
use crate::search::SearchEngine;
use crate::types::DocumentRecord;

/// What a build produced.
#[derive(Debug)]
pub struct BuildSummary {
    pub documents: usize,
    /// Input elements that were not indexed, by input position.
    pub skipped: Vec<SearchError>,
    /// Distinct `lvl0` values.
    pub categories: usize,
    pub average_content_chars: f64,
    pub input_bytes: usize,
    pub artifact_bytes: usize,
    pub elapsed: Duration,
}

impl BuildSummary {
    /// Artifact size over input size.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.artifact_bytes as f64 / self.input_bytes as f64
        }
    }
}

/// Records decoded from an input file, each with its position in the array.
#[derive(Debug, Default)]
pub struct ParsedRecords {
    pub records: Vec<DocumentRecord>,
    pub positions: Vec<usize>,
    pub malformed: Vec<SearchError>,
}

/// Decode a JSON array of records, element by element.
pub fn parse_records(json: &str) -> Result<ParsedRecords> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| SearchError::InvalidInput(e.to_string()))?;

    let mut parsed = ParsedRecords::default();
    for (position, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<DocumentRecord>(value) {
            Ok(record) => {
                parsed.records.push(record);
                parsed.positions.push(position);
            }
            Err(e) => parsed.malformed.push(SearchError::MalformedRecord {
                position,
                reason: e.to_string(),
            }),
        }
    }
    Ok(parsed)
}

/// Read `input`, index it, and write the artifact to `output`.
pub fn run_build(input: &Path, output: &Path, config: EngineConfig) -> Result<BuildSummary> {
    let start = Instant::now();

    #[cfg(feature = "parallel")]
    let spinner = create_spinner();

    #[cfg(feature = "parallel")]
    spinner.set_message(format!("reading {}", input.display()));
    let json = fs::read_to_string(input).map_err(|e| SearchError::io(input, e))?;
    let parsed = parse_records(&json)?;

    #[cfg(feature = "parallel")]
    spinner.set_message(format!("indexing {} records", parsed.records.len()));
    let mut engine = SearchEngine::with_config(config);
    let report = engine.load_documents(parsed.records);

    // Load positions are relative to the parsed subset; map them back.
    let mut skipped = parsed.malformed;
    for err in report.skipped {
        skipped.push(match err {
            SearchError::MalformedRecord { position, reason } => SearchError::MalformedRecord {
                position: parsed.positions.get(position).copied().unwrap_or(position),
                reason,
            },
            other => other,
        });
    }
    skipped.sort_by_key(|e| match e {
        SearchError::MalformedRecord { position, .. } => *position,
        _ => usize::MAX,
    });

    #[cfg(feature = "parallel")]
    spinner.set_message(format!("writing {}", output.display()));
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SearchError::io(parent, e))?;
    }
    let artifact_bytes = engine.write_artifact(output)?;

    #[cfg(feature = "parallel")]
    spinner.finish_and_clear();

    let stats = engine.stats();
    tracing::info!(
        documents = stats.documents,
        skipped = skipped.len(),
        artifact_bytes,
        "build complete"
    );

    Ok(BuildSummary {
        documents: stats.documents,
        skipped,
        categories: stats.categories,
        average_content_chars: stats.average_content_chars,
        input_bytes: json.len(),
        artifact_bytes,
        elapsed: start.elapsed(),
    })
}

#[cfg(feature = "parallel")]
fn create_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
