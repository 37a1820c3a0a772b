// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the docsift command-line interface.
//!
//! Three subcommands: `index` builds an artifact from crawler records,
//! `search` queries one, and `inspect` shows what is inside one without
//! building an index from it.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docsift::SearchError;
use thiserror::Error;

/// Errors a subcommand can end with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("failed to render JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn needs_rebuild(&self) -> bool {
        matches!(self, CliError::Search(e) if e.needs_rebuild())
    }
}

#[derive(Parser)]
#[command(
    name = "docsift",
    about = "Offline full-text search for documentation sites",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a search artifact from a JSON array of records
    Index {
        /// Records file (the crawler's search-docs.json)
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the .dsft artifact
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Search an artifact and display results
    Search {
        /// Path to .dsft file
        file: PathBuf,

        /// One or more queries, answered in order
        #[arg(required = true)]
        queries: Vec<String>,

        /// Maximum number of results per query (default 5, capped at 20)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Emit results as JSON
        #[arg(long)]
        json: bool,

        /// Include each result's score
        #[arg(long)]
        scores: bool,
    },

    /// Inspect a .dsft file structure
    Inspect {
        /// Path to .dsft file
        file: PathBuf,
    },
}
