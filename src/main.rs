// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use docsift::binary::{self, ArtifactSummary};
use docsift::build::{run_build, BuildSummary};
use docsift::{
    EngineConfig, FetchPolicy, ReferenceCache, SearchConfig, SearchEngine, SearchError,
    SearchResult,
};

mod cli;
use cli::display::*;
use cli::{Cli, CliError, Commands};

/// Environment variable holding the log filter (`EnvFilter` syntax).
const LOG_ENV: &str = "DOCSIFT_LOG";

/// How many skipped records `index` lists before summarizing.
const MAX_SKIPPED_SHOWN: usize = 10;

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Index { input, output } => cmd_index(&input, &output),
        Commands::Search {
            file,
            queries,
            limit,
            json,
            scores,
        } => cmd_search(file, &queries, limit, json, scores),
        Commands::Inspect { file } => cmd_inspect(&file),
    };

    if let Err(e) = outcome {
        eprintln!("❌ {}", e);
        if e.needs_rebuild() {
            eprintln!("   The artifact is unusable. Rebuild it with `docsift index`.");
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ═══════════════════════════════════════════════════════════════════════════
// INDEX
// ═══════════════════════════════════════════════════════════════════════════

fn cmd_index(input: &Path, output: &Path) -> Result<(), CliError> {
    let summary = run_build(input, output, EngineConfig::default())?;
    print_build_summary(output, &summary);
    Ok(())
}

fn print_build_summary(output: &Path, summary: &BuildSummary) {
    for err in summary.skipped.iter().take(MAX_SKIPPED_SHOWN) {
        eprintln!("⚠️  {}", err);
    }
    if summary.skipped.len() > MAX_SKIPPED_SHOWN {
        eprintln!(
            "⚠️  ... and {} more skipped records",
            summary.skipped.len() - MAX_SKIPPED_SHOWN
        );
    }

    section_top("BUILD");
    row(&field("output", &output.display().to_string()));
    row(&field("documents", &summary.documents.to_string()));
    row(&field("skipped", &summary.skipped.len().to_string()));
    row(&field("categories", &summary.categories.to_string()));
    row(&field(
        "avg content",
        &format!("{:.0} chars", summary.average_content_chars),
    ));
    row(&field(
        "size",
        &format!(
            "{} (input {})",
            format_size(summary.artifact_bytes),
            format_size(summary.input_bytes)
        ),
    ));
    row(&field("ratio", &ratio_colored(summary.compression_ratio())));
    row(&field(
        "time",
        &format!("{:.1} ms", summary.elapsed.as_secs_f64() * 1000.0),
    ));
    section_bot();
    println!("✅ Build complete");
}

// ═══════════════════════════════════════════════════════════════════════════
// SEARCH
// ═══════════════════════════════════════════════════════════════════════════

fn cmd_search(
    file: PathBuf,
    queries: &[String],
    limit: Option<usize>,
    json: bool,
    scores: bool,
) -> Result<(), CliError> {
    let mut engines: ReferenceCache<PathBuf, SearchEngine> = ReferenceCache::new();
    let mut answered: Vec<(&str, Vec<SearchResult>)> = Vec::with_capacity(queries.len());

    for query in queries {
        let engine = engines.get_or_fetch(file.clone(), FetchPolicy::PreferCached, |path| {
            SearchEngine::open(path)
        })?;
        let results = if scores {
            engine.search_scored(query, limit)?
        } else {
            engine.search(query, limit)?
        };
        if !json {
            print_results(query, &results, &engine.config().search);
        }
        answered.push((query.as_str(), results));
    }

    if json {
        let rendered = if answered.len() == 1 {
            serde_json::to_string_pretty(&answered[0].1)
        } else {
            let grouped: Vec<serde_json::Value> = answered
                .iter()
                .map(|(query, results)| serde_json::json!({ "query": query, "results": results }))
                .collect();
            serde_json::to_string_pretty(&grouped)
        };
        println!("{}", rendered?);
    }
    Ok(())
}

fn print_results(query: &str, results: &[SearchResult], config: &SearchConfig) {
    println!(
        "{} {} {}",
        styled(&[BOLD], "Results for"),
        styled(&[CYAN], &format!("\"{}\"", query)),
        styled(&[DIM], &format!("({})", results.len()))
    );
    if results.is_empty() {
        println!("  {}", styled(&[DIM], "no matches"));
        println!();
        return;
    }
    for (rank, result) in results.iter().enumerate() {
        let title = render_marks(
            &result.highlighted_title,
            &config.highlight_open,
            &config.highlight_close,
        );
        match result.score {
            Some(score) => println!("{:>3}. {}  [{}]", rank + 1, title, score_value(score)),
            None => println!("{:>3}. {}", rank + 1, title),
        }
        if !result.category.is_empty() {
            println!("     {}", styled(&[DIM], &result.category));
        }
        if !result.url.is_empty() {
            println!("     {}", styled(&[GRAY], &result.url));
        }
    }
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════
// INSPECT
// ═══════════════════════════════════════════════════════════════════════════

fn cmd_inspect(file: &Path) -> Result<(), CliError> {
    let bytes = fs::read(file).map_err(|e| SearchError::Io {
        path: file.to_path_buf(),
        source: e,
    })?;
    let summary = binary::inspect(&bytes).map_err(SearchError::from)?;
    print_inspection(file, bytes.len(), &summary);

    match summary.problem {
        Some(fault) => Err(SearchError::from(fault).into()),
        None => Ok(()),
    }
}

fn print_inspection(file: &Path, size: usize, summary: &ArtifactSummary) {
    let header = &summary.header;

    section_top("HEADER");
    row(&field("file", &file.display().to_string()));
    row(&field("size", &format_size(size)));
    row(&field(
        "version",
        &format!("{} (this build reads {})", header.version, binary::VERSION),
    ));
    row(&field(
        "flags",
        &format!(
            "{:#04x}{}",
            header.flags.bits(),
            if header.flags.is_brotli() { " brotli" } else { "" }
        ),
    ));
    row(&field("payload", &format_size(header.payload_len as usize)));
    row(&field("raw json", &format_size(header.raw_len as usize)));
    row(&field(
        "crc32",
        &format!(
            "{:08x} / {:08x} {}",
            summary.stored_crc32,
            summary.computed_crc32,
            ok_mark(summary.checksum_ok())
        ),
    ));

    if !summary.fragments.is_empty() {
        section_top("FRAGMENTS");
        for (name, len) in &summary.fragments {
            row(&field(name, &format_size(*len)));
        }
    }

    if let Some(count) = summary.document_count {
        section_top("DOCUMENTS");
        row(&field("count", &count.to_string()));
    }
    section_bot();
}
