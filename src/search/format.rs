// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Turning a stored record into a display-ready `SearchResult`.

use std::ops::Range;

use crate::config::SearchConfig;
use crate::types::{DocumentRecord, SearchResult};
use crate::utils::{normalize, split_words};

/// Hydrate one hit.
pub fn to_result(
    record: &DocumentRecord,
    query: &str,
    score: Option<f64>,
    config: &SearchConfig,
) -> SearchResult {
    SearchResult {
        id: record.id.clone(),
        title: record.title.clone(),
        highlighted_title: highlight(&record.title, query, config),
        category: category(record, config),
        url: record.url.clone(),
        path: record.path.clone(),
        score,
    }
}

/// Wrap every occurrence of each query term in `text`.
///
/// Terms are split and normalized exactly like search terms, so anything
/// that made a title match gets marked: punctuation separates words, case
/// and diacritics are folded. Terms shorter than `min_highlight_chars` are
/// ignored. Matches from different terms that overlap or touch are merged
/// into one marked span, so markers never nest and a marker's own text is
/// never matched. The original text is kept as is.
pub fn highlight(text: &str, query: &str, config: &SearchConfig) -> String {
    let normalized = normalize(query);
    let terms: Vec<Vec<char>> = split_words(&normalized)
        .map(|t| t.chars().collect::<Vec<char>>())
        .filter(|t| t.len() >= config.min_highlight_chars.max(1))
        .collect();
    if terms.is_empty() || text.is_empty() {
        return text.to_string();
    }

    let folded = fold_for_match(text);
    let lowered: Vec<char> = folded.iter().map(|&(c, _)| c).collect();

    let mut spans: Vec<Range<usize>> = Vec::new();
    for term in &terms {
        if term.len() > lowered.len() {
            continue;
        }
        for start in 0..=lowered.len() - term.len() {
            if lowered[start..start + term.len()] == term[..] {
                let first = &folded[start].1;
                let last = &folded[start + term.len() - 1].1;
                spans.push(first.start..last.end);
            }
        }
    }
    if spans.is_empty() {
        return text.to_string();
    }

    let spans = merge_spans(spans);
    let mut out = String::with_capacity(
        text.len() + spans.len() * (config.highlight_open.len() + config.highlight_close.len()),
    );
    let mut cursor = 0;
    for span in spans {
        out.push_str(&text[cursor..span.start]);
        out.push_str(&config.highlight_open);
        out.push_str(&text[span.clone()]);
        out.push_str(&config.highlight_close);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Normalized characters of `text`, each paired with the byte range of the
/// source character it came from. One source character may fold to several
/// or to none; a character that folds away (a combining mark) is absorbed
/// into the range of the character before it.
fn fold_for_match(text: &str) -> Vec<(char, Range<usize>)> {
    let mut folded: Vec<(char, Range<usize>)> = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for (start, c) in text.char_indices() {
        let end = start + c.len_utf8();
        let normalized = normalize(c.encode_utf8(&mut buf));
        if normalized.is_empty() {
            if let Some(owner) = folded.last().map(|(_, r)| r.start) {
                for (_, range) in folded.iter_mut().rev().take_while(|(_, r)| r.start == owner) {
                    range.end = end;
                }
            }
            continue;
        }
        for n in normalized.chars() {
            folded.push((n, start..end));
        }
    }
    folded
}

/// Sort and coalesce overlapping or adjacent byte ranges.
fn merge_spans(mut spans: Vec<Range<usize>>) -> Vec<Range<usize>> {
    spans.sort_by_key(|s| (s.start, s.end));
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Breadcrumb for a record.
///
/// `lvl0` is skipped when it is the generic placeholder; `lvl1` and `lvl2`
/// are skipped when they just repeat the title. `lvl3` never appears.
pub fn category(record: &DocumentRecord, config: &SearchConfig) -> String {
    let h = &record.hierarchy;
    let mut parts: Vec<&str> = Vec::with_capacity(3);
    if let Some(lvl0) = non_empty(&h.lvl0) {
        if lvl0 != config.placeholder_category {
            parts.push(lvl0);
        }
    }
    for level in [&h.lvl1, &h.lvl2] {
        if let Some(text) = non_empty(level) {
            if text != record.title {
                parts.push(text);
            }
        }
    }
    parts.join(&config.category_separator)
}

fn non_empty(level: &Option<String>) -> Option<&str> {
    level.as_deref().filter(|s| !s.is_empty())
}
