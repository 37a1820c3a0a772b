// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Full-substring tokenization.
//!
//! Every contiguous substring of every word becomes a token. "camera" yields
//! "c", "ca", "cam", ..., "amera", "mera", and so on. That is a lot of tokens,
//! but it turns partial-word queries ("cam", "permiss") into a single exact
//! map lookup, and documentation users type partial words constantly.
//!
//! Index text and query text share `normalize` + `split_words`, so matching
//! is symmetric. The only difference: queries keep whole words (truncated the
//! same way) instead of expanding into substrings.

use std::collections::HashMap;

use crate::config::TokenizerConfig;
use crate::utils::{normalize, split_words};

/// Token → best (lowest) resolution slot within one field of one document.
pub type FieldTokens = HashMap<String, u8>;

/// Tokenize one field's text.
pub fn tokenize_field(text: &str, config: &TokenizerConfig) -> FieldTokens {
    let normalized = normalize(text);
    let words: Vec<&str> = split_words(&normalized).collect();
    let word_count = words.len();

    let mut tokens = FieldTokens::new();
    for (position, word) in words.iter().enumerate() {
        let slot = resolution_slot(position, word_count, config.resolution);
        for token in substrings(word, config) {
            tokens
                .entry(token)
                .and_modify(|best| *best = (*best).min(slot))
                .or_insert(slot);
        }
    }
    tokens
}

/// Bucket a word position into `resolution` slots. Slot 0 is the start of the field.
pub fn resolution_slot(position: usize, word_count: usize, resolution: u8) -> u8 {
    if word_count == 0 || resolution <= 1 {
        return 0;
    }
    let slot = position * resolution as usize / word_count;
    slot.min(resolution as usize - 1) as u8
}

/// All substrings of `word` (truncated to `max_word_chars`) at least
/// `min_token_chars` long.
fn substrings(word: &str, config: &TokenizerConfig) -> Vec<String> {
    let chars: Vec<char> = word.chars().take(config.max_word_chars).collect();
    let n = chars.len();
    let min = config.min_token_chars.max(1);

    let mut out = Vec::with_capacity(n * (n + 1) / 2);
    for start in 0..n {
        for end in (start + min)..=n {
            out.push(chars[start..end].iter().collect());
        }
    }
    out
}

/// Normalized, de-duplicated query terms in query order.
pub fn query_terms(query: &str, config: &TokenizerConfig) -> Vec<String> {
    let normalized = normalize(query);
    let mut terms: Vec<String> = Vec::new();
    for word in split_words(&normalized) {
        let term: String = word.chars().take(config.max_word_chars).collect();
        if term.chars().count() < config.min_token_chars {
            continue;
        }
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}
