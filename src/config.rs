// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Engine configuration.
//!
//! Everything tunable lives here with its default. `TokenizerConfig` is the
//! odd one out: it is baked into the index at build time and travels inside
//! the artifact, because query tokenization must match index tokenization
//! exactly or partial matches silently stop working.

use serde::{Deserialize, Serialize};

/// Query-time behavior: limits, penalties, and result formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    /// Result count when the caller passes no limit (or zero).
    pub default_limit: usize,
    /// Hard cap on results, whatever the caller asks for.
    pub max_limit: usize,
    /// Multiplier applied to the score of deprecated documents.
    pub deprecation_penalty: f64,
    /// `lvl0` value too generic to show in a breadcrumb.
    pub placeholder_category: String,
    pub highlight_open: String,
    pub highlight_close: String,
    /// Query terms shorter than this (in characters) are never highlighted.
    pub min_highlight_chars: usize,
    pub category_separator: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 5,
            max_limit: 20,
            deprecation_penalty: 0.3,
            placeholder_category: "Documentation".to_string(),
            highlight_open: "<mark>".to_string(),
            highlight_close: "</mark>".to_string(),
            min_highlight_chars: 2,
            category_separator: " > ".to_string(),
        }
    }
}

impl SearchConfig {
    /// Resolve a caller-supplied limit: absent or zero means the default,
    /// anything above `max_limit` is clamped.
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        let limit = match requested {
            None | Some(0) => self.default_limit,
            Some(n) => n,
        };
        limit.clamp(1, self.max_limit.max(1))
    }
}

/// Index-time tokenization. Persisted in the artifact's `cfg` fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenizerConfig {
    /// Number of position buckets per field. Slot 0 is the start of the field.
    pub resolution: u8,
    /// Words are truncated to this many characters before substring expansion.
    pub max_word_chars: usize,
    /// Shortest substring emitted as a token.
    pub min_token_chars: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            resolution: 3,
            max_word_chars: 40,
            min_token_chars: 1,
        }
    }
}

impl TokenizerConfig {
    /// Reject settings that would make the tokenizer emit nothing or divide by zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution == 0 {
            return Err("resolution must be at least 1".to_string());
        }
        if self.max_word_chars == 0 {
            return Err("maxWordChars must be at least 1".to_string());
        }
        if self.min_token_chars == 0 || self.min_token_chars > self.max_word_chars {
            return Err(format!(
                "minTokenChars must be in 1..={}, got {}",
                self.max_word_chars, self.min_token_chars
            ));
        }
        Ok(())
    }
}

/// Brotli parameters for the artifact payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressionConfig {
    /// 0..=11; 11 is maximum ratio.
    pub quality: u32,
    /// Log2 of the sliding window, 10..=24.
    pub lgwin: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            quality: 11,
            lgwin: 22,
        }
    }
}

/// All engine settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub tokenizer: TokenizerConfig,
    pub compression: CompressionConfig,
}
