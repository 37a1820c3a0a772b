// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the docsift CLI.
//!
//! Colors only when stdout is a terminal and `NO_COLOR` is unset, so piped
//! output stays clean. Highlight markers in titles become bold yellow on a
//! terminal and are stripped otherwise.

pub const BOX_WIDTH: usize = 72;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const GRAY: &str = "\x1b[90m";

/// Check if colors should be used (TTY detection)
pub fn use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Apply styles if colors are on, otherwise return plain text
pub fn styled(styles: &[&str], text: &str) -> String {
    paint(use_colors(), styles, text)
}

fn paint(colors: bool, styles: &[&str], text: &str) -> String {
    if colors {
        format!("{}{}{}", styles.concat(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Visible length, ignoring ANSI escapes
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        match c {
            '\x1b' => in_escape = true,
            'm' if in_escape => in_escape = false,
            _ if !in_escape => len += 1,
            _ => {}
        }
    }
    len
}

/// Replace `open`/`close` markers with terminal emphasis (or nothing).
pub fn render_marks(text: &str, open: &str, close: &str) -> String {
    render_marks_with(use_colors(), text, open, close)
}

fn render_marks_with(colors: bool, text: &str, open: &str, close: &str) -> String {
    let (on, off) = if colors {
        (format!("{}{}", BOLD, YELLOW), RESET.to_string())
    } else {
        (String::new(), String::new())
    };
    text.replace(open, &on).replace(close, &off)
}

/// `┌─ LABEL ───┐`
pub fn section_top(label: &str) {
    let label_part = format!("─ {} ", styled(&[BOLD, CYAN], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("{}┌{}{}{}┐{}", gray(), reset(), label_part, gray_rule(remaining), reset());
}

/// `│ content   │`
pub fn row(content: &str) {
    let pad = BOX_WIDTH.saturating_sub(visible_len(content) + 1);
    println!("{}│{} {}{}{}│{}", gray(), reset(), content, " ".repeat(pad), gray(), reset());
}

/// `└───────────┘`
pub fn section_bot() {
    println!("{}└{}┘{}", gray(), "─".repeat(BOX_WIDTH), reset());
}

fn gray() -> &'static str {
    if use_colors() {
        GRAY
    } else {
        ""
    }
}

fn reset() -> &'static str {
    if use_colors() {
        RESET
    } else {
        ""
    }
}

fn gray_rule(width: usize) -> String {
    format!("{}{}", gray(), "─".repeat(width))
}

/// `label:  value` padded to a fixed label width
pub fn field(label: &str, value: &str) -> String {
    format!("{} {}", styled(&[DIM], &format!("{:<14}", label)), value)
}

/// Format bytes as human-readable size
pub fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Green when the artifact is smaller than its input, red otherwise
pub fn ratio_colored(ratio: f64) -> String {
    let text = format!("{:.1}%", ratio * 100.0);
    if ratio < 1.0 {
        styled(&[GREEN, BOLD], &text)
    } else {
        styled(&[RED, BOLD], &text)
    }
}

pub fn ok_mark(ok: bool) -> String {
    if ok {
        styled(&[GREEN], "ok")
    } else {
        styled(&[RED, BOLD], "MISMATCH")
    }
}

pub fn score_value(score: f64) -> String {
    styled(&[YELLOW], &format!("{:.2}", score))
}
