// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal palette and color detection.

use std::io::IsTerminal;

use vg_core::{LineStyle, StepStatus};

pub mod codes {
    /// Section headers: pastel cyan / steel blue
    pub const HEADER: u8 = 74;
    /// Commands and literals: light grey
    pub const LITERAL: u8 = 250;
    /// Descriptions and context: medium grey
    pub const CONTEXT: u8 = 245;
    pub const ERROR: u8 = 167;
    pub const WARNING: u8 = 179;
    pub const SUCCESS: u8 = 108;
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

const RESET: &str = "\x1b[0m";

/// Wrap `text` in a 256-color foreground escape.
pub fn paint(code: u8, text: &str) -> String {
    format!("\x1b[38;5;{code}m{text}{RESET}")
}

/// Palette entry for a line style, if it has one.
pub fn line_code(style: LineStyle) -> Option<u8> {
    match style {
        LineStyle::Plain => None,
        LineStyle::Header => Some(codes::HEADER),
        LineStyle::Info => Some(codes::CONTEXT),
        LineStyle::Error => Some(codes::ERROR),
        LineStyle::Warning => Some(codes::WARNING),
        LineStyle::Success => Some(codes::SUCCESS),
    }
}

pub fn status_code(status: StepStatus) -> u8 {
    match status {
        StepStatus::Running => codes::LITERAL,
        StepStatus::Complete => codes::SUCCESS,
        StepStatus::Error | StepStatus::Aborted => codes::ERROR,
        StepStatus::Warning => codes::WARNING,
    }
}

pub fn glyph(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Running => "»",
        StepStatus::Complete => "✓",
        StepStatus::Error => "✗",
        StepStatus::Warning => "!",
        StepStatus::Aborted => "-",
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
