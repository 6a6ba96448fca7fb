// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use vg_terminal::color::{codes, paint, should_colorize};

/// Build clap `Styles` using the project palette.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .header(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER)))))
        .literal(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::LITERAL)))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::CONTEXT)))))
        .error(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::ERROR)))))
}

/// The `Error:` prefix for a one-line failure message on stderr.
pub fn error_prefix() -> String {
    if should_colorize() {
        paint(codes::ERROR, "Error:")
    } else {
        "Error:".to_string()
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
