// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn no_color_wins_over_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::set_var("COLOR", "1");
    assert!(!should_colorize());
    std::env::remove_var("NO_COLOR");
    std::env::remove_var("COLOR");
}

#[test]
#[serial]
fn color_forces_on() {
    std::env::remove_var("NO_COLOR");
    std::env::set_var("COLOR", "1");
    assert!(should_colorize());
    std::env::remove_var("COLOR");
}

#[test]
fn paint_wraps_and_resets() {
    assert_eq!(paint(codes::HEADER, "hi"), "\x1b[38;5;74mhi\x1b[0m");
}

#[test]
fn plain_lines_are_uncolored() {
    assert_eq!(line_code(LineStyle::Plain), None);
    assert_eq!(line_code(LineStyle::Error), Some(codes::ERROR));
}

#[yare::parameterized(
    running  = { StepStatus::Running, codes::LITERAL, "»" },
    complete = { StepStatus::Complete, codes::SUCCESS, "✓" },
    error    = { StepStatus::Error, codes::ERROR, "✗" },
    warning  = { StepStatus::Warning, codes::WARNING, "!" },
    aborted  = { StepStatus::Aborted, codes::ERROR, "-" },
)]
fn step_status_palette(status: StepStatus, code: u8, mark: &str) {
    assert_eq!(status_code(status), code);
    assert_eq!(glyph(status), mark);
}
