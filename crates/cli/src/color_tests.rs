// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn styles_returns_styled_when_color_forced() {
    std::env::set_var("COLOR", "1");
    std::env::remove_var("NO_COLOR");

    let debug = format!("{:?}", styles());
    assert_ne!(debug, format!("{:?}", Styles::plain()));
    std::env::remove_var("COLOR");
}

#[test]
#[serial]
fn styles_returns_plain_when_no_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");

    let debug = format!("{:?}", styles());
    assert_eq!(debug, format!("{:?}", Styles::plain()));
    std::env::remove_var("NO_COLOR");
}

#[test]
#[serial]
fn error_prefix_is_plain_without_color() {
    std::env::set_var("NO_COLOR", "1");
    assert_eq!(error_prefix(), "Error:");
    std::env::remove_var("NO_COLOR");
}

#[test]
#[serial]
fn error_prefix_is_painted_when_color_forced() {
    std::env::set_var("COLOR", "1");
    std::env::remove_var("NO_COLOR");
    let prefix = error_prefix();
    assert!(prefix.contains("\x1b[38;5;167m"), "{:?}", prefix);
    assert!(prefix.contains("Error:"));
    std::env::remove_var("COLOR");
}
