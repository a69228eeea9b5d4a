//! Terminal style helpers using crossterm ANSI escape sequences.
//!
//! Colour is skipped when stderr is not a terminal or `NO_COLOR` is set.

use crossterm::style::{Attribute, Color, SetAttribute, SetForegroundColor};
use std::io::IsTerminal;
use std::sync::OnceLock;

fn enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal())
}

/// Wrap text in bold.
pub fn bold(text: &str) -> String {
    if !enabled() {
        return text.to_string();
    }
    format!(
        "{}{}{}",
        SetAttribute(Attribute::Bold),
        text,
        SetAttribute(Attribute::Reset)
    )
}

/// Wrap text in dim (faint).
pub fn dim(text: &str) -> String {
    if !enabled() {
        return text.to_string();
    }
    format!(
        "{}{}{}",
        SetAttribute(Attribute::Dim),
        text,
        SetAttribute(Attribute::Reset)
    )
}

/// Wrap text in a foreground color.
pub fn fg_color(text: &str, color: Color) -> String {
    if !enabled() {
        return text.to_string();
    }
    format!(
        "{}{}{}",
        SetForegroundColor(color),
        text,
        SetForegroundColor(Color::Reset)
    )
}

pub fn success(text: &str) -> String {
    bold(&fg_color(text, Color::Green))
}

pub fn error(text: &str) -> String {
    bold(&fg_color(text, Color::Red))
}

pub fn warning(text: &str) -> String {
    fg_color(text, Color::Yellow)
}
