//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escapes when stdout is
//! not a terminal.

use owo_colors::{OwoColorize, Style};
use std::fmt::Display;

/// Check mark
pub const CHECK: &str = "✓";

/// Semantic styles for CLI output
pub trait Stylize: Display + Sized {
    /// Secondary text
    fn muted(&self) -> String {
        self.style(Style::new().dimmed()).to_string()
    }

    /// Positive outcome
    fn success(&self) -> String {
        self.style(Style::new().green()).to_string()
    }

    /// Identifiers: bot names, repositories, branches
    fn accent(&self) -> String {
        self.style(Style::new().cyan()).to_string()
    }

    /// Headings
    fn emphasis(&self) -> String {
        self.style(Style::new().bold()).to_string()
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}
