//! Terminal styling helpers

use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;

/// Check mark glyph
pub const CHECK: &str = "✓";

/// Styled arrow used for list items
pub fn arrow() -> String {
    "→".muted()
}

/// Semantic styling, applied only when stdout supports color
pub trait Stylize {
    /// Bold
    fn emphasis(&self) -> String;
    /// Dimmed
    fn muted(&self) -> String;
    /// Cyan
    fn accent(&self) -> String;
    /// Green
    fn success(&self) -> String;
    /// Yellow
    fn warn(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn emphasis(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.bold()).to_string()
    }

    fn muted(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.dimmed()).to_string()
    }

    fn accent(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.cyan()).to_string()
    }

    fn success(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.green()).to_string()
    }

    fn warn(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.yellow()).to_string()
    }
}
