//! Terminal coloring for diagnostics.
//!
//! Coloring uses the [Colored crate](https://docs.rs/colored/latest/colored/)
//!     and is only compiled in when the `color` Cargo feature is enabled.
//! Without the feature every style renders as plain text.

/// A style for a piece of diagnostic output.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Paint {
    /// The `Error:` prefix.
    Error,
    /// The title of an error.
    Title,
    /// Carets under the offending source code.
    Caret,
    /// Line numbers and the gutter.
    Gutter,
    /// Emphasized text inside notes, like a spelling suggestion.
    Emphasis,
}

#[cfg(feature = "color")]
pub(crate) fn paint(s: &str, paint: Paint) -> String {
    use colored::Colorize;
    match paint {
        Paint::Error => s.bright_red().bold().to_string(),
        Paint::Title => s.bold().to_string(),
        Paint::Caret => s.bright_yellow().bold().to_string(),
        Paint::Gutter => s.bright_blue().bold().to_string(),
        Paint::Emphasis => s.bold().to_string(),
    }
}

#[cfg(not(feature = "color"))]
pub(crate) fn paint(s: &str, _: Paint) -> String {
    s.to_string()
}
