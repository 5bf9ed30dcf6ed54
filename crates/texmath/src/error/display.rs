//! Rendering of errors as diagnostics.

use super::{ParseError, TexError};
use crate::color::{paint, Paint};
use crate::token::Span;

/// Location of a byte offset as 1-indexed line and column numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

/// Computes the line and column of a byte offset in the source code.
///
/// Columns count characters, not bytes.
pub fn line_column(source: &str, offset: usize) -> LineColumn {
    let offset = floor_char_boundary(source, offset.min(source.len()));
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = source[line_start..offset].chars().count() + 1;
    LineColumn { line, column }
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

pub(crate) fn format_error(err: &ParseError, source: &str) -> String {
    let span = match err.span() {
        Some(span) => span,
        None => Span::new(source.len(), source.len()),
    };
    format_diagnostic(err, span, source)
}

fn format_diagnostic(err: &dyn TexError, span: Span, source: &str) -> String {
    let mut s = String::new();
    s.push_str(&format![
        "{} {}\n",
        paint("Error:", Paint::Error),
        paint(&err.title(), Paint::Title)
    ]);

    let LineColumn { line, column } = line_column(source, span.start);
    let line_number = line.to_string();
    let margin = " ".repeat(line_number.len());
    let bar = paint("|", Paint::Gutter);
    s.push_str(&format![
        "{}{} {}:{}\n",
        margin,
        paint("-->", Paint::Gutter),
        line,
        column
    ]);
    s.push_str(&format!["{margin} {bar}\n"]);

    let line_text = source.lines().nth(line - 1).unwrap_or("");
    s.push_str(&format![
        "{} {} {}\n",
        paint(&line_number, Paint::Gutter),
        bar,
        line_text
    ]);

    let start = floor_char_boundary(source, span.start.min(source.len()));
    let end = floor_char_boundary(source, span.end.min(source.len()));
    let remaining_on_line = line_text.chars().count().saturating_sub(column - 1);
    let width = source[start..end.max(start)]
        .chars()
        .take_while(|c| *c != '\n')
        .count()
        .min(remaining_on_line)
        .max(1);
    s.push_str(&format![
        "{} {} {}{} {}\n",
        margin,
        bar,
        " ".repeat(column - 1),
        paint(&"^".repeat(width), Paint::Caret),
        err.source_annotation(),
    ]);

    let notes = err.notes();
    if !notes.is_empty() {
        s.push_str(&format!["{margin} {bar}\n"]);
        for note in notes {
            s.push_str(&format!["{} {} {}\n", margin, paint("=", Paint::Gutter), note]);
        }
    }
    s
}
