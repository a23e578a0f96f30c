//! Error rendering using ariadne
//!
//! This module draws an [`EvalError`] under the part of the source it
//! points at, with the error code and an optional hint.

use crate::EvalError;
use ariadne::{ColorGenerator, Config, IndexType, Label, Report, ReportKind, Source};
use std::io::Write;
use std::ops::Range;

const SOURCE_ID: &str = "<input>";

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use tally::{Engine, EngineOptions, render_error};
///
/// let engine = Engine::new(EngineOptions::default());
///
/// let source = "1 + foo(2)";
/// if let Err(e) = engine.evaluate(source) {
///     render_error(source, &e);
/// }
/// ```
pub fn render_error(source: &str, error: &EvalError) {
    render_error_to_writer(source, error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
///
/// This is useful when you want to control where the error is written,
/// such as to a file, a buffer, or a custom output stream.
pub fn render_error_to(
    source: &str,
    error: &EvalError,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    render_error_to_writer(source, error, writer, use_color)
}

/// Render an error to a String (useful for logs, web UIs, etc.)
///
/// # Example
/// ```
/// use tally::{evaluate, render_error_to_string};
///
/// let source = "1 / 0";
/// let err = evaluate(source).unwrap_err();
/// let formatted = render_error_to_string(source, &err);
/// assert!(formatted.contains("division by zero"));
/// ```
pub fn render_error_to_string(source: &str, error: &EvalError) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(source, error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
///
/// This is the same as `render_error_to_string` but without ANSI color codes,
/// making the output easier to compare in tests.
pub fn render_error_to_string_no_color(source: &str, error: &EvalError) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(source, error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Widen an empty span to the character under it so the label is visible.
fn label_range(source: &str, span: Range<usize>) -> Range<usize> {
    if span.start < span.end || span.start >= source.len() {
        return span;
    }
    let width = source[span.start..]
        .chars()
        .next()
        .map(char::len_utf8)
        .unwrap_or(0);
    span.start..span.start + width
}

fn render_error_to_writer(
    source: &str,
    error: &EvalError,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let message = error.to_string();
    let span = error.span().map(|s| label_range(source, s.0.clone()));

    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let location = span.clone().unwrap_or(0..0);
    let mut report = Report::build(ReportKind::Error, (SOURCE_ID, location))
        .with_message(&message)
        .with_code(error.code())
        .with_config(
            Config::default()
                .with_color(use_color)
                .with_index_type(IndexType::Byte),
        );

    if let Some(span) = span {
        report = report.with_label(
            Label::new((SOURCE_ID, span))
                .with_message(&message)
                .with_color(colors.next()),
        );
    }

    if let Some(help) = error.help() {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((SOURCE_ID, Source::from(source)), &mut *writer)
}
