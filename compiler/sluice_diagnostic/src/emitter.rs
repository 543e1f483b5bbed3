//! Terminal rendering of diagnostics through `ariadne`.
//!
//! Output is uncolored so it can be compared in tests and written to logs.

use std::ops::Range;

use ariadne::{Config, Label as ReportLabel, Report, ReportKind, Source};

use crate::{Diagnostic, Severity};

/// Render one diagnostic against the chain source it refers to.
///
/// Falls back to the plain `Display` form if the report cannot be written.
pub fn render(source: &str, diagnostic: &Diagnostic) -> String {
    let offset = diagnostic
        .primary_span()
        .map_or(0, |span| clamp(span.to_range(), source.len()).start);
    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };

    let mut builder = Report::<Range<usize>>::build(kind, (), offset)
        .with_config(Config::default().with_color(false))
        .with_code(diagnostic.code)
        .with_message(&diagnostic.message);

    for label in &diagnostic.labels {
        builder = builder.with_label(
            ReportLabel::new(clamp(label.span.to_range(), source.len()))
                .with_message(&label.message),
        );
    }
    if !diagnostic.notes.is_empty() {
        builder = builder.with_note(diagnostic.notes.join("\n"));
    }
    if !diagnostic.suggestions.is_empty() {
        builder = builder.with_help(diagnostic.suggestions.join("\n"));
    }

    let mut out = Vec::new();
    match builder
        .finish()
        .write(Source::from(source.to_string()), &mut out)
    {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => diagnostic.to_string(),
    }
}

/// Render several diagnostics, separated by blank lines.
pub fn render_all(source: &str, diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| render(source, d))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep label ranges inside the source; end-of-input spans point one past it.
fn clamp(range: Range<usize>, len: usize) -> Range<usize> {
    let start = range.start.min(len);
    let end = range.end.clamp(start, len);
    start..end
}
