//! Converting parse errors and analyzer findings into LSP diagnostics.

use caddyfile_analysis::{Severity, analyze};
use caddyfile_parse::parse;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};
use tracing::debug;

/// Source tag attached to every published diagnostic.
pub const SOURCE: &str = "caddy-ls";

/// Parse and analyze `content`, returning parse errors first, then analyzer
/// diagnostics, each in the order they were produced.
pub fn compute_diagnostics(content: &str) -> Vec<Diagnostic> {
    let (file, errors) = parse(content);
    let findings = analyze(&file);
    debug!(
        parse_errors = errors.len(),
        diagnostics = findings.len(),
        "computed diagnostics"
    );

    let parse_diagnostics = errors.iter().map(|error| {
        lsp_diagnostic(error.range, DiagnosticSeverity::ERROR, error.message())
    });
    let semantic_diagnostics = findings.into_iter().map(|finding| {
        let severity = match finding.severity {
            Severity::Error => DiagnosticSeverity::ERROR,
            Severity::Warning => DiagnosticSeverity::WARNING,
        };
        lsp_diagnostic(finding.range, severity, finding.message)
    });

    parse_diagnostics.chain(semantic_diagnostics).collect()
}

fn lsp_diagnostic(
    range: caddyfile_parse::Range,
    severity: DiagnosticSeverity,
    message: String,
) -> Diagnostic {
    Diagnostic {
        range: to_lsp_range(range),
        severity: Some(severity),
        code: None,
        code_description: None,
        source: Some(SOURCE.to_string()),
        message,
        related_information: None,
        tags: None,
        data: None,
    }
}

fn to_lsp_range(range: caddyfile_parse::Range) -> Range {
    Range {
        start: to_lsp_position(range.start),
        end: to_lsp_position(range.end),
    }
}

fn to_lsp_position(position: caddyfile_parse::Position) -> Position {
    Position::new(position.line, position.character)
}
