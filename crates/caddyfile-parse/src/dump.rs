//! Indented outline of a parsed file, used by `caddy-ls tree` and snapshot tests.

use std::fmt::Write;

use crate::{Directive, File, Token};

/// Render `file` as an indented outline.
///
/// Blocks, including ones closed on their opening line, show their line span
/// as `[start-end]` (0-based). Token text is shown verbatim, quotes included.
pub fn outline(file: &File<'_>) -> String {
    let mut out = String::new();
    if let Some(global) = &file.global {
        let _ = writeln!(out, "global [{}-{}]", global.start_line, global.end_line);
        write_directives(&mut out, &global.directives, 1);
    }
    for site in &file.sites {
        let kind = if site.is_snippet() { "snippet" } else { "site" };
        let _ = writeln!(
            out,
            "{kind} {} [{}-{}]",
            join(&site.addresses),
            site.start_line,
            site.end_line
        );
        write_directives(&mut out, &site.directives, 1);
    }
    out
}

fn join(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(|t| t.text).collect::<Vec<_>>().join(" ")
}

fn write_directives(out: &mut String, directives: &[Directive<'_>], depth: usize) {
    for directive in directives {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}{}", directive.name.text);
        if !directive.args.is_empty() {
            let _ = write!(out, " {}", join(&directive.args));
        }
        if directive.open_brace.is_some() {
            let _ = write!(out, " [{}-{}]", directive.start_line, directive.end_line);
        }
        out.push('\n');
        write_directives(out, &directive.body, depth + 1);
    }
}
