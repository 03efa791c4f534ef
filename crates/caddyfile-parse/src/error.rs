//! Structural parse errors and their terminal rendering.

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::Range;

/// The kind of structural error the parser recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A `}` with no open block to close.
    UnexpectedCloseBrace,
    /// A `{` where a directive or site address was expected.
    UnexpectedOpenBrace,
    /// Site addresses not followed by `{`.
    ExpectedSiteBrace,
    /// The global options block is still open at end of input.
    UnclosedGlobalBlock,
    /// A site block is still open at end of input.
    UnclosedSiteBlock { address: String },
    /// A directive body is still open at end of input.
    UnclosedDirectiveBlock { name: String },
    /// A stray block is still open at end of input.
    UnclosedBlock,
    /// Blocks nested deeper than [`crate::MAX_DEPTH`].
    NestedTooDeeply,
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorKind::UnexpectedCloseBrace => write!(f, "unexpected '}}'"),
            ParseErrorKind::UnexpectedOpenBrace => write!(f, "unexpected '{{'"),
            ParseErrorKind::ExpectedSiteBrace => write!(f, "expected '{{' after site address(es)"),
            ParseErrorKind::UnclosedGlobalBlock => write!(f, "unclosed global options block"),
            ParseErrorKind::UnclosedSiteBlock { address } => {
                write!(f, "unclosed site block for {address:?}")
            }
            ParseErrorKind::UnclosedDirectiveBlock { name } => {
                write!(f, "unclosed block for directive {name:?}")
            }
            ParseErrorKind::UnclosedBlock => write!(f, "unclosed block"),
            ParseErrorKind::NestedTooDeeply => {
                write!(f, "blocks nested too deeply (limit {})", crate::MAX_DEPTH)
            }
        }
    }
}

/// A structural parse error with its source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub range: Range,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, range: Range) -> Self {
        Self { kind, range }
    }

    /// The human-readable message, as shown to editor clients.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| self.message())
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let range = self.range.char_offsets(source);
        let report = self.build_report(filename, range);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
        range: std::ops::Range<usize>,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let (label, help) = match &self.kind {
            ParseErrorKind::UnexpectedCloseBrace => {
                ("no open block to close", Some("remove this '}'"))
            }
            ParseErrorKind::UnexpectedOpenBrace => (
                "block without a directive",
                Some("a block must follow a directive name or site address"),
            ),
            ParseErrorKind::ExpectedSiteBrace => (
                "addresses end here",
                Some("add '{' at the end of the address line"),
            ),
            ParseErrorKind::UnclosedGlobalBlock
            | ParseErrorKind::UnclosedSiteBlock { .. }
            | ParseErrorKind::UnclosedDirectiveBlock { .. }
            | ParseErrorKind::UnclosedBlock => ("block opened here", Some("add a closing '}'")),
            ParseErrorKind::NestedTooDeeply => ("this block is skipped", None),
        };

        let report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(self.message())
            .with_label(
                Label::new((filename, range))
                    .with_message(label)
                    .with_color(Color::Red),
            );
        match help {
            Some(help) => report.with_help(help),
            None => report,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.range.start.line + 1,
            self.range.start.character + 1,
            self.kind
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use crate::parse;

    #[test]
    fn test_messages() {
        let (_, errors) = parse("}\n");
        assert_eq!(errors[0].message(), "unexpected '}'");

        let (_, errors) = parse("example.com {\n\treverse_proxy {\n");
        let messages: Vec<_> = errors.iter().map(|e| e.message()).collect();
        assert_eq!(
            messages,
            vec![
                "unclosed block for directive \"reverse_proxy\"",
                "unclosed site block for \"example.com\"",
            ]
        );
    }

    #[test]
    fn test_display_is_one_based() {
        let (_, errors) = parse("example.com {\n}\n}\n");
        assert_eq!(errors[0].to_string(), "3:1: unexpected '}'");
    }

    #[test]
    fn test_render() {
        let source = "example.com {\n\trespond ok\n";
        let (_, errors) = parse(source);
        assert_eq!(errors.len(), 1);
        let rendered = errors[0].render("Caddyfile", source);
        let stripped = String::from_utf8(strip_ansi_escapes::strip(rendered.as_bytes())).unwrap();
        assert!(stripped.contains("unclosed site block for \"example.com\""), "{stripped}");
        assert!(stripped.contains("block opened here"), "{stripped}");
        assert!(stripped.contains("Caddyfile"), "{stripped}");
    }
}
