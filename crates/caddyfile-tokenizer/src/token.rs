//! Token types for the Caddyfile lexer.

use crate::{Position, Range};

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Bareword: directive names, addresses, unquoted arguments.
    ///
    /// May contain embedded placeholders such as `{$VAR}` or `{http.request.uri}`.
    Ident,
    /// Quoted string: `"..."` or `` `...` `` (text includes the quotes).
    String,
    /// Structural `{`
    LBrace,
    /// Structural `}`
    RBrace,
    /// End of input
    Eof,
}

impl TokenKind {
    /// Whether this token can name a directive or be used as an argument.
    pub fn is_word(&self) -> bool {
        matches!(self, TokenKind::Ident | TokenKind::String)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenKind::Ident => "identifier",
            TokenKind::String => "string",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Eof => "end of input",
        })
    }
}

/// A token with its kind, position, and source text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The source text of this token, verbatim (quotes included).
    pub text: &'src str,
    /// 0-based line of the first character.
    pub line: u32,
    /// 0-based character offset of the first character on its line.
    pub char: u32,
}

impl<'src> Token<'src> {
    /// Create a new token.
    pub fn new(kind: TokenKind, text: &'src str, line: u32, char: u32) -> Self {
        Self {
            kind,
            text,
            line,
            char,
        }
    }

    /// Position of the first character.
    #[inline]
    pub fn start(&self) -> Position {
        Position::new(self.line, self.char)
    }

    /// Position just past the last character.
    ///
    /// Quoted strings may span lines, so this walks the text.
    pub fn end(&self) -> Position {
        let mut line = self.line;
        let mut char = self.char;
        for c in self.text.chars() {
            match c {
                '\n' => {
                    line += 1;
                    char = 0;
                }
                '\r' => {}
                _ => char += 1,
            }
        }
        Position::new(line, char)
    }

    /// The half-open range covered by this token.
    #[inline]
    pub fn range(&self) -> Range {
        Range::new(self.start(), self.end())
    }

    /// The token text with surrounding quotes removed.
    ///
    /// Identifiers are returned as-is. Escapes inside quoted strings are kept.
    pub fn value(&self) -> &'src str {
        if self.kind != TokenKind::String {
            return self.text;
        }
        let Some(quote) = self.text.chars().next() else {
            return self.text;
        };
        let inner = &self.text[quote.len_utf8()..];
        inner.strip_suffix(quote).unwrap_or(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_counts_chars() {
        let token = Token::new(TokenKind::Ident, "héllo", 2, 4);
        assert_eq!(
            token.range(),
            Range::new(Position::new(2, 4), Position::new(2, 9))
        );
    }

    #[test]
    fn test_range_spans_lines() {
        let token = Token::new(TokenKind::String, "\"a\nbc\"", 0, 3);
        assert_eq!(token.end(), Position::new(1, 3));
    }

    #[test]
    fn test_value_strips_quotes() {
        assert_eq!(Token::new(TokenKind::String, "\"ok\"", 0, 0).value(), "ok");
        assert_eq!(Token::new(TokenKind::String, "`raw`", 0, 0).value(), "raw");
        assert_eq!(Token::new(TokenKind::String, "\"open", 0, 0).value(), "open");
        assert_eq!(Token::new(TokenKind::Ident, "\"x\"", 0, 0).value(), "\"x\"");
    }
}
