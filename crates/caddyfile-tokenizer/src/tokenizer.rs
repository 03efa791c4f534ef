//! Tokenizer for the Caddyfile configuration language.

use crate::{Token, TokenKind};
use tracing::trace;

/// A tokenizer that produces tokens from Caddyfile source text.
///
/// Whitespace, newlines and `#` comments are consumed but never emitted.
/// Every token records the 0-based line and character of its first character.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: usize,
    /// Current 0-based line.
    line: u32,
    /// Current 0-based character on the line.
    char: u32,
    /// Set once the EOF token has been produced by the iterator.
    done: bool,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            line: 0,
            char: 0,
            done: false,
        }
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the nth character (0-indexed) without consuming.
    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Advance by one character and return it, keeping line/char in sync.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        self.remaining = &self.remaining[c.len_utf8()..];
        match c {
            '\n' => {
                self.line += 1;
                self.char = 0;
            }
            '\r' => {}
            _ => self.char += 1,
        }
        Some(c)
    }

    /// Create a token from the given start byte to the current position.
    fn token(&self, kind: TokenKind, start: usize, line: u32, char: u32) -> Token<'src> {
        let text = &self.source[start..self.pos];
        trace!("Token {:?} at {}:{}: {:?}", kind, line, char, text);
        Token::new(kind, text, line, char)
    }

    /// Skip whitespace, newlines, carriage returns and comments.
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\n' | '\r' => {
                    self.advance();
                }
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Get the next token. Returns an EOF token once input is exhausted.
    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_trivia();

        let (start, line, char) = (self.pos, self.line, self.char);
        let Some(c) = self.peek() else {
            return self.token(TokenKind::Eof, start, line, char);
        };

        match c {
            '}' => {
                self.advance();
                self.token(TokenKind::RBrace, start, line, char)
            }
            // A `{` is structural only when it stands alone; otherwise it
            // opens a placeholder such as `{$VAR}` or `{http.request.uri}`.
            '{' if self.at_structural_open() => {
                self.advance();
                self.token(TokenKind::LBrace, start, line, char)
            }
            '"' => self.tokenize_quoted('"', true),
            '`' => self.tokenize_quoted('`', false),
            _ => self.tokenize_bareword(),
        }
    }

    /// Whether the `{` under the cursor is followed by whitespace, `}` or EOF.
    fn at_structural_open(&self) -> bool {
        match self.peek_nth(1) {
            None | Some('}') => true,
            Some(c) => is_space(c),
        }
    }

    /// Tokenize a bareword: a maximal run of non-whitespace characters.
    ///
    /// Braces inside the run (placeholders) are swallowed into the token.
    fn tokenize_bareword(&mut self) -> Token<'src> {
        let (start, line, char) = (self.pos, self.line, self.char);
        while let Some(c) = self.peek() {
            if is_space(c) {
                break;
            }
            self.advance();
        }
        self.token(TokenKind::Ident, start, line, char)
    }

    /// Tokenize a quoted string through its closing quote, or to end of input
    /// if unterminated.
    fn tokenize_quoted(&mut self, quote: char, escapes: bool) -> Token<'src> {
        let (start, line, char) = (self.pos, self.line, self.char);

        // Consume opening quote
        self.advance();

        while let Some(c) = self.advance() {
            if c == quote {
                break;
            }
            if escapes && c == '\\' {
                // Escape sequence - consume the escaped char too
                self.advance();
            }
        }

        self.token(TokenKind::String, start, line, char)
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    /// Yields every token including the final EOF, then `None`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.done = true;
        }
        Some(token)
    }
}

/// Tokenize `source` into a vector that always ends with exactly one EOF token.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Tokenizer::new(source).collect()
}

/// Characters that separate tokens.
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}
