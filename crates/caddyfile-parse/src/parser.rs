//! Recursive-descent parser for Caddyfiles.
//!
//! ```text
//! File        := GlobalBlock? SiteBlock*
//! GlobalBlock := "{" Directive* "}"
//! SiteBlock   := Address+ ("{" Directive* "}")?
//! Directive   := (Ident | String) Argument* Body?
//! Body        := "{" Directive* "}"
//! ```
//!
//! The parser never stops at the first error. Stray braces are reported and
//! skipped, blocks still open at end of input are closed there, and the tree
//! built so far is always returned.

use tracing::debug;

use crate::{
    Directive, File, GlobalBlock, ParseError, ParseErrorKind, Range, SiteBlock, Token, TokenKind,
    tokenize,
};

/// Maximum block nesting depth. Deeper blocks are skipped with an error.
pub const MAX_DEPTH: usize = 64;

/// Parse `source` into a best-effort tree and the list of structural errors.
pub fn parse(source: &str) -> (File<'_>, Vec<ParseError>) {
    Parser::new(source).parse()
}

/// Parser state over a fully tokenized source.
pub struct Parser<'src> {
    /// Token stream; always ends with exactly one EOF token.
    tokens: Vec<Token<'src>>,
    /// Index of the next token. Never moves past the EOF token.
    pos: usize,
    /// Number of currently open blocks.
    depth: usize,
    errors: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            tokens: tokenize(source),
            pos: 0,
            depth: 0,
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> &Token<'src> {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token<'src> {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn error(&mut self, kind: ParseErrorKind, range: Range) {
        debug!(%kind, line = range.start.line, "parse error");
        self.errors.push(ParseError::new(kind, range));
    }

    /// Parse the whole file.
    pub fn parse(mut self) -> (File<'src>, Vec<ParseError>) {
        let mut file = File::default();

        if self.peek().kind == TokenKind::LBrace {
            file.global = Some(self.parse_global_block());
        }

        loop {
            match self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::RBrace => {
                    let token = self.advance();
                    self.error(ParseErrorKind::UnexpectedCloseBrace, token.range());
                }
                TokenKind::LBrace => {
                    // Only the very first block can be the global block.
                    let open = self.advance();
                    self.error(ParseErrorKind::UnexpectedOpenBrace, open.range());
                    let _ = self.parse_block(&open, ParseErrorKind::UnclosedBlock);
                }
                TokenKind::Ident | TokenKind::String => {
                    let site = self.parse_site_block();
                    file.sites.push(site);
                }
            }
        }

        debug!(
            global = file.global.is_some(),
            sites = file.sites.len(),
            errors = self.errors.len(),
            "parsed file"
        );
        (file, self.errors)
    }

    fn parse_global_block(&mut self) -> GlobalBlock<'src> {
        let open = self.advance();
        let (directives, end_line) = self.parse_block(&open, ParseErrorKind::UnclosedGlobalBlock);
        GlobalBlock {
            directives,
            start_line: open.line,
            end_line,
        }
    }

    fn parse_site_block(&mut self) -> SiteBlock<'src> {
        let first = self.advance();
        let start_line = first.line;
        let address = first.value().to_string();

        // Addresses run to the end of the line, continuing onto the next
        // line only after a trailing comma.
        let mut last = first.clone();
        let mut addresses = vec![first];
        while self.peek().kind.is_word() {
            let next = self.peek();
            let continues = next.line == last.end().line || last.value().ends_with(',');
            if !continues {
                break;
            }
            last = self.advance();
            addresses.push(last.clone());
        }

        if self.peek().kind != TokenKind::LBrace {
            debug!(%address, "site addresses without a block");
            self.error(ParseErrorKind::ExpectedSiteBrace, last.range());
            return SiteBlock {
                addresses,
                directives: Vec::new(),
                start_line,
                end_line: start_line,
            };
        }

        let open = self.advance();
        let (directives, end_line) =
            self.parse_block(&open, ParseErrorKind::UnclosedSiteBlock { address });
        SiteBlock {
            addresses,
            directives,
            start_line,
            end_line,
        }
    }

    /// Parse directives up to and including the `}` that matches the already
    /// consumed `open` brace. Returns the directives and the closing line
    /// (the EOF line if the block is never closed).
    fn parse_block(
        &mut self,
        open: &Token<'src>,
        unclosed: ParseErrorKind,
    ) -> (Vec<Directive<'src>>, u32) {
        if self.depth >= MAX_DEPTH {
            self.error(ParseErrorKind::NestedTooDeeply, open.range());
            return (Vec::new(), self.skip_block());
        }

        self.depth += 1;
        let mut directives = Vec::new();
        let end_line = loop {
            let (kind, line) = (self.peek().kind, self.peek().line);
            match kind {
                TokenKind::Eof => {
                    self.error(unclosed, open.range());
                    break line;
                }
                TokenKind::RBrace => {
                    self.advance();
                    break line;
                }
                TokenKind::LBrace => {
                    // A block with no directive name: report it and keep its
                    // contents in the enclosing list.
                    let stray = self.advance();
                    self.error(ParseErrorKind::UnexpectedOpenBrace, stray.range());
                    let (inner, _) = self.parse_block(&stray, ParseErrorKind::UnclosedBlock);
                    directives.extend(inner);
                }
                TokenKind::Ident | TokenKind::String => {
                    let name = self.advance();
                    directives.push(self.parse_directive(name));
                }
            }
        };
        self.depth -= 1;

        (directives, end_line)
    }

    fn parse_directive(&mut self, name: Token<'src>) -> Directive<'src> {
        let mut args = Vec::new();
        while self.peek().kind.is_word() && self.peek().line == name.line {
            args.push(self.advance());
        }

        let start_line = name.line;
        let mut end_line = start_line;
        let mut body = Vec::new();
        let mut open_brace = None;

        if self.peek().kind == TokenKind::LBrace {
            let open = self.advance();
            let unclosed = ParseErrorKind::UnclosedDirectiveBlock {
                name: name.value().to_string(),
            };
            (body, end_line) = self.parse_block(&open, unclosed);
            open_brace = Some(open);
        }

        Directive {
            name,
            args,
            body,
            open_brace,
            start_line,
            end_line,
        }
    }

    /// Skip a block whose `{` was already consumed, through its matching `}`.
    /// Returns the line of the closing brace, or the EOF line.
    fn skip_block(&mut self) -> u32 {
        let mut depth = 1usize;
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::Eof => return token.line,
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return token.line;
                    }
                }
                TokenKind::Ident | TokenKind::String => {}
            }
        }
    }
}
