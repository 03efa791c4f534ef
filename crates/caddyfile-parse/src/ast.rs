//! Syntax tree produced by the parser.
//!
//! Nodes borrow their tokens from the source text. The tree is rebuilt on
//! every parse and never mutated afterwards.

use crate::Token;

/// A parsed Caddyfile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct File<'src> {
    /// The global options block, if the file starts with one.
    pub global: Option<GlobalBlock<'src>>,
    /// Site blocks and snippets, in source order.
    pub sites: Vec<SiteBlock<'src>>,
}

impl<'src> File<'src> {
    /// Snippet declarations.
    pub fn snippets(&self) -> impl Iterator<Item = &SiteBlock<'src>> {
        self.sites.iter().filter(|site| site.is_snippet())
    }
}

/// The `{ ... }` block of global options at the top of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalBlock<'src> {
    pub directives: Vec<Directive<'src>>,
    pub start_line: u32,
    pub end_line: u32,
}

/// A site block (`example.com { ... }`) or a snippet (`(name) { ... }`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteBlock<'src> {
    /// Address tokens; never empty.
    pub addresses: Vec<Token<'src>>,
    pub directives: Vec<Directive<'src>>,
    pub start_line: u32,
    pub end_line: u32,
}

impl<'src> SiteBlock<'src> {
    /// The snippet name if the first address is `(name)`.
    pub fn snippet_name(&self) -> Option<&'src str> {
        let first = self.addresses.first()?.value();
        if first.len() > 2 {
            first.strip_prefix('(')?.strip_suffix(')')
        } else {
            None
        }
    }

    /// Whether this block declares a snippet.
    pub fn is_snippet(&self) -> bool {
        self.snippet_name().is_some()
    }
}

/// A directive: a name, the arguments on its line, and an optional body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'src> {
    pub name: Token<'src>,
    /// Tokens on the same line as the name.
    pub args: Vec<Token<'src>>,
    pub body: Vec<Directive<'src>>,
    /// The `{` opening the body block, if there is one.
    pub open_brace: Option<Token<'src>>,
    pub start_line: u32,
    /// Line of the closing `}` (or end of input); `start_line` without a block.
    pub end_line: u32,
}

impl<'src> Directive<'src> {
    /// The directive name with any quotes removed.
    pub fn name(&self) -> &'src str {
        self.name.value()
    }

    /// The first argument with any quotes removed.
    pub fn first_arg(&self) -> Option<&'src str> {
        self.args.first().map(Token::value)
    }

    /// Whether this directive has a body block spanning more than one line.
    ///
    /// A block opened and closed on the name's line (`handle { respond ok }`)
    /// still has children in `body` but doesn't count: line-based lookups
    /// can't tell it apart from the name line.
    pub fn has_body(&self) -> bool {
        self.end_line > self.start_line
    }

    /// Whether `line` is strictly inside the body, excluding the name line and
    /// the closing brace line.
    pub fn body_contains_line(&self, line: u32) -> bool {
        self.start_line < line && line < self.end_line
    }
}
