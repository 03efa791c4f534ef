//! Error-tolerant parser for Caddyfiles.
//!
//! [`parse`] always returns a best-effort [`File`] together with every
//! structural [`ParseError`] it recovered from.

pub use caddyfile_tokenizer::{Position, Range, Token, TokenKind, Tokenizer, tokenize};

mod ast;
pub use ast::{Directive, File, GlobalBlock, SiteBlock};

mod error;
pub use error::{ParseError, ParseErrorKind};

mod parser;
pub use parser::{MAX_DEPTH, Parser, parse};

mod dump;
pub use dump::outline;
