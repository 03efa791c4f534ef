//! A tokenizer for Caddyfiles

mod position;
pub use position::{Position, Range};

mod token;
pub use token::{Token, TokenKind};

mod tokenizer;
pub use tokenizer::{Tokenizer, tokenize};
