//! Semantic analysis for Caddyfiles.
//!
//! Everything here is a pure function of a parsed [`File`] and the static
//! tables in [`schema`]: [`analyze`] produces diagnostics and
//! [`resolve_completion_context`] says what may be typed at a cursor.

pub use caddyfile_parse::{File, Position, Range};

pub mod schema;

mod snippets;
pub use snippets::collect_snippet_names;

mod placeholders;
pub use placeholders::{PlaceholderBalance, check_placeholder_balance};

mod diagnostic;
pub use diagnostic::{Diagnostic, Severity};

mod analyzer;
pub use analyzer::analyze;

mod completion;
pub use completion::{CompletionContext, resolve_completion_context};
