//! Brace balance of runtime placeholders inside tokens.

/// Result of scanning a token's text for `{`/`}` balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderBalance {
    Balanced,
    /// A `{` is never closed.
    Unclosed,
    /// A `}` appears with no open `{`.
    UnmatchedClose,
}

impl PlaceholderBalance {
    /// The diagnostic message for an unbalanced result.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            PlaceholderBalance::Balanced => None,
            PlaceholderBalance::Unclosed => {
                Some("unclosed placeholder: '{' without matching '}'")
            }
            PlaceholderBalance::UnmatchedClose => {
                Some("unmatched '}': no opening '{' for this placeholder")
            }
        }
    }
}

/// Check that the braces in `text` pair up. `\{` and `\}` are literal.
pub fn check_placeholder_balance(text: &str) -> PlaceholderBalance {
    let mut depth = 0usize;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if matches!(chars.peek(), Some('{' | '}')) => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    return PlaceholderBalance::UnmatchedClose;
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    if depth > 0 {
        PlaceholderBalance::Unclosed
    } else {
        PlaceholderBalance::Balanced
    }
}
