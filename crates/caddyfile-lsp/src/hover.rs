//! Hover lookup for the word under the cursor.

use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position, Range};

use crate::docs;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// The word (letters, digits, `_`, `-`) touching `character` on `line`,
/// with its start and end columns.
pub fn word_at(content: &str, line: u32, character: u32) -> Option<(String, u32, u32)> {
    let text = content.split('\n').nth(line as usize)?;
    let chars: Vec<char> = text.trim_end_matches('\r').chars().collect();
    let cursor = (character as usize).min(chars.len());

    let mut start = cursor;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = cursor;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    if start == end {
        return None;
    }

    let word = chars[start..end].iter().collect();
    Some((word, start as u32, end as u32))
}

/// Hover documentation for the word at `position`, if it names something
/// documented.
pub fn hover_at(content: &str, position: Position) -> Option<Hover> {
    let (word, start, end) = word_at(content, position.line, position.character)?;
    let value = docs::lookup(&word)?;
    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: value.to_string(),
        }),
        range: Some(Range {
            start: Position::new(position.line, start),
            end: Position::new(position.line, end),
        }),
    })
}
