//! Line/character positions in source text.
//!
//! Lines and characters are both 0-based and counted in characters (not bytes).
//! Ranges are half-open: `[start, end)`.

/// A position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// 0-based line number.
    pub line: u32,
    /// 0-based character offset on the line.
    pub character: u32,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// Convert this position to a character offset into `source`.
    ///
    /// Positions past the end of a line clamp to the end of that line; lines
    /// past the end of the source clamp to the end of the source.
    pub fn char_offset(&self, source: &str) -> usize {
        let mut offset = 0usize;
        let mut line = 0u32;
        let mut chars = source.chars().peekable();

        while line < self.line {
            match chars.next() {
                Some('\n') => {
                    line += 1;
                    offset += 1;
                }
                Some(_) => offset += 1,
                None => return offset,
            }
        }

        let mut character = 0u32;
        while character < self.character {
            match chars.peek() {
                Some('\n') | None => break,
                Some(_) => {
                    chars.next();
                    offset += 1;
                    character += 1;
                }
            }
        }
        offset
    }
}

/// A half-open range `[start, end)` in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Range {
    /// Start position (inclusive).
    pub start: Position,
    /// End position (exclusive).
    pub end: Position,
}

impl Range {
    /// Create a new range.
    #[inline]
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Whether `pos` falls inside this range (end exclusive).
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Character offsets of this range in `source`.
    pub fn char_offsets(&self, source: &str) -> std::ops::Range<usize> {
        let start = self.start.char_offset(source);
        let end = self.end.char_offset(source).max(start);
        start..end
    }
}
