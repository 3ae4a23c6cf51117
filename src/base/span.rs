//! Byte ranges and line/column conversion.

use std::fmt;

pub use text_size::TextRange;
pub use text_size::TextSize;

/// A 0-indexed line and byte column, displayed 1-indexed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct LineCol {
    pub line: u32,
    /// Column in UTF-8 bytes from the start of the line.
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

/// Maps byte offsets of one file to line/column positions.
#[derive(Clone, Debug)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(TextSize::from(0))
            .chain(
                text.match_indices('\n')
                    .map(|(offset, _)| TextSize::from((offset + 1) as u32)),
            )
            .collect();
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Line/column of `offset`. Offsets past the end clamp to the end of the text.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        LineCol {
            line: line as u32,
            col: (offset - self.line_starts[line]).into(),
        }
    }

    /// Byte offset of a line/column, if the line exists.
    pub fn offset(&self, pos: LineCol) -> Option<TextSize> {
        let start = *self.line_starts.get(pos.line as usize)?;
        Some((start + TextSize::from(pos.col)).min(self.len))
    }

    /// Number of lines, counting a trailing empty line after a final newline.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_is_displayed_one_indexed() {
        assert_eq!(LineCol::new(0, 0).to_string(), "1:1");
        assert_eq!(LineCol::new(3, 7).to_string(), "4:8");
    }

    #[test]
    fn test_line_col_across_lines() {
        let index = LineIndex::new("import 'a.dart';\nclass A {}\n");

        assert_eq!(index.line_col(TextSize::from(0)), LineCol::new(0, 0));
        assert_eq!(index.line_col(TextSize::from(17)), LineCol::new(1, 0));
        assert_eq!(index.line_col(TextSize::from(23)), LineCol::new(1, 6));
        assert_eq!(index.line_count(), 3);
    }

    #[test]
    fn test_line_col_clamps_past_end() {
        let index = LineIndex::new("ab");
        assert_eq!(index.line_col(TextSize::from(40)), LineCol::new(0, 2));
    }

    #[test]
    fn test_offset_roundtrips_line_col() {
        let index = LineIndex::new("one\ntwo\nthree");

        assert_eq!(index.offset(LineCol::new(2, 1)), Some(TextSize::from(9)));
        assert_eq!(index.offset(LineCol::new(9, 0)), None);
    }
}
