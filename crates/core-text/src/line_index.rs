//! Line / column addressing derived from buffer content.
//!
//! `'\n'` is the only line terminator. Ropey is built without its unicode and
//! CR line-break features, so the per-chunk line metadata it maintains counts
//! exactly the LF characters; that metadata serves as the line-start cache and
//! is refreshed by every rope edit. Nothing here is stored separately.

use ropey::Rope;

/// Zero-based line and column (columns count chars from the line start).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCol {
    pub line: usize,
    pub col: usize,
}

impl LineCol {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// `1 + number of '\n'`; an empty buffer has one line.
pub fn line_count(text: &Rope) -> usize {
    text.len_lines()
}

/// Line and column of `offset`. `None` if `offset > len_chars`.
pub fn line_col_of(text: &Rope, offset: usize) -> Option<LineCol> {
    if offset > text.len_chars() {
        return None;
    }
    // Terminators strictly before `offset`.
    let line = text.slice(..offset).len_lines() - 1;
    let col = offset - text.line_to_char(line);
    Some(LineCol { line, col })
}

/// Offset of the first char on `line`.
pub fn line_start(text: &Rope, line: usize) -> Option<usize> {
    if line >= text.len_lines() {
        return None;
    }
    Some(text.line_to_char(line))
}

/// Offset just past the last char on `line`: the position of its `'\n'`, or
/// the buffer length for the final line.
pub fn line_end(text: &Rope, line: usize) -> Option<usize> {
    let lines = text.len_lines();
    if line >= lines {
        return None;
    }
    if line + 1 < lines {
        Some(text.line_to_char(line + 1) - 1)
    } else {
        Some(text.len_chars())
    }
}

/// Number of chars on `line`, excluding the terminator.
pub fn line_len(text: &Rope, line: usize) -> Option<usize> {
    Some(line_end(text, line)? - line_start(text, line)?)
}

/// Absolute offset for a line/column pair, clamping the column to the line length.
pub fn offset_of(text: &Rope, pos: LineCol) -> Option<usize> {
    let start = line_start(text, pos.line)?;
    let len = line_len(text, pos.line)?;
    Some(start + pos.col.min(len))
}
