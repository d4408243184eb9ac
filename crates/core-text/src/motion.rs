//! Cursor motion helpers.
//!
//! These operate purely on a rope + offset pair and are free of editor state.
//! Selection extension is decided by the caller; a motion only computes where
//! the cursor lands.

use ropey::Rope;

use crate::line_index::{self, LineCol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Left,
    Right,
    /// Previous line, same column clamped to that line's length.
    Up,
    /// Next line, same column clamped to that line's length.
    Down,
    LineStart,
    LineEnd,
    BufferStart,
    BufferEnd,
}

/// Offset reached by applying `motion` at `offset`. Motions that would leave
/// the buffer (left at 0, up on the first line, ...) return `offset` unchanged.
pub fn target(text: &Rope, offset: usize, motion: Motion) -> usize {
    let len = text.len_chars();
    let offset = offset.min(len);
    match motion {
        Motion::Left => offset.saturating_sub(1),
        Motion::Right => (offset + 1).min(len),
        Motion::Up => vertical(text, offset, -1),
        Motion::Down => vertical(text, offset, 1),
        Motion::LineStart => line_boundary(text, offset, line_index::line_start),
        Motion::LineEnd => line_boundary(text, offset, line_index::line_end),
        Motion::BufferStart => 0,
        Motion::BufferEnd => len,
    }
}

fn vertical(text: &Rope, offset: usize, delta: isize) -> usize {
    let Some(pos) = line_index::line_col_of(text, offset) else {
        return offset;
    };
    let Some(line) = pos.line.checked_add_signed(delta) else {
        return offset;
    };
    line_index::offset_of(text, LineCol::new(line, pos.col)).unwrap_or(offset)
}

fn line_boundary(text: &Rope, offset: usize, edge: fn(&Rope, usize) -> Option<usize>) -> usize {
    line_index::line_col_of(text, offset)
        .and_then(|pos| edge(text, pos.line))
        .unwrap_or(offset)
}
