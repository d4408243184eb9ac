//! Rope-based text buffer with a cursor and an optional selection anchor.
//!
//! Offsets throughout this crate are character offsets into the rope (not
//! bytes). The buffer enforces a configured upper bound on its length: an edit
//! whose result would reach `max_chars` fails with
//! [`BufferError::CapacityExceeded`] before anything is changed, so callers
//! never observe a partially applied insert.
//!
//! Line addressing lives in [`line_index`]; cursor movement in [`motion`].
//! Undo history and selection state transitions are layered on top by
//! `core-state`.

use std::ops::Range;

use ropey::Rope;
use tracing::trace;

mod error;
pub mod line_index;
pub mod motion;

pub use error::BufferError;
pub use line_index::LineCol;
pub use motion::Motion;

/// Default upper bound on buffer length in characters.
pub const DEFAULT_MAX_CHARS: usize = 10_000;

/// Editable text plus cursor, selection anchor and modified flag.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
    cursor: usize,
    anchor: Option<usize>,
    modified: bool,
    max_chars: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

impl TextBuffer {
    /// Empty buffer bounded by `max_chars`.
    pub fn new(max_chars: usize) -> Self {
        Self {
            rope: Rope::new(),
            cursor: 0,
            anchor: None,
            modified: false,
            max_chars,
        }
    }

    /// Construct a buffer holding `content` with the cursor at the start.
    pub fn from_str(content: &str, max_chars: usize) -> Result<Self, BufferError> {
        let mut buf = Self::new(max_chars);
        buf.replace_all(content)?;
        Ok(buf)
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Borrow the underlying rope (read-only).
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Full content as an owned string.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Place the cursor, clamping to the buffer length.
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.len_chars());
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn line_count(&self) -> usize {
        line_index::line_count(&self.rope)
    }

    /// Content of line `idx` without its terminating newline.
    pub fn line(&self, idx: usize) -> Option<String> {
        let start = line_index::line_start(&self.rope, idx)?;
        let end = line_index::line_end(&self.rope, idx)?;
        Some(self.rope.slice(start..end).to_string())
    }

    /// Fails if adding `added` chars would reach the capacity bound.
    pub fn check_insert(&self, added: usize) -> Result<(), BufferError> {
        self.check_len(self.len_chars() + added)
    }

    /// Fails if replacing the current selection with `added` chars would reach
    /// the capacity bound.
    pub fn check_replace(&self, added: usize) -> Result<(), BufferError> {
        let removed = self.selected_range().map_or(0, |r| r.len());
        self.check_len(self.len_chars() - removed + added)
    }

    fn check_len(&self, requested: usize) -> Result<(), BufferError> {
        if requested >= self.max_chars {
            return Err(BufferError::CapacityExceeded {
                requested,
                max: self.max_chars,
            });
        }
        Ok(())
    }

    fn check_offset(&self, offset: usize) -> Result<(), BufferError> {
        let len = self.len_chars();
        if offset > len {
            return Err(BufferError::OffsetOutOfRange { offset, len });
        }
        Ok(())
    }

    /// Keep `anchor <= len` after content shrinks.
    fn clamp_anchor(&mut self) {
        let len = self.len_chars();
        if let Some(a) = self.anchor.as_mut() {
            *a = (*a).min(len);
        }
    }

    /// Splice `text` in at `offset` and move the cursor just past it.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), BufferError> {
        self.check_offset(offset)?;
        let added = text.chars().count();
        self.check_insert(added)?;
        self.rope.insert(offset, text);
        self.cursor = offset + added;
        self.modified = true;
        trace!(target: "text.buffer", offset, added, len = self.len_chars(), "insert");
        Ok(())
    }

    /// Remove the char before `offset` (backspace). Returns false at offset 0.
    pub fn delete(&mut self, offset: usize) -> Result<bool, BufferError> {
        self.check_offset(offset)?;
        if offset == 0 {
            return Ok(false);
        }
        self.rope.remove(offset - 1..offset);
        self.cursor = offset - 1;
        self.modified = true;
        self.clamp_anchor();
        trace!(target: "text.buffer", offset, len = self.len_chars(), "delete");
        Ok(true)
    }

    /// Remove the char at `offset`. Returns false when `offset` is at the end.
    pub fn delete_forward(&mut self, offset: usize) -> Result<bool, BufferError> {
        self.check_offset(offset)?;
        if offset >= self.len_chars() {
            return Ok(false);
        }
        self.rope.remove(offset..offset + 1);
        self.cursor = offset;
        self.modified = true;
        self.clamp_anchor();
        trace!(target: "text.buffer", offset, len = self.len_chars(), "delete_forward");
        Ok(true)
    }

    pub fn set_selection_anchor(&mut self, offset: usize) -> Result<(), BufferError> {
        self.check_offset(offset)?;
        self.anchor = Some(offset);
        Ok(())
    }

    /// Drop the anchor at the cursor unless a selection is already in progress.
    pub fn ensure_anchor(&mut self) {
        if self.anchor.is_none() {
            self.anchor = Some(self.cursor);
        }
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// Normalized `[lo, hi)` range between anchor and cursor, if an anchor is set.
    pub fn selected_range(&self) -> Option<Range<usize>> {
        self.anchor
            .map(|a| a.min(self.cursor)..a.max(self.cursor))
    }

    /// Text inside the selection; empty when nothing is selected.
    pub fn extract_selected(&self) -> String {
        match self.selected_range() {
            Some(r) => self.rope.slice(r).to_string(),
            None => String::new(),
        }
    }

    /// Replace the selected range with `text` (plain insert at the cursor when
    /// nothing is selected). Capacity is checked against the length after the
    /// removal; on failure nothing changes.
    pub fn replace_selected_with(&mut self, text: &str) -> Result<(), BufferError> {
        let added = text.chars().count();
        self.check_replace(added)?;
        let range = self
            .selected_range()
            .unwrap_or(self.cursor..self.cursor);
        if !range.is_empty() {
            self.rope.remove(range.clone());
        }
        self.rope.insert(range.start, text);
        self.cursor = range.start + added;
        self.anchor = None;
        self.modified = true;
        trace!(target: "text.buffer", start = range.start, removed = range.len(), added, "replace_selected");
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(0);
        self.cursor = self.len_chars();
    }

    /// Swap in new content wholesale (file open / new file). Resets cursor,
    /// selection and the modified flag.
    pub fn replace_all(&mut self, content: &str) -> Result<(), BufferError> {
        self.check_len(content.chars().count())?;
        self.rope = Rope::from_str(content);
        self.cursor = 0;
        self.anchor = None;
        self.modified = false;
        Ok(())
    }

    /// Reinstate previously captured content (undo/redo). The selection is dropped.
    pub fn restore(&mut self, content: &Rope, cursor: usize) {
        self.rope = content.clone();
        self.cursor = cursor.min(self.rope.len_chars());
        self.anchor = None;
    }
}
