//! Edit session: one text buffer, its undo history, and document metadata.
//!
//! `EditSession` is the façade every collaborator talks to. The input layer
//! turns key presses and menu picks into calls on it, the renderer reads its
//! accessors once per frame, file I/O swaps content in and out, and the
//! process runner takes `serialize_for_execution()`.
//!
//! History contract:
//! - Every mutating operation pushes the *pre-mutation* snapshot right before
//!   the buffer changes, so undo restores the state the undone edit started from.
//! - Edits that cannot take effect (capacity exceeded, backspace at offset 0,
//!   delete at the end, empty paste) push nothing.
//! - Loading a document clears the history; there is no undo back into the
//!   previously open file.
//!
//! Selection states:
//! - `SelectionActive` is entered by a shift-extended motion (anchor dropped at
//!   the cursor if none exists) or `select_all`.
//! - Any plain motion, cursor placement, successful insert/delete, undo/redo,
//!   load or explicit clear returns to `NoSelection`.

use std::ops::Range;
use std::path::{Path, PathBuf};

use core_text::{BufferError, DEFAULT_MAX_CHARS, LineCol, Motion, TextBuffer, line_index, motion};
use tracing::{debug, trace};

pub mod history;
pub mod line_ending;

pub use history::{HISTORY_CAPACITY_DEFAULT, HistoryStack, Snapshot};
pub use line_ending::{LineEnding, NormalizedText, expand_line_endings, normalize_line_endings};

/// Name shown for a document that has never been saved.
pub const DEFAULT_FILE_NAME: &str = "untitled.ocl";

/// Clipboard collaborator. The session owns no clipboard state; cut/copy/paste
/// go through this.
pub trait Clipboard {
    fn get_text(&self) -> Option<String>;
    fn set_text(&mut self, text: &str);
}

/// Process-local clipboard (tests, headless front-ends).
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn get_text(&self) -> Option<String> {
        self.contents.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.contents = Some(text.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    NoSelection,
    SelectionActive,
}

/// Tunables fixed at session creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub max_chars: usize,
    pub history_capacity: usize,
    /// Text inserted for the Tab key.
    pub indent: String,
    pub default_file_name: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            history_capacity: HISTORY_CAPACITY_DEFAULT,
            indent: "    ".to_string(),
            default_file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

pub struct EditSession {
    buffer: TextBuffer,
    history: HistoryStack,
    indent: String,
    default_file_name: String,
    pub file_path: Option<PathBuf>,
    pub original_line_ending: LineEnding,
    /// Last execution was a debug run.
    pub debug_mode: bool,
}

impl EditSession {
    pub fn new(options: &SessionOptions) -> Self {
        Self {
            buffer: TextBuffer::new(options.max_chars),
            history: HistoryStack::new(options.history_capacity),
            indent: options.indent.clone(),
            default_file_name: options.default_file_name.clone(),
            file_path: None,
            original_line_ending: LineEnding::Lf,
            debug_mode: false,
        }
    }

    /// New unsaved session pre-filled with `text` (welcome / template content).
    pub fn with_text(text: &str, options: &SessionOptions) -> Result<Self, BufferError> {
        let mut session = Self::new(options);
        session.load_from(text)?;
        Ok(session)
    }

    // ---- read side ------------------------------------------------------------------------

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn current_text(&self) -> String {
        self.buffer.text()
    }

    pub fn cursor_offset(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn selected_range_or_none(&self) -> Option<Range<usize>> {
        self.buffer.selected_range()
    }

    pub fn selection_state(&self) -> SelectionState {
        if self.buffer.anchor().is_some() {
            SelectionState::SelectionActive
        } else {
            SelectionState::NoSelection
        }
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub fn line(&self, idx: usize) -> Option<String> {
        self.buffer.line(idx)
    }

    pub fn cursor_line_col(&self) -> LineCol {
        line_index::line_col_of(self.buffer.rope(), self.buffer.cursor()).unwrap_or_default()
    }

    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// File name of the document, or the default name when unsaved.
    pub fn display_name(&self) -> String {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.default_file_name.clone())
    }

    /// Full text handed unchanged to the process runner.
    pub fn serialize_for_execution(&self) -> String {
        self.buffer.text()
    }

    // ---- history plumbing -----------------------------------------------------------------

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.buffer.rope().clone(), self.buffer.cursor())
    }

    fn record(&mut self) {
        let snap = self.snapshot();
        self.history.push(snap);
    }

    fn apply(&mut self, snap: Snapshot) {
        self.buffer.restore(&snap.content, snap.cursor);
        self.buffer.set_modified(true);
    }

    pub fn undo(&mut self) -> bool {
        let live = self.snapshot();
        match self.history.undo(live) {
            Some(snap) => {
                self.apply(snap);
                trace!(target: "state.session", position = self.history.position(), "undo_applied");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snap) => {
                self.apply(snap);
                trace!(target: "state.session", position = self.history.position(), "redo_applied");
                true
            }
            None => false,
        }
    }

    // ---- mutations ------------------------------------------------------------------------

    /// Insert at the cursor. Returns `Ok(false)` for empty input.
    pub fn insert_text(&mut self, text: &str) -> Result<bool, BufferError> {
        if text.is_empty() {
            return Ok(false);
        }
        self.buffer.check_insert(text.chars().count())?;
        self.record();
        let at = self.buffer.cursor();
        self.buffer.insert(at, text)?;
        self.buffer.clear_selection();
        Ok(true)
    }

    pub fn insert_newline(&mut self) -> Result<bool, BufferError> {
        self.insert_text("\n")
    }

    pub fn insert_tab(&mut self) -> Result<bool, BufferError> {
        let indent = self.indent.clone();
        self.insert_text(&indent)
    }

    /// Delete the char before the cursor. No-op at the start of the buffer.
    pub fn backspace(&mut self) -> bool {
        self.buffer.clear_selection();
        let at = self.buffer.cursor();
        if at == 0 {
            return false;
        }
        self.record();
        self.buffer.delete(at).unwrap_or(false)
    }

    /// Delete the char at the cursor. No-op at the end of the buffer.
    pub fn delete_forward(&mut self) -> bool {
        self.buffer.clear_selection();
        let at = self.buffer.cursor();
        if at >= self.buffer.len_chars() {
            return false;
        }
        self.record();
        self.buffer.delete_forward(at).unwrap_or(false)
    }

    /// Move the cursor. With `extend` the selection grows from its anchor
    /// (created at the current cursor if absent); without it the selection is
    /// cleared. Returns true if the cursor moved.
    pub fn move_cursor(&mut self, m: Motion, extend: bool) -> bool {
        if extend {
            self.buffer.ensure_anchor();
        } else {
            self.buffer.clear_selection();
        }
        let from = self.buffer.cursor();
        let to = motion::target(self.buffer.rope(), from, m);
        self.buffer.set_cursor(to);
        to != from
    }

    /// Place the cursor directly (mouse click); clamps and clears the selection.
    pub fn set_cursor(&mut self, offset: usize) {
        self.buffer.clear_selection();
        self.buffer.set_cursor(offset);
    }

    pub fn select_all(&mut self) {
        self.buffer.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.buffer.clear_selection();
    }

    /// Copy the selection to the clipboard. False when nothing is selected.
    pub fn copy(&self, clipboard: &mut dyn Clipboard) -> bool {
        match self.buffer.selected_range() {
            Some(r) if !r.is_empty() => {
                clipboard.set_text(&self.buffer.extract_selected());
                true
            }
            _ => false,
        }
    }

    /// Copy the selection to the clipboard and remove it.
    pub fn cut(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        if !self.copy(clipboard) {
            return false;
        }
        self.record();
        self.buffer.replace_selected_with("").is_ok()
    }

    /// Insert clipboard text, replacing the selection if there is one.
    pub fn paste(&mut self, clipboard: &dyn Clipboard) -> Result<bool, BufferError> {
        let Some(text) = clipboard.get_text().filter(|t| !t.is_empty()) else {
            return Ok(false);
        };
        self.buffer.check_replace(text.chars().count())?;
        self.record();
        self.buffer.replace_selected_with(&text)?;
        Ok(true)
    }

    // ---- document lifecycle ---------------------------------------------------------------

    /// Replace the content wholesale (file open). Cursor to 0, selection and
    /// modified flag cleared, history reset. Not undoable.
    pub fn load_from(&mut self, text: &str) -> Result<(), BufferError> {
        self.buffer.replace_all(text)?;
        self.history.clear();
        debug!(target: "state.session", chars = self.buffer.len_chars(), lines = self.buffer.line_count(), "document_loaded");
        Ok(())
    }

    /// Start a fresh unsaved document from `template`.
    pub fn reset(&mut self, template: &str) -> Result<(), BufferError> {
        self.load_from(template)?;
        self.file_path = None;
        self.original_line_ending = LineEnding::Lf;
        Ok(())
    }

    /// Record a successful save to `path`.
    pub fn mark_saved(&mut self, path: PathBuf) {
        self.file_path = Some(path);
        self.buffer.set_modified(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(text: &str) -> EditSession {
        EditSession::with_text(text, &SessionOptions::default()).unwrap()
    }

    #[test]
    fn insert_delete_then_undo_twice() {
        let mut s = session("ab");
        s.set_cursor(2);
        assert!(s.insert_text("c").unwrap());
        assert_eq!((s.current_text().as_str(), s.cursor_offset()), ("abc", 3));
        assert!(s.backspace());
        assert_eq!((s.current_text().as_str(), s.cursor_offset()), ("ab", 2));
        assert!(s.undo());
        assert_eq!((s.current_text().as_str(), s.cursor_offset()), ("abc", 3));
        assert!(s.undo());
        assert_eq!((s.current_text().as_str(), s.cursor_offset()), ("ab", 2));
        assert!(!s.undo());
    }

    #[test]
    fn redo_returns_to_latest_edit() {
        let mut s = session("ab");
        s.set_cursor(2);
        s.insert_text("c").unwrap();
        s.backspace();
        s.undo();
        s.undo();
        assert!(s.redo());
        assert_eq!(s.current_text(), "abc");
        assert!(s.redo());
        assert_eq!(s.current_text(), "ab");
        assert!(!s.redo());
    }

    #[test]
    fn undo_marks_modified() {
        let mut s = session("x");
        s.insert_text("y").unwrap();
        s.mark_saved(PathBuf::from("a.ocl"));
        assert!(!s.is_modified());
        s.undo();
        assert!(s.is_modified());
    }

    #[test]
    fn failed_insert_leaves_buffer_and_history_alone() {
        let opts = SessionOptions {
            max_chars: 5,
            ..SessionOptions::default()
        };
        let mut s = EditSession::with_text("abc", &opts).unwrap();
        s.select_all();
        let err = s.insert_text("de").unwrap_err();
        assert!(matches!(err, BufferError::CapacityExceeded { requested: 5, max: 5 }));
        assert_eq!(s.current_text(), "abc");
        assert_eq!(s.history().len(), 0);
        assert_eq!(s.selection_state(), SelectionState::SelectionActive);
        assert!(s.insert_text("d").unwrap());
        assert_eq!(s.current_text(), "abcd");
    }

    #[test]
    fn boundary_deletes_push_nothing() {
        let mut s = session("ab");
        assert!(!s.backspace());
        s.set_cursor(2);
        assert!(!s.delete_forward());
        assert_eq!(s.history().len(), 0);
        assert!(!s.is_modified());
    }

    #[test]
    fn delete_forward_keeps_cursor() {
        let mut s = session("abc");
        s.set_cursor(1);
        assert!(s.delete_forward());
        assert_eq!(s.current_text(), "ac");
        assert_eq!(s.cursor_offset(), 1);
        s.undo();
        assert_eq!(s.current_text(), "abc");
    }

    #[test]
    fn shift_motion_starts_and_extends_selection() {
        let mut s = session("hello\nworld");
        s.set_cursor(1);
        assert_eq!(s.selection_state(), SelectionState::NoSelection);
        s.move_cursor(Motion::Right, true);
        s.move_cursor(Motion::Right, true);
        assert_eq!(s.selection_state(), SelectionState::SelectionActive);
        assert_eq!(s.selected_range_or_none(), Some(1..3));
        s.move_cursor(Motion::Down, true);
        assert_eq!(s.selected_range_or_none(), Some(1..9));
        s.move_cursor(Motion::Left, false);
        assert_eq!(s.selection_state(), SelectionState::NoSelection);
        assert_eq!(s.cursor_offset(), 8);
    }

    #[test]
    fn selection_backwards_is_normalized() {
        let mut s = session("abcdef");
        s.set_cursor(4);
        s.move_cursor(Motion::Left, true);
        s.move_cursor(Motion::Left, true);
        assert_eq!(s.selected_range_or_none(), Some(2..4));
    }

    #[test]
    fn insert_clears_selection() {
        let mut s = session("abc");
        s.select_all();
        s.insert_text("!").unwrap();
        assert_eq!(s.selection_state(), SelectionState::NoSelection);
        assert_eq!(s.current_text(), "abc!");
    }

    #[test]
    fn select_all_then_extract() {
        let mut s = session("hello\nworld");
        s.select_all();
        assert_eq!(s.buffer().anchor(), Some(0));
        assert_eq!(s.cursor_offset(), 11);
        assert_eq!(s.buffer().extract_selected(), "hello\nworld");
    }

    #[test]
    fn cut_copy_paste_through_clipboard() {
        let mut s = session("let x = 10;");
        let mut clip = MemoryClipboard::default();
        assert!(!s.copy(&mut clip));
        s.set_cursor(4);
        s.move_cursor(Motion::Right, true);
        assert!(s.cut(&mut clip));
        assert_eq!(s.current_text(), "let  = 10;");
        assert_eq!(clip.get_text().as_deref(), Some("x"));
        s.move_cursor(Motion::LineEnd, false);
        assert!(s.paste(&clip).unwrap());
        assert_eq!(s.current_text(), "let  = 10;x");
        s.undo();
        s.undo();
        assert_eq!(s.current_text(), "let x = 10;");
    }

    #[test]
    fn paste_replaces_selection() {
        let mut s = session("print 1;");
        let mut clip = MemoryClipboard::default();
        clip.set_text("42");
        s.set_cursor(6);
        s.move_cursor(Motion::Right, true);
        assert!(s.paste(&clip).unwrap());
        assert_eq!(s.current_text(), "print 42;");
        assert_eq!(s.cursor_offset(), 8);
        assert_eq!(s.selection_state(), SelectionState::NoSelection);
    }

    #[test]
    fn empty_clipboard_paste_is_noop() {
        let mut s = session("a");
        let clip = MemoryClipboard::default();
        assert!(!s.paste(&clip).unwrap());
        assert_eq!(s.history().len(), 0);
    }

    #[test]
    fn tab_inserts_indent() {
        let mut s = session("");
        s.insert_tab().unwrap();
        assert_eq!(s.current_text(), "    ");
        s.insert_newline().unwrap();
        assert_eq!(s.line_count(), 2);
        assert_eq!(s.cursor_line_col(), LineCol::new(1, 0));
    }

    #[test]
    fn load_from_is_not_undoable() {
        let mut s = session("old");
        s.insert_text("!").unwrap();
        s.load_from("new file\n").unwrap();
        assert_eq!(s.cursor_offset(), 0);
        assert!(!s.is_modified());
        assert!(!s.undo());
        assert_eq!(s.current_text(), "new file\n");
    }

    #[test]
    fn reset_forgets_path() {
        let mut s = session("x");
        s.mark_saved(PathBuf::from("/tmp/prog.ocl"));
        assert_eq!(s.display_name(), "prog.ocl");
        s.reset("# New OCL File\n").unwrap();
        assert_eq!(s.file_path(), None);
        assert_eq!(s.display_name(), DEFAULT_FILE_NAME);
    }

    #[test]
    fn serialize_returns_full_text() {
        let s = session("let x = 1;\nprint x;\n");
        assert_eq!(s.serialize_for_execution(), "let x = 1;\nprint x;\n");
    }
}
