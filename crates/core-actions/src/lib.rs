//! Editor actions and the layers that produce and apply them.
//!
//! Input flows `core_events::InputEvent` -> [`translate_input`] -> [`Action`]
//! -> [`dispatcher::dispatch`]. Menus and the `:` command line produce the
//! same `Action` values, so every path into the session goes through one
//! match.

use std::path::PathBuf;

use core_state::Clipboard;
use core_text::Motion;

pub mod console;
pub mod dispatcher;
pub mod io_ops;
pub mod key_translator;
pub mod menu;
pub mod runner;

pub use console::ConsoleOutput;
pub use dispatcher::command_parser::{CommandParser, ParsedCommand};
pub use dispatcher::{DispatchResult, dispatch};
pub use io_ops::FileError;
pub use key_translator::{translate_input, translate_key};
pub use menu::{Menu, MenuBar, MenuItem, Toolbar};
pub use runner::{InterpreterRunner, ProcessRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    InsertText(String),
    InsertNewline,
    InsertTab,
    Backspace,
    DeleteForward,
    Move { motion: Motion, extend: bool },
    SetCursor(usize),
    /// Pointer placement by line/column (clamped to the line).
    ClickAt { line: usize, col: usize },
    SelectAll,
    Cut,
    Copy,
    Paste,
    Undo,
    Redo,
    NewFile,
    /// Open a file; `None` asks the host for a path.
    OpenFile(Option<PathBuf>),
    Save,
    /// Save under a new name; `None` asks the host for a path.
    SaveAs(Option<PathBuf>),
    /// `force` skips the unsaved-changes prompt.
    Exit { force: bool },
    Run,
    Debug,
    ToggleFullscreen,
}

/// Answer to the unsaved-changes prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Yes,
    No,
    Cancel,
}

/// Platform services the dispatcher needs but does not own.
pub trait EditorHost {
    fn clipboard(&mut self) -> &mut dyn Clipboard;
    /// Run `source` through the interpreter and return its (bounded) output.
    fn execute(&mut self, source: &str, debug: bool) -> String;
    fn confirm_save_changes(&mut self, prompt: &str) -> SaveChoice;
    fn pick_open_path(&mut self) -> Option<PathBuf>;
    fn pick_save_path(&mut self, suggested_name: &str) -> Option<PathBuf>;
    /// Content for File > New.
    fn new_file_template(&self) -> &str;
    fn toggle_fullscreen(&mut self) {}
}
