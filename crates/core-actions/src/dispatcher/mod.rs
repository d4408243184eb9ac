//! Dispatcher applying `Action` to the edit session.
//!
//! Sub-modules:
//! * `edit`  - text mutation, cursor placement, clipboard
//! * `undo`  - undo / redo
//! * `file`  - new / open / save / exit, including the unsaved-changes prompt
//! * `run`   - interpreter execution into the console
//!
//! Errors never escape: capacity failures are logged and ignored, file errors
//! are reported on the console.

use crate::console::ConsoleOutput;
use crate::{Action, EditorHost};
use core_state::EditSession;

pub mod command_parser;
mod edit;
mod file;
mod run;
mod undo;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
    /// The whole document was replaced (open / new); cached layout is stale.
    pub buffer_replaced: bool,
    /// Save / Save As wrote the document to disk.
    pub saved: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
            buffer_replaced: false,
            saved: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
            buffer_replaced: false,
            saved: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            buffer_replaced: false,
            saved: false,
        }
    }
    pub fn buffer_replaced() -> Self {
        Self {
            dirty: true,
            quit: false,
            buffer_replaced: true,
            saved: false,
        }
    }

    pub fn saved(saved: bool) -> Self {
        Self {
            saved,
            ..Self::dirty()
        }
    }

    fn dirty_if(changed: bool) -> Self {
        if changed { Self::dirty() } else { Self::clean() }
    }
}

/// Apply an action. Returns whether a redraw is needed (`dirty`) or the
/// editor should exit (`quit`).
pub fn dispatch(
    action: Action,
    session: &mut EditSession,
    host: &mut dyn EditorHost,
    console: &mut ConsoleOutput,
) -> DispatchResult {
    tracing::trace!(target: "actions.dispatch", action = ?action, "dispatch");
    match action {
        Action::InsertText(_)
        | Action::InsertNewline
        | Action::InsertTab
        | Action::Backspace
        | Action::DeleteForward
        | Action::Move { .. }
        | Action::SetCursor(_)
        | Action::ClickAt { .. }
        | Action::SelectAll
        | Action::Cut
        | Action::Copy
        | Action::Paste => edit::handle_edit(action, session, host),
        Action::Undo => undo::handle_undo(session),
        Action::Redo => undo::handle_redo(session),
        Action::NewFile => file::handle_new(session, host, console),
        Action::OpenFile(path) => file::handle_open(path, session, host, console),
        Action::Save => file::handle_save(session, host, console),
        Action::SaveAs(path) => file::handle_save_as(path, session, host, console),
        Action::Exit { force } => file::handle_exit(force, session, host, console),
        Action::Run => run::handle_run(false, session, host, console),
        Action::Debug => run::handle_run(true, session, host, console),
        Action::ToggleFullscreen => {
            host.toggle_fullscreen();
            DispatchResult::dirty()
        }
    }
}
