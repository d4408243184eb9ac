//! Undo / Redo handling.

use super::DispatchResult;
use core_state::EditSession;

pub(crate) fn handle_undo(session: &mut EditSession) -> DispatchResult {
    let before = session.line_count();
    if session.undo() {
        let after = session.line_count();
        tracing::trace!(target: "actions.dispatch", op = "undo", line_count_changed = (before != after), "undo");
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

pub(crate) fn handle_redo(session: &mut EditSession) -> DispatchResult {
    let before = session.line_count();
    if session.redo() {
        let after = session.line_count();
        tracing::trace!(target: "actions.dispatch", op = "redo", line_count_changed = (before != after), "redo");
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
