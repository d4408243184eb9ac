//! Text edits, cursor placement and clipboard actions.

use super::DispatchResult;
use crate::{Action, EditorHost};
use core_state::EditSession;
use core_text::{BufferError, LineCol, line_index};

pub(crate) fn handle_edit(
    action: Action,
    session: &mut EditSession,
    host: &mut dyn EditorHost,
) -> DispatchResult {
    let before = session.cursor_offset();
    let result = match action {
        Action::InsertText(t) => inserted(session.insert_text(&t), "insert_text"),
        Action::InsertNewline => inserted(session.insert_newline(), "insert_newline"),
        Action::InsertTab => inserted(session.insert_tab(), "insert_tab"),
        Action::Backspace => DispatchResult::dirty_if(session.backspace()),
        Action::DeleteForward => DispatchResult::dirty_if(session.delete_forward()),
        Action::Move { motion, extend } => {
            let had_selection = session.selected_range_or_none().is_some();
            let moved = session.move_cursor(motion, extend);
            // clearing or starting a selection needs a redraw even without movement
            DispatchResult::dirty_if(moved || had_selection != extend)
        }
        Action::SetCursor(offset) => {
            session.set_cursor(offset);
            DispatchResult::dirty()
        }
        Action::ClickAt { line, col } => {
            let rope = session.buffer().rope();
            let offset = line_index::offset_of(rope, LineCol::new(line, col))
                .unwrap_or_else(|| rope.len_chars());
            session.set_cursor(offset);
            DispatchResult::dirty()
        }
        Action::SelectAll => {
            session.select_all();
            DispatchResult::dirty()
        }
        Action::Copy => {
            session.copy(host.clipboard());
            DispatchResult::clean()
        }
        Action::Cut => DispatchResult::dirty_if(session.cut(host.clipboard())),
        Action::Paste => inserted(session.paste(host.clipboard()), "paste"),
        _ => unreachable!("non-edit action routed to edit handler"),
    };
    tracing::trace!(target: "actions.dispatch", from = before, to = session.cursor_offset(), dirty = result.dirty, "edit");
    result
}

fn inserted(res: Result<bool, BufferError>, op: &'static str) -> DispatchResult {
    match res {
        Ok(changed) => DispatchResult::dirty_if(changed),
        Err(e) => {
            tracing::warn!(target: "actions.dispatch", op, error = %e, "edit_rejected");
            DispatchResult::clean()
        }
    }
}
