//! Stateless key -> `Action` translation.
//!
//! Bindings:
//! * Enter / Tab / Backspace / Delete edit at the cursor.
//! * Arrows, Home, End move; Shift extends the selection; Ctrl+Home / Ctrl+End
//!   jump to the buffer edges.
//! * Ctrl+Z / Ctrl+Y undo / redo; Ctrl+X / C / V / A are the Edit menu;
//!   Ctrl+N / O / S are the File menu; F5 / Shift+F5 run / debug; F11 toggles
//!   fullscreen.
//! * Any other printable char without Ctrl/Alt is inserted.

use crate::Action;
use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers};
use core_text::Motion;

pub fn translate_input(ev: &InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Key(k) => translate_key(k),
        InputEvent::Text(t) => {
            let printable: String = t.chars().filter(|c| !c.is_control()).collect();
            (!printable.is_empty()).then_some(Action::InsertText(printable))
        }
        InputEvent::Click { line, col } => Some(Action::ClickAt {
            line: *line,
            col: *col,
        }),
    }
}

pub fn translate_key(key: &KeyEvent) -> Option<Action> {
    tracing::trace!(target: "actions.translate", key = ?key.code, ctrl = key.ctrl_held(), shift = key.shift(), "translate_key_attempt");
    let extend = key.shift();
    let ctrl = key.ctrl_held();
    let mv = |motion| Some(Action::Move { motion, extend });
    match key.code {
        KeyCode::Char(c) if ctrl => ctrl_binding(c),
        KeyCode::Char(_) if key.mods.contains(KeyModifiers::ALT) => None,
        KeyCode::Char(c) if !c.is_control() => Some(Action::InsertText(c.to_string())),
        KeyCode::Char(_) => None,
        KeyCode::Enter => Some(Action::InsertNewline),
        KeyCode::Tab => Some(Action::InsertTab),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Delete => Some(Action::DeleteForward),
        KeyCode::Left => mv(Motion::Left),
        KeyCode::Right => mv(Motion::Right),
        KeyCode::Up => mv(Motion::Up),
        KeyCode::Down => mv(Motion::Down),
        KeyCode::Home if ctrl => mv(Motion::BufferStart),
        KeyCode::End if ctrl => mv(Motion::BufferEnd),
        KeyCode::Home => mv(Motion::LineStart),
        KeyCode::End => mv(Motion::LineEnd),
        KeyCode::F(5) if extend => Some(Action::Debug),
        KeyCode::F(5) => Some(Action::Run),
        KeyCode::F(11) => Some(Action::ToggleFullscreen),
        KeyCode::F(_) | KeyCode::Esc => None,
    }
}

fn ctrl_binding(c: char) -> Option<Action> {
    match c.to_ascii_lowercase() {
        'z' => Some(Action::Undo),
        'y' => Some(Action::Redo),
        'x' => Some(Action::Cut),
        'c' => Some(Action::Copy),
        'v' => Some(Action::Paste),
        'a' => Some(Action::SelectAll),
        'n' => Some(Action::NewFile),
        'o' => Some(Action::OpenFile(None)),
        's' => Some(Action::Save),
        _ => None,
    }
}
