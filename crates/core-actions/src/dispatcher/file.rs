//! File menu actions: New, Open, Save, Save As, Exit.
//!
//! New and Exit ask before discarding unsaved changes. Yes saves first and
//! only proceeds if the save went through; Cancel aborts. Save on a document
//! with no path, or whose path cannot be written, falls through to Save As.

use std::path::PathBuf;

use super::DispatchResult;
use crate::console::ConsoleOutput;
use crate::io_ops::{open_into, save_session};
use crate::{EditorHost, SaveChoice};
use core_state::EditSession;
use tracing::{info, warn};

pub(crate) fn handle_new(
    session: &mut EditSession,
    host: &mut dyn EditorHost,
    console: &mut ConsoleOutput,
) -> DispatchResult {
    if !confirm_discard(session, host, console, "Save changes?") {
        return DispatchResult::clean();
    }
    let template = host.new_file_template().to_string();
    if let Err(e) = session.reset(&template) {
        warn!(target: "actions.dispatch", error = %e, "new_file_template_rejected");
        if let Err(e) = session.reset("") {
            warn!(target: "actions.dispatch", error = %e, "new_file_reset_failed");
        }
    }
    info!(target: "actions.dispatch", "new_file");
    DispatchResult::buffer_replaced()
}

pub(crate) fn handle_open(
    path: Option<PathBuf>,
    session: &mut EditSession,
    host: &mut dyn EditorHost,
    console: &mut ConsoleOutput,
) -> DispatchResult {
    let Some(path) = path.or_else(|| host.pick_open_path()) else {
        return DispatchResult::clean();
    };
    match open_into(session, &path) {
        Ok(()) => DispatchResult::buffer_replaced(),
        Err(e) => {
            console.push_line(&format!("> Error: {e}"));
            DispatchResult::dirty()
        }
    }
}

pub(crate) fn handle_save(
    session: &mut EditSession,
    host: &mut dyn EditorHost,
    console: &mut ConsoleOutput,
) -> DispatchResult {
    DispatchResult::saved(save(session, host, console))
}

pub(crate) fn handle_save_as(
    path: Option<PathBuf>,
    session: &mut EditSession,
    host: &mut dyn EditorHost,
    console: &mut ConsoleOutput,
) -> DispatchResult {
    DispatchResult::saved(save_as(path, session, host, console))
}

pub(crate) fn handle_exit(
    force: bool,
    session: &mut EditSession,
    host: &mut dyn EditorHost,
    console: &mut ConsoleOutput,
) -> DispatchResult {
    if force || confirm_discard(session, host, console, "Save changes before exiting?") {
        info!(target: "actions.dispatch", force, "exit");
        DispatchResult::quit()
    } else {
        DispatchResult::clean()
    }
}

/// True when it is fine to throw the current content away.
fn confirm_discard(
    session: &mut EditSession,
    host: &mut dyn EditorHost,
    console: &mut ConsoleOutput,
    prompt: &str,
) -> bool {
    if !session.is_modified() {
        return true;
    }
    match host.confirm_save_changes(prompt) {
        SaveChoice::Yes => save(session, host, console),
        SaveChoice::No => true,
        SaveChoice::Cancel => false,
    }
}

fn save(session: &mut EditSession, host: &mut dyn EditorHost, console: &mut ConsoleOutput) -> bool {
    if session.file_path().is_none() {
        return save_as(None, session, host, console);
    }
    match save_session(session, None) {
        Ok(_) => true,
        Err(e) => {
            console.push_line(&format!("> Error: {e}"));
            save_as(None, session, host, console)
        }
    }
}

fn save_as(
    path: Option<PathBuf>,
    session: &mut EditSession,
    host: &mut dyn EditorHost,
    console: &mut ConsoleOutput,
) -> bool {
    let Some(path) = path.or_else(|| host.pick_save_path(&session.display_name())) else {
        return false;
    };
    match save_session(session, Some(&path)) {
        Ok(_) => true,
        Err(e) => {
            console.push_line(&format!("> Error: {e}"));
            false
        }
    }
}
