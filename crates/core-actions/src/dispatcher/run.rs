//! Run / Debug: execute the buffer and show the output on the console.

use super::DispatchResult;
use crate::EditorHost;
use crate::console::ConsoleOutput;
use core_state::EditSession;

pub(crate) fn handle_run(
    debug: bool,
    session: &mut EditSession,
    host: &mut dyn EditorHost,
    console: &mut ConsoleOutput,
) -> DispatchResult {
    session.debug_mode = debug;
    let source = session.serialize_for_execution();
    let output = host.execute(&source, debug);
    console.set(&output);
    let debug_run = debug;
    tracing::debug!(target: "actions.dispatch", debug_run, output_bytes = console.as_str().len(), "run");
    DispatchResult::dirty()
}
