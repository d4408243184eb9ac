#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use std::collections::VecDeque;
use std::path::PathBuf;

use core_actions::{Action, ConsoleOutput, DispatchResult, EditorHost, SaveChoice, dispatch};
use core_state::{Clipboard, EditSession, MemoryClipboard, SessionOptions};

pub const TEMPLATE: &str = "# New OCL File\n";

/// Scripted host: answers prompts and pickers from queues and records calls.
#[derive(Default)]
pub struct FakeHost {
    pub clipboard: MemoryClipboard,
    pub answers: VecDeque<SaveChoice>,
    pub prompts: Vec<String>,
    pub open_paths: VecDeque<PathBuf>,
    pub save_paths: VecDeque<PathBuf>,
    pub save_suggestions: Vec<String>,
    pub executed: Vec<(String, bool)>,
    pub output: String,
    pub fullscreen_toggles: usize,
}

impl EditorHost for FakeHost {
    fn clipboard(&mut self) -> &mut dyn Clipboard {
        &mut self.clipboard
    }

    fn execute(&mut self, source: &str, debug: bool) -> String {
        self.executed.push((source.to_string(), debug));
        self.output.clone()
    }

    fn confirm_save_changes(&mut self, prompt: &str) -> SaveChoice {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().unwrap_or(SaveChoice::Cancel)
    }

    fn pick_open_path(&mut self) -> Option<PathBuf> {
        self.open_paths.pop_front()
    }

    fn pick_save_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
        self.save_suggestions.push(suggested_name.to_string());
        self.save_paths.pop_front()
    }

    fn new_file_template(&self) -> &str {
        TEMPLATE
    }

    fn toggle_fullscreen(&mut self) {
        self.fullscreen_toggles += 1;
    }
}

pub struct Harness {
    pub session: EditSession,
    pub host: FakeHost,
    pub console: ConsoleOutput,
}

impl Harness {
    pub fn new(text: &str) -> Self {
        Self::with_options(text, &SessionOptions::default())
    }

    pub fn with_options(text: &str, opts: &SessionOptions) -> Self {
        Self {
            session: EditSession::with_text(text, opts).expect("initial text fits"),
            host: FakeHost::default(),
            console: ConsoleOutput::default(),
        }
    }

    pub fn run(&mut self, action: Action) -> DispatchResult {
        dispatch(action, &mut self.session, &mut self.host, &mut self.console)
    }

    pub fn type_str(&mut self, s: &str) {
        for c in s.chars() {
            let action = if c == '\n' {
                Action::InsertNewline
            } else {
                Action::InsertText(c.to_string())
            };
            self.run(action);
        }
    }

    pub fn text(&self) -> String {
        self.session.current_text()
    }
}
