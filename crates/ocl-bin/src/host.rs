//! `EditorHost` for a plain terminal: prompts and pickers are answered on
//! the same line-based input the front-end reads commands from.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use core_actions::{EditorHost, ProcessRunner, SaveChoice};
use core_state::{Clipboard, MemoryClipboard};
use tracing::debug;

pub struct TerminalHost<R, W> {
    input: R,
    output: W,
    clipboard: MemoryClipboard,
    runner: Box<dyn ProcessRunner>,
    template: String,
}

impl<R: BufRead, W: Write> TerminalHost<R, W> {
    pub fn new(input: R, output: W, runner: Box<dyn ProcessRunner>, template: String) -> Self {
        Self {
            input,
            output,
            clipboard: MemoryClipboard::default(),
            runner,
            template,
        }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Next input line without its terminator; `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        // prompt output is best effort; a closed stdout just means no prompt
        let _ = write!(self.output, "{prompt}");
        let _ = self.output.flush();
        self.read_line().ok().flatten()
    }
}

impl<R: BufRead, W: Write> EditorHost for TerminalHost<R, W> {
    fn clipboard(&mut self) -> &mut dyn Clipboard {
        &mut self.clipboard
    }

    fn execute(&mut self, source: &str, debug: bool) -> String {
        self.runner.execute(source, debug)
    }

    fn confirm_save_changes(&mut self, prompt: &str) -> SaveChoice {
        let answer = self.ask(&format!("{prompt} [y/n/c] "));
        match answer.as_deref().map(str::trim) {
            Some("y" | "Y" | "yes") => SaveChoice::Yes,
            Some("n" | "N" | "no") => SaveChoice::No,
            _ => SaveChoice::Cancel,
        }
    }

    fn pick_open_path(&mut self) -> Option<PathBuf> {
        let answer = self.ask("Open file: ")?;
        let answer = answer.trim();
        (!answer.is_empty()).then(|| PathBuf::from(answer))
    }

    fn pick_save_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
        let answer = self.ask(&format!("Save as [{suggested_name}]: "))?;
        let answer = answer.trim();
        if answer.is_empty() {
            Some(PathBuf::from(suggested_name))
        } else {
            Some(PathBuf::from(answer))
        }
    }

    fn new_file_template(&self) -> &str {
        &self.template
    }

    fn toggle_fullscreen(&mut self) {
        debug!(target: "runtime", "fullscreen_unsupported_in_terminal");
    }
}
