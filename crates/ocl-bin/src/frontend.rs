//! Line-oriented front-end.
//!
//! Every input line is either a `:` command or text typed at the cursor
//! followed by Enter; text lines go through the key translator like any
//! other input. `:key` replays named key presses and `:menu` activates menu
//! entries, so selection and the clipboard are reachable without a GUI.
//! Console output produced by a command is printed and then cleared.

use std::io::{BufRead, Write};

use anyhow::Result;
use core_actions::{
    Action, CommandParser, ConsoleOutput, MenuBar, ParsedCommand, Toolbar, dispatch,
    translate_input,
};
use core_events::{InputEvent, KeyCode, KeyEvent};
use core_state::EditSession;
use tracing::{info, warn};

use crate::host::TerminalHost;

pub struct LineFrontend<R, W> {
    pub session: EditSession,
    pub host: TerminalHost<R, W>,
    pub console: ConsoleOutput,
    menu: MenuBar,
    toolbar: Toolbar,
}

impl<R: BufRead, W: Write> LineFrontend<R, W> {
    pub fn new(session: EditSession, host: TerminalHost<R, W>, console: ConsoleOutput) -> Self {
        Self {
            session,
            host,
            console,
            menu: MenuBar::new(),
            toolbar: Toolbar::default(),
        }
    }

    /// Run until `:q` succeeds or input ends.
    pub fn run(&mut self) -> Result<()> {
        self.print_buffer()?;
        while let Some(line) = self.host.read_line()? {
            if self.handle_line(&line)? {
                info!(target: "runtime", "quit");
                return Ok(());
            }
        }
        if self.session.is_modified() {
            warn!(target: "runtime", name = %self.session.display_name(), "input_closed_with_unsaved_changes");
            writeln!(self.host.output(), "warning: unsaved changes discarded")?;
        }
        Ok(())
    }

    /// Returns true when the editor should exit.
    pub fn handle_line(&mut self, line: &str) -> Result<bool> {
        if !line.starts_with(':') {
            return self.apply_events(&line_events(line));
        }
        match CommandParser::parse(line) {
            ParsedCommand::Print => {
                self.print_buffer()?;
                Ok(false)
            }
            ParsedCommand::Unknown(body) => {
                writeln!(self.host.output(), "unknown command: {body}")?;
                Ok(false)
            }
            ParsedCommand::Keys(names) => self.replay_keys(&names),
            ParsedCommand::Menu { title, item } => self.activate_menu(&title, &item),
            ParsedCommand::Run => self.press_button("Run"),
            ParsedCommand::Debug => self.press_button("Debug"),
            cmd => match cmd.to_action() {
                Some(action) => self.apply(action),
                None => Ok(false),
            },
        }
    }

    fn replay_keys(&mut self, names: &str) -> Result<bool> {
        let mut events = Vec::new();
        for name in names.split_whitespace() {
            match name.parse::<KeyEvent>() {
                Ok(key) => events.push(InputEvent::Key(key)),
                Err(e) => {
                    writeln!(self.host.output(), "{e}")?;
                    return Ok(false);
                }
            }
        }
        self.apply_events(&events)
    }

    fn activate_menu(&mut self, title: &str, item: &str) -> Result<bool> {
        self.menu.sync_with(&self.session);
        let Some((mi, ii)) = self.menu.find(title, item) else {
            writeln!(self.host.output(), "no such menu item: {title} {item}")?;
            return Ok(false);
        };
        self.menu.close_all();
        self.menu.toggle(mi);
        match self.menu.activate(mi, ii) {
            Some(action) => self.apply(action),
            None => {
                self.menu.close_all();
                writeln!(self.host.output(), "menu item disabled: {title} {item}")?;
                Ok(false)
            }
        }
    }

    fn press_button(&mut self, label: &str) -> Result<bool> {
        match self.toolbar.press_label(label) {
            Some(action) => self.apply(action),
            None => Ok(false),
        }
    }

    fn apply_events(&mut self, events: &[InputEvent]) -> Result<bool> {
        let mut quit = false;
        for action in events.iter().filter_map(translate_input) {
            quit |= self.apply(action)?;
        }
        Ok(quit)
    }

    fn apply(&mut self, action: Action) -> Result<bool> {
        let result = dispatch(action, &mut self.session, &mut self.host, &mut self.console);
        if !self.console.is_empty() {
            let text = self.console.as_str().to_string();
            self.console.clear();
            let out = self.host.output();
            write!(out, "{text}")?;
            if !text.ends_with('\n') {
                writeln!(out)?;
            }
        }
        if result.saved {
            let name = self.session.display_name();
            writeln!(self.host.output(), "\"{name}\" written")?;
        }
        if result.buffer_replaced {
            self.print_buffer()?;
        }
        Ok(result.quit)
    }

    fn print_buffer(&mut self) -> Result<()> {
        let marker = if self.session.is_modified() { " [+]" } else { "" };
        let header = format!("-- {}{marker} --", self.session.display_name());
        let lines: Vec<String> = (0..self.session.line_count())
            .filter_map(|i| self.session.line(i))
            .collect();
        let out = self.host.output();
        writeln!(out, "{header}")?;
        for (i, l) in lines.iter().enumerate() {
            writeln!(out, "{:>4} {l}", i + 1)?;
        }
        Ok(())
    }
}

/// A typed line: text runs with Tab keys for each `'\t'`, then Enter.
fn line_events(line: &str) -> Vec<InputEvent> {
    let mut events = Vec::new();
    for (i, run) in line.split('\t').enumerate() {
        if i > 0 {
            events.push(InputEvent::Key(KeyEvent::plain(KeyCode::Tab)));
        }
        if !run.is_empty() {
            events.push(InputEvent::Text(run.to_string()));
        }
    }
    events.push(InputEvent::Key(KeyEvent::plain(KeyCode::Enter)));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_actions::ProcessRunner;
    use core_state::SessionOptions;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    struct EchoRunner;

    impl ProcessRunner for EchoRunner {
        fn execute(&self, source: &str, debug: bool) -> String {
            format!("ran {} chars debug={debug}\n", source.chars().count())
        }
    }

    fn frontend(input: &str, text: &str) -> LineFrontend<Cursor<Vec<u8>>, Vec<u8>> {
        let host = TerminalHost::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            Box::new(EchoRunner),
            "# New OCL File\n".to_string(),
        );
        let session = EditSession::with_text(text, &SessionOptions::default()).unwrap();
        LineFrontend::new(session, host, ConsoleOutput::default())
    }

    fn output(f: LineFrontend<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(f.host.into_output()).unwrap()
    }

    #[test]
    fn lines_are_inserted_with_newlines() {
        let mut f = frontend("let x = 1;\nprint x;\n", "");
        f.run().unwrap();
        assert_eq!(f.session.current_text(), "let x = 1;\nprint x;\n");
        assert!(output(f).ends_with("warning: unsaved changes discarded\n"));
    }

    #[test]
    fn run_prints_console_output() {
        let mut f = frontend(":run\n:debug\n:q\n", "print 1;");
        f.run().unwrap();
        let out = output(f);
        assert!(out.contains("ran 8 chars debug=false\n"));
        assert!(out.contains("ran 8 chars debug=true\n"));
    }

    #[test]
    fn quit_with_changes_prompts() {
        let mut f = frontend("x\n:q\nc\n:q!\n", "");
        f.run().unwrap();
        let out = output(f);
        assert!(out.contains("Save changes before exiting? [y/n/c] "));
        assert!(!out.contains("warning"));
    }

    #[test]
    fn write_then_quit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog.ocl");
        let input = format!("print 2;\n:w {}\n:q\n", path.display());
        let mut f = frontend(&input, "");
        f.run().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "print 2;\n");
        assert!(output(f).contains("\"prog.ocl\" written"));
    }

    #[test]
    fn undo_and_print() {
        let mut f = frontend("abc\n:undo\n:undo\n:print\n:q!\n", "");
        f.run().unwrap();
        assert_eq!(f.session.current_text(), "");
        let out = output(f);
        assert!(out.ends_with("-- untitled.ocl [+] --\n   1 \n"));
    }

    #[test]
    fn new_file_prints_template() {
        let mut f = frontend(":new\n:q\n", "old");
        f.run().unwrap();
        assert_eq!(f.session.current_text(), "# New OCL File\n");
        assert!(output(f).contains("   1 # New OCL File\n"));
    }

    #[test]
    fn unknown_command_is_reported() {
        let mut f = frontend(":frob\n:q\n", "");
        f.run().unwrap();
        assert!(output(f).contains("unknown command: frob"));
    }

    #[test]
    fn tabs_in_typed_lines_insert_indent() {
        let mut f = frontend("a\tb\n\tc\n:q!\n", "");
        f.run().unwrap();
        assert_eq!(f.session.current_text(), "a    b\n    c\n");
    }

    #[test]
    fn cancelled_write_reports_nothing() {
        let mut f = frontend(":w\n", "print 1;");
        f.run().unwrap();
        assert_eq!(f.session.file_path(), None);
        let out = output(f);
        assert!(out.ends_with("Save as [untitled.ocl]: "));
        assert!(!out.contains("written"));
    }

    #[test]
    fn keys_and_menus_drive_selection_and_clipboard() {
        let input = "abc\n:key up shift+end\n:menu edit copy\n:key ctrl+end\n\
                     :menu Edit Paste\n:menu edit cut\n:key hyper+x\n:q!\n";
        let mut f = frontend(input, "");
        f.run().unwrap();
        assert_eq!(f.session.current_text(), "abc\nabc");
        let out = output(f);
        assert!(out.contains("menu item disabled: edit cut"));
        assert!(out.contains("unrecognized key `hyper+x`"));
    }

    #[test]
    fn menu_new_and_unknown_items() {
        let mut f = frontend(":menu file new\n:menu file print\n:q\n", "old");
        f.run().unwrap();
        assert_eq!(f.session.current_text(), "# New OCL File\n");
        assert!(output(f).contains("no such menu item: file print"));
    }
}
