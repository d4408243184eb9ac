//! Command line parsing for the `:` prompt of line-oriented front-ends.
//!
//! Converts a raw command (beginning with ':') into a `ParsedCommand`. Pure
//! classification; no side effects here.

use std::path::PathBuf;

use crate::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// `:q`
    Quit,
    /// `:q!`
    ForceQuit,
    /// `:w` or `:w path`
    Write(Option<PathBuf>),
    /// `:e path` (bare `:e` asks for a path)
    Edit(Option<PathBuf>),
    New,
    Run,
    Debug,
    Undo,
    Redo,
    /// Show the buffer; handled by the front-end itself.
    Print,
    /// `:key ctrl+z shift+left ...` replays key presses through the translator.
    Keys(String),
    /// `:menu edit select all` activates a menu entry.
    Menu { title: String, item: String },
    Unknown(String),
}

impl ParsedCommand {
    /// Editor action for this command, `None` for front-end-only commands.
    pub fn to_action(&self) -> Option<Action> {
        match self {
            ParsedCommand::Quit => Some(Action::Exit { force: false }),
            ParsedCommand::ForceQuit => Some(Action::Exit { force: true }),
            ParsedCommand::Write(None) => Some(Action::Save),
            ParsedCommand::Write(Some(p)) => Some(Action::SaveAs(Some(p.clone()))),
            ParsedCommand::Edit(p) => Some(Action::OpenFile(p.clone())),
            ParsedCommand::New => Some(Action::NewFile),
            ParsedCommand::Run => Some(Action::Run),
            ParsedCommand::Debug => Some(Action::Debug),
            ParsedCommand::Undo => Some(Action::Undo),
            ParsedCommand::Redo => Some(Action::Redo),
            ParsedCommand::Print
            | ParsedCommand::Keys(_)
            | ParsedCommand::Menu { .. }
            | ParsedCommand::Unknown(_) => None,
        }
    }
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> ParsedCommand {
        let s = raw.trim();
        let Some(body) = s.strip_prefix(':') else {
            return ParsedCommand::Unknown(s.to_string());
        };
        let (name, arg) = match body.split_once(char::is_whitespace) {
            Some((n, a)) => (n, a.trim()),
            None => (body, ""),
        };
        match name {
            "key" if !arg.is_empty() => return ParsedCommand::Keys(arg.to_string()),
            "menu" => {
                if let Some((title, item)) = arg.split_once(char::is_whitespace) {
                    return ParsedCommand::Menu {
                        title: title.to_string(),
                        item: item.trim().to_string(),
                    };
                }
            }
            _ => {}
        }
        let path = (!arg.is_empty()).then(|| PathBuf::from(arg));
        match (name, path) {
            ("q", None) => ParsedCommand::Quit,
            ("q!", None) => ParsedCommand::ForceQuit,
            ("w", p) => ParsedCommand::Write(p),
            ("e", p) => ParsedCommand::Edit(p),
            ("new", None) => ParsedCommand::New,
            ("run", None) => ParsedCommand::Run,
            ("debug", None) => ParsedCommand::Debug,
            ("undo", None) => ParsedCommand::Undo,
            ("redo", None) => ParsedCommand::Redo,
            ("print" | "p", None) => ParsedCommand::Print,
            _ => ParsedCommand::Unknown(body.to_string()),
        }
    }
}
