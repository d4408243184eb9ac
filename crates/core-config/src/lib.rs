//! Configuration loading and parsing.
//!
//! Reads `ocl-edit.toml` (or an override path provided by the binary). Every
//! section and field is optional; unknown fields are ignored so older builds
//! tolerate newer files. A missing or malformed file yields the defaults, and
//! out-of-range values are replaced by their defaults in [`Config::sanitize`].

use anyhow::Result;
use core_state::SessionOptions;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "ocl-edit.toml";

pub const WELCOME_TEXT: &str = "# OCL Editor - Enhanced UI\n# Use Run/Debug Buttons\n\nlet x = 10;\nprint \"Hello, OCL! x = {x}\";\n";

pub const NEW_FILE_TEXT: &str = "# New OCL File\n\nlet x = 10;\nprint \"Hello, OCL! x = {x}\";\n";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BufferConfig {
    #[serde(default = "BufferConfig::default_max_chars")]
    pub max_chars: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            max_chars: Self::default_max_chars(),
        }
    }
}

impl BufferConfig {
    const fn default_max_chars() -> usize {
        core_text::DEFAULT_MAX_CHARS
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
        }
    }
}

impl HistoryConfig {
    const fn default_capacity() -> usize {
        core_state::HISTORY_CAPACITY_DEFAULT
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_width")]
    pub tab_width: usize,
    #[serde(default = "EditorConfig::default_file_name")]
    pub default_file_name: String,
    #[serde(default = "EditorConfig::default_welcome_text")]
    pub welcome_text: String,
    #[serde(default = "EditorConfig::default_new_file_text")]
    pub new_file_text: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
            default_file_name: Self::default_file_name(),
            welcome_text: Self::default_welcome_text(),
            new_file_text: Self::default_new_file_text(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_width() -> usize {
        4
    }
    fn default_file_name() -> String {
        core_state::DEFAULT_FILE_NAME.to_string()
    }
    fn default_welcome_text() -> String {
        WELCOME_TEXT.to_string()
    }
    fn default_new_file_text() -> String {
        NEW_FILE_TEXT.to_string()
    }
}

/// External interpreter invoked by Run / Debug.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    #[serde(default = "InterpreterConfig::default_program")]
    pub program: String,
    /// Arguments placed before the source file path.
    #[serde(default = "InterpreterConfig::default_args")]
    pub args: Vec<String>,
    /// Extra argument appended for debug runs.
    #[serde(default = "InterpreterConfig::default_debug_flag")]
    pub debug_flag: String,
    /// Upper bound on captured output, in bytes.
    #[serde(default = "InterpreterConfig::default_output_limit")]
    pub output_limit: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            program: Self::default_program(),
            args: Self::default_args(),
            debug_flag: Self::default_debug_flag(),
            output_limit: Self::default_output_limit(),
        }
    }
}

impl InterpreterConfig {
    fn default_program() -> String {
        "python3".to_string()
    }
    fn default_args() -> Vec<String> {
        vec!["main.py".to_string()]
    }
    fn default_debug_flag() -> String {
        "--debug".to_string()
    }
    const fn default_output_limit() -> usize {
        1024
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub buffer: BufferConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub interpreter: InterpreterConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("ocl-edit").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            let mut cfg = Config {
                raw: Some(content),
                file,
            };
            cfg.sanitize();
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(cfg)
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Replace unusable values with defaults. Returns the number of fields reset.
    pub fn sanitize(&mut self) -> usize {
        let mut reset = 0;
        let f = &mut self.file;
        if f.buffer.max_chars == 0 {
            f.buffer.max_chars = BufferConfig::default_max_chars();
            reset += 1;
        }
        if f.history.capacity == 0 {
            f.history.capacity = HistoryConfig::default_capacity();
            reset += 1;
        }
        if f.editor.tab_width == 0 {
            f.editor.tab_width = EditorConfig::default_tab_width();
            reset += 1;
        }
        if f.editor.default_file_name.trim().is_empty() {
            f.editor.default_file_name = EditorConfig::default_file_name();
            reset += 1;
        }
        if f.interpreter.program.trim().is_empty() {
            f.interpreter.program = InterpreterConfig::default_program();
            reset += 1;
        }
        if f.interpreter.output_limit == 0 {
            f.interpreter.output_limit = InterpreterConfig::default_output_limit();
            reset += 1;
        }
        if reset > 0 {
            warn!(target: "config", reset, "config_values_reset_to_default");
        }
        reset
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            max_chars: self.file.buffer.max_chars,
            history_capacity: self.file.history.capacity,
            indent: " ".repeat(self.file.editor.tab_width),
            default_file_name: self.file.editor.default_file_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn write_cfg(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.file, ConfigFile::default());
        assert_eq!(cfg.file.buffer.max_chars, 10_000);
        assert_eq!(cfg.file.history.capacity, 100);
        assert_eq!(cfg.file.interpreter.output_limit, 1024);
        assert_eq!(cfg.file.editor.default_file_name, "untitled.ocl");
    }

    #[test]
    fn parses_partial_sections() {
        let tmp = write_cfg("[buffer]\nmax_chars = 500\n[interpreter]\nprogram = \"ocl\"\nargs = []\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.buffer.max_chars, 500);
        assert_eq!(cfg.file.interpreter.program, "ocl");
        assert!(cfg.file.interpreter.args.is_empty());
        assert_eq!(cfg.file.interpreter.debug_flag, "--debug");
        assert_eq!(cfg.file.history.capacity, 100);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let tmp = write_cfg("[editor]\ntab_width = 2\nfont = \"mono\"\n[theme]\nname = \"dark\"\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.editor.tab_width, 2);
        assert_eq!(cfg.session_options().indent, "  ");
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = write_cfg("[buffer\nmax_chars = ");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.file, ConfigFile::default());
    }

    #[test]
    fn zero_values_are_sanitized() {
        let tmp = write_cfg("[buffer]\nmax_chars = 0\n[history]\ncapacity = 0\n[interpreter]\noutput_limit = 0\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.buffer.max_chars, 10_000);
        assert_eq!(cfg.file.history.capacity, 100);
        assert_eq!(cfg.file.interpreter.output_limit, 1024);
    }

    #[test]
    fn session_options_follow_config() {
        let tmp = write_cfg("[buffer]\nmax_chars = 64\n[history]\ncapacity = 5\n[editor]\ndefault_file_name = \"scratch.ocl\"\n");
        let opts = load_from(Some(tmp.path().to_path_buf()))
            .unwrap()
            .session_options();
        assert_eq!(opts.max_chars, 64);
        assert_eq!(opts.history_capacity, 5);
        assert_eq!(opts.indent, "    ");
        assert_eq!(opts.default_file_name, "scratch.ocl");
    }

    #[test]
    fn sanitize_logging_uses_config_target() {
        let mut cfg = Config::default();
        cfg.file.history.capacity = 0;
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let reset = with_default(subscriber, || cfg.sanitize());

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert_eq!(reset, 1);
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_values_reset_to_default"));
    }
}
