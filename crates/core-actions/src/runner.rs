//! External interpreter execution for Run / Debug.
//!
//! The source is written to a temporary `.ocl` file and the interpreter is
//! invoked as `program args.. [debug_flag] <file>`. Stdout and stderr are
//! captured into one string. Failures are reported in-band as `> Error: ..`
//! lines so the console shows them like any other output.

use std::io::Write;
use std::process::Command;

use core_config::InterpreterConfig;
use tracing::{debug, warn};

use crate::console::truncate_to_boundary;

pub trait ProcessRunner {
    /// Run `source`; the returned text is what the console should display.
    fn execute(&self, source: &str, debug: bool) -> String;
}

#[derive(Debug, Clone)]
pub struct InterpreterRunner {
    program: String,
    args: Vec<String>,
    debug_flag: String,
    output_limit: usize,
}

impl InterpreterRunner {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        debug_flag: impl Into<String>,
        output_limit: usize,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            debug_flag: debug_flag.into(),
            output_limit,
        }
    }

    pub fn from_config(cfg: &InterpreterConfig) -> Self {
        Self::new(
            cfg.program.clone(),
            cfg.args.clone(),
            cfg.debug_flag.clone(),
            cfg.output_limit,
        )
    }

    fn bounded(&self, text: &str) -> String {
        truncate_to_boundary(text, self.output_limit).to_string()
    }
}

impl ProcessRunner for InterpreterRunner {
    fn execute(&self, source: &str, debug: bool) -> String {
        let mut file = match tempfile::Builder::new()
            .prefix("ocl-run-")
            .suffix(".ocl")
            .tempfile()
        {
            Ok(f) => f,
            Err(e) => {
                warn!(target: "runner", error = %e, "temp_file_create_failed");
                return self.bounded("> Error: Cannot create temp file\n");
            }
        };
        if let Err(e) = file.write_all(source.as_bytes()).and_then(|_| file.flush()) {
            warn!(target: "runner", error = %e, "temp_file_write_failed");
            return self.bounded("> Error: Cannot create temp file\n");
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if debug && !self.debug_flag.is_empty() {
            cmd.arg(&self.debug_flag);
        }
        cmd.arg(file.path());
        let debug_run = debug;
        debug!(target: "runner", program = %self.program, debug_run, chars = source.chars().count(), "interpreter_spawn");

        let out = match cmd.output() {
            Ok(o) => o,
            Err(e) => {
                warn!(target: "runner", program = %self.program, error = %e, "interpreter_spawn_failed");
                return self.bounded(&format!(
                    "> Error: Failed to start {}: {e}\n",
                    self.program
                ));
            }
        };
        let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&out.stderr));
        if !out.status.success() {
            let code = out.status.code().unwrap_or(-1);
            warn!(target: "runner", code, "interpreter_failed");
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&format!("> Error: Command failed with code {code}\n"));
        }
        debug!(target: "runner", bytes = text.len(), limit = self.output_limit, "interpreter_done");
        self.bounded(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_reports_error_line() {
        let r = InterpreterRunner::new("__no_such_interpreter__", vec![], "--debug", 1024);
        let out = r.execute("print 1;", false);
        assert!(out.starts_with("> Error: Failed to start __no_such_interpreter__"));
    }

    #[test]
    fn error_output_is_bounded() {
        let r = InterpreterRunner::new("__no_such_interpreter__", vec![], "", 10);
        assert_eq!(r.execute("", false).len(), 10);
    }

    #[cfg(unix)]
    #[test]
    fn runs_program_with_source_file() {
        let r = InterpreterRunner::new("cat", vec![], "", 1024);
        assert_eq!(r.execute("let x = 10;\n", false), "let x = 10;\n");
    }

    #[cfg(unix)]
    #[test]
    fn debug_flag_precedes_file() {
        // sh -c 'echo "$1"' sh --debug <file>  -> prints the flag
        let r = InterpreterRunner::new(
            "sh",
            vec!["-c".into(), "echo \"$1\"".into(), "sh".into()],
            "--debug",
            1024,
        );
        assert_eq!(r.execute("", true), "--debug\n");
        assert!(r.execute("", false).ends_with(".ocl\n"));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_appends_error_line() {
        let r = InterpreterRunner::new(
            "sh",
            vec!["-c".into(), "echo oops >&2; exit 3".into(), "sh".into()],
            "",
            1024,
        );
        assert_eq!(
            r.execute("", false),
            "oops\n> Error: Command failed with code 3\n"
        );
    }
}
