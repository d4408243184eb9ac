use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{ConsoleOutput, FileError, InterpreterRunner, ProcessRunner, io_ops};
use core_config::{Config, load_from};
use core_state::EditSession;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod frontend;
mod host;

use frontend::LineFrontend;
use host::TerminalHost;

#[derive(Parser, Debug)]
#[command(name = "ocl-edit", version, about = "OCL source editor")]
struct Args {
    /// File to open at startup. If omitted the welcome text is shown.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `ocl-edit.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Execute the file through the interpreter and print its output.
    #[arg(long, conflicts_with = "debug")]
    pub run: bool,
    /// Like `--run` with the interpreter's debug flag.
    #[arg(long)]
    pub debug: bool,
}

struct AppStartup {
    _log_guard: Option<WorkerGuard>,
}

struct Bootstrap {
    session: EditSession,
    config: Config,
    open_failed: bool,
}

impl AppStartup {
    fn new() -> Self {
        Self { _log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("ocl-edit.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "ocl-edit.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self._log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }

    /// Config plus the initial session: the requested file, an empty buffer
    /// bound to it when it does not exist yet, or the welcome text.
    fn load_session(args: &Args) -> Result<Bootstrap> {
        let config = load_from(args.config.clone())?;
        let opts = config.session_options();
        let mut session = EditSession::with_text(&config.file.editor.welcome_text, &opts)
            .or_else(|_| EditSession::with_text("", &opts))
            .context("creating initial session")?;
        let mut open_failed = false;
        if let Some(path) = &args.path {
            match io_ops::open_into(&mut session, path) {
                Ok(()) => {}
                Err(FileError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                    info!(target: "runtime.startup", path = %path.display(), "initial_path_new_file");
                    session.load_from("")?;
                    session.file_path = Some(path.clone());
                    open_failed = true;
                }
                Err(e) => {
                    warn!(target: "runtime.startup", path = %path.display(), error = %e, "initial_open_failed");
                    eprintln!("ocl-edit: {e}");
                    open_failed = true;
                }
            }
        }
        Ok(Bootstrap {
            session,
            config,
            open_failed,
        })
    }
}

fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let boot = AppStartup::load_session(&args)?;
    info!(
        target: "runtime.startup",
        name = %boot.session.display_name(),
        open_failed = boot.open_failed,
        config_override = args.config.is_some(),
        max_chars = boot.config.file.buffer.max_chars,
        history_capacity = boot.config.file.history.capacity,
        "bootstrap_complete"
    );

    let runner = InterpreterRunner::from_config(&boot.config.file.interpreter);

    if args.run || args.debug {
        if args.path.is_none() || boot.open_failed {
            anyhow::bail!("--run and --debug need a readable source file");
        }
        let mut session = boot.session;
        session.debug_mode = args.debug;
        let output = runner.execute(&session.serialize_for_execution(), args.debug);
        let mut stdout = io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    let host = TerminalHost::new(
        io::stdin().lock(),
        io::stdout().lock(),
        Box::new(runner),
        boot.config.file.editor.new_file_text.clone(),
    );
    let console = ConsoleOutput::new(boot.config.file.interpreter.output_limit);
    let mut frontend = LineFrontend::new(boot.session, host, console);
    frontend.run()?;
    info!(target: "runtime", "shutdown");
    Ok(())
}
