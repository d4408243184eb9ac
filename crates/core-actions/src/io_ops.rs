//! File IO helpers used by the dispatcher.
//!
//! Synchronous and minimal. Opening normalizes line endings to LF and records
//! the dominant original style on the session; saving re-expands it.

use std::path::{Path, PathBuf};

use core_state::{EditSession, expand_line_endings, normalize_line_endings};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is too large ({chars} chars, limit {max})", path.display())]
    TooLarge {
        path: PathBuf,
        chars: usize,
        max: usize,
    },
    #[error("no file name")]
    NoFilename,
}

pub fn read_all(path: &Path) -> Result<String, FileError> {
    std::fs::read_to_string(path).map_err(|source| {
        error!(target: "io", path = %path.display(), error = %source, "file_open_error");
        FileError::Read {
            path: path.to_path_buf(),
            source,
        }
    })
}

pub fn write_all(path: &Path, text: &str) -> Result<(), FileError> {
    std::fs::write(path, text.as_bytes()).map_err(|source| {
        error!(target: "io", path = %path.display(), error = %source, "file_write_error");
        FileError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Load `path` into the session. On failure the session is untouched.
pub fn open_into(session: &mut EditSession, path: &Path) -> Result<(), FileError> {
    let content = read_all(path)?;
    let norm = normalize_line_endings(&content);
    if norm.mixed {
        warn!(target: "io", path = %path.display(), "mixed_line_endings");
    }
    session.load_from(&norm.normalized).map_err(|_| FileError::TooLarge {
        path: path.to_path_buf(),
        chars: norm.normalized.chars().count(),
        max: session.buffer().max_chars(),
    })?;
    session.file_path = Some(path.to_path_buf());
    session.original_line_ending = norm.original;
    info!(target: "io", path = %path.display(), lines = session.line_count(), "file_opened");
    Ok(())
}

/// Write the session to `target`, or to its own path when `target` is `None`.
/// Returns the path written and marks the session saved.
pub fn save_session(session: &mut EditSession, target: Option<&Path>) -> Result<PathBuf, FileError> {
    let path = match target {
        Some(p) => p.to_path_buf(),
        None => session.file_path.clone().ok_or(FileError::NoFilename)?,
    };
    let content = expand_line_endings(&session.current_text(), session.original_line_ending);
    write_all(&path, &content)?;
    session.mark_saved(path.clone());
    info!(target: "io", path = %path.display(), bytes = content.len(), "file_saved");
    Ok(path)
}
