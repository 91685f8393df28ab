//! Checkout file I/O shared by scan and targeted mutations.
//!
//! Local rewrites use the atomic tmp + rename pattern so a crash mid-write
//! never leaves a half-rewritten source file. The checkout copy is updated
//! *after* the remote push succeeds, keeping a rescan without an intervening
//! pull idempotent.

use std::path::{Path, PathBuf};

use crate::error::{io_err, EngineError};

/// Read a file as UTF-8. Returns `None` (with a debug log) for files that
/// are not valid UTF-8 — binary blobs carry no markers.
pub(crate) fn read_utf8(path: &Path) -> Result<Option<String>, EngineError> {
    let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
    match String::from_utf8(bytes) {
        Ok(s) => Ok(Some(s)),
        Err(_) => {
            tracing::debug!("skipping non-UTF-8 file {}", path.display());
            Ok(None)
        }
    }
}

/// Atomically replace `path` with `content`: write `<path>.codeban.tmp`,
/// then rename over the target.
pub(crate) fn atomic_write(path: &Path, content: &str) -> Result<(), EngineError> {
    let tmp = PathBuf::from(format!("{}.codeban.tmp", path.display()));
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

/// Checkout-relative path with forward slashes — the repo path the remote
/// host expects.
pub(crate) fn repo_path(checkout: &Path, path: &Path) -> String {
    path.strip_prefix(checkout)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
