//! Persisting generated diagrams to disk.

use crate::diagram::{Dialect, DiagramError};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Check that `path` carries the dialect's file extension (case-insensitive)
pub fn check_extension(path: &Path, dialect: Dialect) -> Result<(), DiagramError> {
    let matches = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(dialect.extension()))
        .unwrap_or(false);

    if matches {
        Ok(())
    } else {
        Err(DiagramError::InvalidExtension {
            path: path.to_path_buf(),
            expected: dialect.extension(),
        })
    }
}

/// Write a diagram to `path` and return a confirmation message.
///
/// The file is written to a temporary sibling and moved into place, so a
/// failed write never leaves a partial diagram behind. Missing parent
/// directories are created.
pub fn save_to_file(content: &str, path: &Path, dialect: Dialect) -> Result<String, DiagramError> {
    check_extension(path, dialect)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| DiagramError::Io(e.error))?;

    debug!(path = %path.display(), bytes = content.len(), "diagram persisted");

    Ok(format!(
        "{} saved to {} ({} bytes)",
        dialect.label(),
        path.display(),
        content.len()
    ))
}
