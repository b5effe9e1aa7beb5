//! Error types for diagram validation and persistence.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("foreign key '{constraint}' is inconsistent: {detail}")]
    InconsistentForeignKey { constraint: String, detail: String },

    #[error("output path {path} must have a .{expected} extension")]
    InvalidExtension { path: PathBuf, expected: &'static str },

    #[error("failed to write diagram: {0}")]
    Io(#[from] std::io::Error),
}
