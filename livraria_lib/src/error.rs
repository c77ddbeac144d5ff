//! Error types for the library layer.

use std::path::PathBuf;

/// Errors produced by the library layer: persistence failures and invalid
/// caller input. Matching itself never fails; a low-confidence match is
/// reported in the result, not raised.
#[derive(thiserror::Error, Debug)]
pub enum LivrariaError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
