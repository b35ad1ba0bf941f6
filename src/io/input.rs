//! Reading plan requests from JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::plan::types::PlanInput;

/// Failure to load a plan request from disk.
#[derive(Debug, Error)]
pub enum InputFileError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads a camelCase JSON plan request from `path`.
///
/// The request is only parsed here; call [`PlanInput::validate`] before
/// trusting quantities or bill values.
///
/// # Errors
///
/// Returns an `InputFileError` if the file cannot be read or is not a
/// well-formed request.
pub fn read_plan_input(path: &Path) -> Result<PlanInput, InputFileError> {
    let text = fs::read_to_string(path).map_err(|source| InputFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| InputFileError::Json {
        path: path.to_path_buf(),
        source,
    })
}
