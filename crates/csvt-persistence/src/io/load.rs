//! Session loading operations.

use std::fs;
use std::path::Path;

use crate::codec::{SessionDocument, decode};
use crate::error::{PersistenceError, Result};

/// Load a session from a `.csvt` file.
///
/// Decoding errors carry `path`.
pub fn load_session(path: &Path) -> Result<SessionDocument> {
    let bytes = fs::read(path).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;

    let document = decode(&bytes).map_err(|e| e.with_path(path))?;

    tracing::info!(
        path = %path.display(),
        records = document.state.len(),
        annotated = document.state.store().annotated_count(),
        "loaded session"
    );
    Ok(document)
}
