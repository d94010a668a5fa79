//! Session document encoding.

use chrono::Utc;
use serde::Deserialize;

use csvt_core::SessionState;

use crate::convert::{FromSnapshot, ToSnapshot};
use crate::error::{PersistenceError, Result};
use crate::types::{CURRENT_SCHEMA_VERSION, FORMAT_NAME, SessionFile, SourceSnapshot};

/// A live session together with its file metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDocument {
    /// RFC 3339.
    pub created_at: String,
    /// RFC 3339.
    pub saved_at: String,
    pub source: Option<SourceSnapshot>,
    pub state: SessionState,
}

impl SessionDocument {
    /// Wrap a freshly imported session.
    pub fn new(state: SessionState, source: Option<SourceSnapshot>) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            created_at: now.clone(),
            saved_at: now,
            source,
            state,
        }
    }

    /// Update the saved timestamp.
    pub fn touch(&mut self) {
        self.saved_at = Utc::now().to_rfc3339();
    }

    pub fn to_file(&self) -> SessionFile {
        SessionFile {
            format: FORMAT_NAME.to_string(),
            version: CURRENT_SCHEMA_VERSION,
            created_at: self.created_at.clone(),
            saved_at: self.saved_at.clone(),
            source: self.source.clone(),
            session: self.state.to_snapshot(),
        }
    }

    /// Rebuild the live session, checking the header and every invariant.
    pub fn from_file(file: SessionFile) -> Result<Self> {
        check_header(Some(&file.format), Some(file.version))?;
        Ok(Self {
            state: SessionState::from_snapshot(file.session)?,
            created_at: file.created_at,
            saved_at: file.saved_at,
            source: file.source,
        })
    }
}

/// The fields read before the rest of the document, so a newer layout is
/// reported as a version problem rather than as corruption.
#[derive(Deserialize)]
struct Header {
    format: Option<String>,
    version: Option<u32>,
}

fn check_header(format: Option<&str>, version: Option<u32>) -> Result<()> {
    if format != Some(FORMAT_NAME) {
        return Err(PersistenceError::corrupt(format!(
            "not a csv-tagger session (format is {})",
            format.map_or_else(|| "missing".to_string(), |f| format!("'{f}'"))
        )));
    }
    match version {
        None | Some(0) => Err(PersistenceError::corrupt("missing or invalid version")),
        Some(found) if found > CURRENT_SCHEMA_VERSION => Err(PersistenceError::UnsupportedVersion {
            found,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: None,
        }),
        Some(_) => Ok(()),
    }
}

/// JSON Schema of the session file, for tools that read `.csvt` files.
pub fn session_json_schema() -> Result<String> {
    let schema = schemars::schema_for!(SessionFile);
    serde_json::to_string_pretty(&schema)
        .map_err(|source| PersistenceError::Serialization { source })
}

/// Encode a document as pretty-printed JSON.
pub fn encode(document: &SessionDocument) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(&document.to_file())
        .map_err(|source| PersistenceError::Serialization { source })?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decode a document. All-or-nothing: either every check passes or nothing
/// is returned.
pub fn decode(bytes: &[u8]) -> Result<SessionDocument> {
    let header: Header = serde_json::from_slice(bytes)
        .map_err(|e| PersistenceError::corrupt(format!("not a JSON document: {e}")))?;
    check_header(header.format.as_deref(), header.version)?;

    let file: SessionFile = serde_json::from_slice(bytes)
        .map_err(|e| PersistenceError::corrupt(e.to_string()))?;
    SessionDocument::from_file(file)
}

/// Encode a bare session with fresh timestamps and no source.
pub fn serialize(state: &SessionState) -> Result<Vec<u8>> {
    encode(&SessionDocument::new(state.clone(), None))
}

/// Decode a session, dropping the file metadata.
pub fn deserialize(bytes: &[u8]) -> Result<SessionState> {
    decode(bytes).map(|document| document.state)
}
