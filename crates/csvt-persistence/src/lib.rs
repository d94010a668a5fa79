//! Resumable session files for csv-tagger.
//!
//! A session file captures everything needed to pick an annotation effort
//! back up: the schema, the tag registry, every record with its current tag,
//! and the cursor.
//!
//! # Features
//!
//! - **Self-describing JSON** documents with a format name and version
//! - **All-or-nothing loading**: every invariant is checked before a
//!   [`SessionState`](csvt_core::SessionState) is built
//! - **Atomic writes** so a failed save never damages the previous file
//! - **Source change detection** via SHA-256 hashing
//!
//! # File Format
//!
//! `.csvt` files are UTF-8 JSON:
//!
//! ```text
//! {
//!   "format": "csv-tagger-session",
//!   "version": 1,
//!   "created_at": "2024-02-01T10:00:00+00:00",
//!   "saved_at": "2024-02-01T10:12:31+00:00",
//!   "source": { "path": "...", "sha256": "...", "options": { ... } },
//!   "session": {
//!     "tag_column": "tag",
//!     "columns": [{ "name": "amount", "kind": "number" }],
//!     "tags": ["solo", "shared"],
//!     "leading_rows": [["amount"]],
//!     "records": [{ "fields": ["1,20"], "values": [{ "type": "number", "value": 1.2 }],
//!                   "tag": "solo", "flagged": false }],
//!     "cursor": 1
//!   }
//! }
//! ```
//!
//! A `null` cursor means every record is tagged.
//!
//! # Example
//!
//! ```ignore
//! use csvt_persistence::{SessionDocument, load_session, save_session};
//!
//! let mut document = SessionDocument::new(session, None);
//! save_session(&mut document, Path::new("statement.csvt"))?;
//!
//! let resumed = load_session(Path::new("statement.csvt"))?;
//! assert_eq!(resumed.state, document.state);
//! ```
//!
//! # Architecture
//!
//! - `types.rs` - Serializable snapshot types
//! - `convert.rs` - Conversion between live state and snapshots
//! - `codec.rs` - Document encoding with format and version checks
//! - `io/` - File operations (atomic save, load, source hashing)
//! - `autosave.rs` - Unsaved change tracking
//! - `error.rs` - Error types with user-friendly messages

mod autosave;
mod codec;
mod convert;
mod error;
mod io;
mod types;

pub use autosave::DirtyTracker;
pub use codec::{
    SessionDocument, decode, deserialize, encode, serialize, session_json_schema,
};
pub use convert::{FromSnapshot, ToSnapshot};
pub use error::{PersistenceError, Result};
pub use io::{
    SourceStatus, compute_file_hash, load_session, save_session, verify_file_hash, write_atomic,
};
pub use types::{
    CURRENT_SCHEMA_VERSION, ColumnSnapshot, FORMAT_NAME, RecordSnapshot, SessionFile,
    SessionSnapshot, SourceSnapshot, ValueSnapshot,
};
