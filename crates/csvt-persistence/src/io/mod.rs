//! File I/O operations for session persistence.
//!
//! This module handles:
//! - Atomic writes for sessions and exported CSV files
//! - Loading sessions with format validation
//! - Source file hashing for change detection

mod hash;
mod load;
mod save;

pub use hash::{SourceStatus, compute_file_hash, verify_file_hash};
pub use load::load_session;
pub use save::{save_session, write_atomic};
