//! Annotation session engine for csv-tagger.
//!
//! A [`SessionState`] bundles the schema, tag registry, records and cursor of
//! one annotation effort. [`Navigator`] moves the cursor and applies tag
//! edits; [`summarize`] reports tag counts at any point.
//!
//! # Example
//!
//! ```ignore
//! use csvt_core::{Navigator, NavigationState, summarize};
//!
//! let mut nav = Navigator::new(&mut session);
//! nav.tag_current("solo")?;
//! nav.jump_to(2)?;
//! nav.tag_current("shared")?;
//!
//! let summary = summarize(&session);
//! println!("{} untagged", summary.unannotated_count());
//! ```

mod error;
mod navigation;
mod session;
mod summary;

pub use error::{NavigationError, SessionError};
pub use navigation::{NavigationState, Navigator, Progress};
pub use session::{Cursor, SessionState};
pub use summary::{ColumnTotal, Summary, TagSummary, summarize};
