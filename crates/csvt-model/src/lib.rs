//! Record model for csv-tagger.
//!
//! Typed columns ([`Schema`]), the closed set of legal tags
//! ([`TagRegistry`]) and the fixed-length [`RecordStore`] that holds every
//! row and its current tag.

pub mod error;
pub mod record;
pub mod schema;
pub mod tags;
pub mod value;

pub use error::{IndexError, SchemaError, StoreError, UnknownTagError};
pub use record::{Record, RecordStore};
pub use schema::{Column, ColumnKind, Schema, generated_column_name};
pub use tags::TagRegistry;
pub use value::{DATE_FORMATS, Value, parse_date, parse_number};
