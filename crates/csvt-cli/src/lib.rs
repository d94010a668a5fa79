//! Library components of the `csv-tagger` command.

pub mod config;
pub mod interactive;
pub mod logging;
pub mod prompt;
pub mod render;
pub mod summary;
pub mod workflow;
