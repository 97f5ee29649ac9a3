//! CSV bulk-load pipeline for Flatsmith.
//!
//! Resolves source and archive path patterns through the templating engine,
//! streams the CSV into a PostgreSQL table with `COPY FROM STDIN`, and moves
//! the source file into its archive location afterwards.

pub mod config;
pub mod errors;
pub mod pipeline;

pub use config::LoadConfig;
pub use errors::LoadError;
pub use pipeline::{LoadReport, Loader};
