//! # Flat-File Data Store
//!
//! This crate is the pipeline's only window onto the filesystem for instrument
//! data. It finds the per-instrument files in a directory, reads raw price
//! histories (enforcing the required columns), and writes and reads back the
//! derived histories produced by the transformer.
//!
//! ## Public API
//!
//! - `list_instrument_files` / `ensure_dir`: directory discovery and creation.
//! - `FileRepository`: reads raw histories with the configured column names and
//!   round-trips derived histories.
//! - `DataError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod discovery;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use discovery::{ensure_dir, instrument_id, list_instrument_files};
pub use error::DataError;
pub use repository::{DERIVED_REQUIRED_COLUMNS, FileRepository, RawColumns};
