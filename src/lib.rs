//! eob-extract - first event and End-Of-Burst extraction for DAQ event logs
//!
//! Reads the first record of a burst file, finds the last record by searching
//! back from the end of the file, and writes both out when the last one is an
//! End-Of-Burst marker.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::cargo)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::field_reassign_with_default,
    clippy::multiple_crate_versions
)]

pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod storage;

pub use error::{EobError, Result};
pub use extract::{Extraction, Extractor};
