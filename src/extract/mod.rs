//! Per-file extraction of the first event and End-Of-Burst record

mod engine;
mod open;

pub use engine::{Extraction, Extractor};
pub use open::open_with_timeout;

/// Default deadline for opening an input, in milliseconds
pub const DEFAULT_OPEN_TIMEOUT_MS: u64 = 5000;
