//! Batch processing over lists of event-log files
//!
//! Output naming, remote path rewriting and the list of files that produced
//! no EOB live here; the per-file work is [`crate::extract::Extractor`].

mod runner;

pub use runner::{BatchRunner, BatchSummary};

use std::path::{Path, PathBuf};

use crate::{EobError, Result};

/// Name of the list of inputs that produced no output
pub const FAIL_LIST_NAME: &str = "miss_eob.list";

/// Extension given to output files, before the final `.dat`
pub const OUTPUT_EXTENSION: &str = "eob";

/// CASTOR paths are read through the public xrootd gateway
const CASTOR_GATEWAY: &str = "root://castorpublic.cern.ch//";
const CASTOR_SERVICE_CLASS: &str = "?svcClass=na62";

/// EOS paths are read through the experiment's xrootd gateway
const EOS_GATEWAY: &str = "root://eosna62.cern.ch//";

/// What to process and where results go
#[derive(Debug, Clone, Default)]
pub struct BatchPlan {
    /// Input files, in processing order
    pub inputs: Vec<PathBuf>,
    /// Prepended to every output name and to the fail list name
    pub prefix: Option<String>,
    /// Process at most this many inputs
    pub limit: Option<usize>,
}

impl BatchPlan {
    /// Inputs after applying the limit
    #[must_use]
    pub fn selected(&self) -> &[PathBuf] {
        let n = self
            .limit
            .map_or(self.inputs.len(), |limit| limit.min(self.inputs.len()));
        &self.inputs[..n]
    }

    /// Output file for `input`
    #[must_use]
    pub fn output_for(&self, input: &Path) -> PathBuf {
        output_name(input, self.prefix.as_deref())
    }

    /// Where inputs without output are listed
    #[must_use]
    pub fn fail_list_path(&self) -> PathBuf {
        PathBuf::from(format!(
            "{}{FAIL_LIST_NAME}",
            self.prefix.as_deref().unwrap_or_default()
        ))
    }
}

/// Output name for `input`: `<prefix><file stem>.eob.dat`
///
/// Only the file name of `input` is used, so outputs land relative to the
/// prefix rather than next to the input.
#[must_use]
pub fn output_name(input: &Path, prefix: Option<&str>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    PathBuf::from(format!(
        "{}{stem}.{OUTPUT_EXTENSION}.dat",
        prefix.unwrap_or_default()
    ))
}

/// Rewrite mass-storage paths to their xrootd URLs
///
/// Paths already pointing at the gateways are left alone, as is anything
/// that is neither on CASTOR nor on EOS.
#[must_use]
pub fn remote_path(input: &str) -> String {
    let mut path = input.to_string();

    if path.contains("castor") && !path.contains("castorpublic") {
        path = format!("{CASTOR_GATEWAY}{path}{CASTOR_SERVICE_CLASS}");
    }

    if path.contains("eos") && !path.contains("eosna62") {
        path = format!("{EOS_GATEWAY}{path}");
    }

    path
}

/// Read a whitespace-separated list of input paths
///
/// # Errors
///
/// Returns error if the list cannot be read
pub fn read_file_list(path: &Path) -> Result<Vec<PathBuf>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        EobError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read file list {}: {e}", path.display()),
        ))
    })?;

    Ok(content.split_whitespace().map(PathBuf::from).collect())
}
