//! Batch runner

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use super::{remote_path, BatchPlan};
use crate::extract::Extractor;
use crate::Result;

/// Counts from one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Inputs handed to the extractor
    pub processed: usize,
    /// Outputs written
    pub written: usize,
    /// Inputs skipped because their output already existed
    pub skipped: usize,
    /// Inputs that produced no output
    pub failed: Vec<PathBuf>,
}

/// Runs an [`Extractor`] over many inputs, one at a time
pub struct BatchRunner<'a> {
    extractor: &'a Extractor,
}

impl<'a> BatchRunner<'a> {
    /// Create a runner around `extractor`
    #[must_use]
    pub fn new(extractor: &'a Extractor) -> Self {
        Self { extractor }
    }

    /// Process a single input into an explicitly named output
    ///
    /// No fail list is kept; the result is returned instead.
    pub async fn run_single(&self, input: &Path, output: &Path, log: &mut dyn Write) -> bool {
        let input = resolve_input(input, log);
        self.extractor.process_file(&input, output, log).await
    }

    /// Process every selected input in `plan`
    ///
    /// Inputs whose output already exists are skipped. Inputs that produce
    /// no output are appended to the plan's fail list, which is created (and
    /// truncated) up front.
    ///
    /// # Errors
    ///
    /// Returns error only if the fail list cannot be created or written;
    /// per-file failures are recorded in the summary
    pub async fn run(&self, plan: &BatchPlan, log: &mut dyn Write) -> Result<BatchSummary> {
        let inputs = plan.selected();
        let mut fail_list = BufWriter::new(File::create(plan.fail_list_path())?);
        let mut summary = BatchSummary::default();

        let noun = if inputs.len() == 1 { "file" } else { "files" };
        let _ = writeln!(log, "Processing {} {noun}", inputs.len());
        info!(count = inputs.len(), "batch started");

        for input in inputs {
            let output = plan.output_for(input);
            if output.exists() {
                let _ = writeln!(log, "Output file already exists. Skipping ... ");
                summary.skipped += 1;
                continue;
            }

            let resolved = resolve_input(input, log);
            let ok = self.extractor.process_file(&resolved, &output, log).await;
            let _ = writeln!(log, "\n");

            summary.processed += 1;
            if ok {
                summary.written += 1;
            } else {
                writeln!(fail_list, "{}", input.display())?;
                fail_list.flush()?;
                summary.failed.push(input.clone());
            }
        }

        info!(
            processed = summary.processed,
            written = summary.written,
            skipped = summary.skipped,
            failed = summary.failed.len(),
            "batch finished"
        );
        Ok(summary)
    }
}

fn resolve_input(input: &Path, log: &mut dyn Write) -> PathBuf {
    let original = input.to_string_lossy();
    let rewritten = remote_path(&original);
    if rewritten != original {
        let _ = writeln!(log, "input: {rewritten}");
    }
    PathBuf::from(rewritten)
}
