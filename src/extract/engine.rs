//! Extraction engine: first event, last event, End-Of-Burst decision

use std::io::Write;
use std::path::Path;

use tracing::{debug, info, warn};

use super::open::open_with_timeout;
use crate::config::Config;
use crate::storage::{write_selected_to_path, RecordReader, ScanOutcome, Word};
use crate::{EobError, Result};

/// Progress output is best effort; a broken log sink never fails a file
macro_rules! report {
    ($log:expr, $($arg:tt)*) => {
        let _ = writeln!($log, $($arg)*);
    };
}

/// What happened to one input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Last record is an EOB; first and last record were written
    Written,
    /// Last record found but it is not an EOB; nothing written
    NoEndOfBurst {
        /// Trigger key of the last record
        trigger_key: Word,
    },
    /// Leading tag of the last record not found; nothing written
    SearchExhausted {
        /// Windows read before giving up
        chunks: usize,
    },
}

impl Extraction {
    /// Whether an output file was produced
    #[must_use]
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written)
    }
}

/// Extracts first-event/EOB pairs from event-log files, one file per call
pub struct Extractor {
    config: Config,
}

impl Extractor {
    /// Create an extractor with the given tunables
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process one file, reporting only success
    ///
    /// Returns `true` if the last record was an EOB and the pair was written
    /// to `output`. Every failure is written to `log` and logged, then turned
    /// into `false`.
    pub async fn process_file(&self, input: &Path, output: &Path, log: &mut dyn Write) -> bool {
        match self.extract(input, output, log).await {
            Ok(extraction) => extraction.is_written(),
            Err(EobError::Timeout { millis }) => {
                report!(log, "Timeout on open!");
                warn!(input = %input.display(), millis, "skipping file: open timed out");
                false
            }
            Err(e) => {
                report!(log, "{e}");
                report!(log, "Skipping this file ...");
                warn!(input = %input.display(), error = %e, "skipping file");
                false
            }
        }
    }

    /// Process one file and say what happened
    ///
    /// # Errors
    ///
    /// Returns error if the input cannot be opened in time or read, if a
    /// record is malformed, or if the output cannot be written
    pub async fn extract(
        &self,
        input: &Path,
        output: &Path,
        log: &mut dyn Write,
    ) -> Result<Extraction> {
        report!(log, "input: {}", input.display());
        report!(log, "output: {}", output.display());

        let file = open_with_timeout(input, self.config.open.timeout()).await?;
        let mut reader = RecordReader::new(file, &self.config);

        let first = reader.first_record()?;
        report!(log, "\nFirst event:\n{first}");
        debug!(
            length = first.length(),
            burst = first.burst_id(),
            trigger = first.trigger_word(),
            "first record"
        );

        let offset = match reader.locate_last_record()? {
            ScanOutcome::Found { offset, chunks } => {
                report!(
                    log,
                    "\nSearched {chunks} chunks of {} words.",
                    reader.chunk_capacity()
                );
                offset
            }
            ScanOutcome::Exhausted { chunks } => {
                report!(log, "No key word match in last {} words", reader.horizon());
                report!(log, "Skipping this file ...");
                warn!(input = %input.display(), chunks, "last record not found");
                return Ok(Extraction::SearchExhausted { chunks });
            }
        };

        let last = reader.read_at(offset)?;
        let trigger_key = last.trigger_key();
        report!(log, "\nLast event:\n{last}");
        report!(log, "    SOB pair: {trigger_key:#04x}");

        if !last.is_end_of_burst() {
            report!(log, "\nNo EOB found!\nNot writing anything");
            info!(input = %input.display(), trigger_key, "no EOB");
            return Ok(Extraction::NoEndOfBurst { trigger_key });
        }

        report!(
            log,
            "\nEOB found!\nWriting 1 event and EOB to {}",
            output.display()
        );
        write_selected_to_path(output, &first, &last)?;
        info!(
            input = %input.display(),
            output = %output.display(),
            burst = last.burst_id(),
            "EOB written"
        );

        Ok(Extraction::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{encode_words, LEADING_TAG_BASE};
    use std::path::PathBuf;
    use tempfile::TempDir;

    const TAIL: Word = 0x0000_0BEE;

    fn write_input(dir: &TempDir, words: &[Word]) -> PathBuf {
        let path = dir.path().join("burst.dat");
        let mut buf = Vec::new();
        encode_words(&mut buf, words);
        std::fs::write(&path, buf).unwrap();
        path
    }

    fn burst_file(last_trigger: Word) -> Vec<Word> {
        vec![
            0x0000_0001, 6, 42, 0, 0x23, 0x0000_0A0A, // first event
            0x0000_0002, 5, 42, 0, 0x10, // filler event
            TAIL.wrapping_add(LEADING_TAG_BASE), 6, 42, 0, last_trigger, TAIL, // last event
        ]
    }

    #[tokio::test]
    async fn test_extract_writes_pair() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, &burst_file(0x0000_0123));
        let output = dir.path().join("burst.eob.dat");
        let mut log = Vec::new();

        let extraction = Extractor::new(Config::default())
            .extract(&input, &output, &mut log)
            .await
            .unwrap();

        assert_eq!(extraction, Extraction::Written);
        let written = std::fs::read(&output).unwrap();
        assert_eq!(written.len(), 12 * 4);

        let log = String::from_utf8(log).unwrap();
        assert!(log.contains("Searched 1 chunks of 10000 words."));
        assert!(log.contains("SOB pair: 0x23"));
        assert!(log.contains("EOB found!"));
    }

    #[tokio::test]
    async fn test_extract_without_eob() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, &burst_file(0x01));
        let output = dir.path().join("burst.eob.dat");
        let mut log = Vec::new();

        let extraction = Extractor::new(Config::default())
            .extract(&input, &output, &mut log)
            .await
            .unwrap();

        assert_eq!(extraction, Extraction::NoEndOfBurst { trigger_key: 0x01 });
        assert!(!output.exists());
        assert!(String::from_utf8(log).unwrap().contains("No EOB found!"));
    }

    #[tokio::test]
    async fn test_extract_search_exhausted() {
        let dir = TempDir::new().unwrap();
        let mut words = burst_file(0x23);
        words[11] = 0; // drop the last record's leading tag
        let input = write_input(&dir, &words);
        let output = dir.path().join("burst.eob.dat");
        let mut log = Vec::new();

        let mut config = Config::default();
        config.scan.chunk_capacity = 4;
        config.scan.horizon = 8;

        let extraction = Extractor::new(config)
            .extract(&input, &output, &mut log)
            .await
            .unwrap();

        assert_eq!(extraction, Extraction::SearchExhausted { chunks: 2 });
        assert!(!output.exists());
        assert!(String::from_utf8(log)
            .unwrap()
            .contains("No key word match in last 8 words"));
    }

    #[tokio::test]
    async fn test_process_file_reports_bad_length() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, &[1, 3, 0, 0, 0, 0]);
        let output = dir.path().join("out.dat");
        let mut log = Vec::new();

        let ok = Extractor::new(Config::default())
            .process_file(&input, &output, &mut log)
            .await;

        assert!(!ok);
        assert!(!output.exists());
        assert!(String::from_utf8(log).unwrap().contains("Skipping this file ..."));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_file_open_timeout() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("stalled.dat");
        let status = std::process::Command::new("mkfifo").arg(&input).status().unwrap();
        assert!(status.success());
        let output = dir.path().join("stalled.eob.dat");

        let mut config = Config::default();
        config.open.timeout_ms = 100;
        let mut log = Vec::new();

        let ok = Extractor::new(config)
            .process_file(&input, &output, &mut log)
            .await;

        assert!(!ok);
        assert!(!output.exists());
        let log = String::from_utf8(log).unwrap();
        assert!(log.contains("Timeout on open!"));
        assert!(!log.contains("First event:"));
    }

    #[tokio::test]
    async fn test_process_file_missing_input() {
        let dir = TempDir::new().unwrap();
        let mut log = Vec::new();

        let ok = Extractor::new(Config::default())
            .process_file(&dir.path().join("absent.dat"), &dir.path().join("o"), &mut log)
            .await;

        assert!(!ok);
    }
}
