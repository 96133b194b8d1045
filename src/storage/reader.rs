//! Event-log record reader

use std::io::{Read, Seek, SeekFrom};

use super::format::{Record, LENGTH_INDEX};
use super::scanner::{find_last_record_offset, ScanOutcome};
use super::{decode_word, decode_words, WORD_SIZE};
use crate::config::Config;
use crate::Result;

/// Read the record starting at byte `start_offset`
///
/// On success the stream is left at the first byte after the record.
///
/// # Errors
///
/// Returns `Io` if the stream cannot be seeked or ends inside the record, and
/// `InvalidFormat` if the length field is below the format minimum or above
/// `max_words`
pub fn read_record<R: Read + Seek>(
    stream: &mut R,
    start_offset: u64,
    max_words: u32,
) -> Result<Record> {
    stream.seek(SeekFrom::Start(start_offset + (LENGTH_INDEX * WORD_SIZE) as u64))?;
    let mut length_bytes = [0u8; WORD_SIZE];
    stream.read_exact(&mut length_bytes)?;
    let length = decode_word(&length_bytes);

    Record::validate_length(length, max_words)?;

    let mut buf = vec![0u8; length as usize * WORD_SIZE];
    stream.seek(SeekFrom::Start(start_offset))?;
    stream.read_exact(&mut buf)?;

    Record::from_words(decode_words(&buf))
}

/// Reader for a single event-log file
///
/// Owns the stream and the limits that apply to it; holds no record state
/// between calls.
pub struct RecordReader<R> {
    inner: R,
    max_record_words: u32,
    chunk_capacity: usize,
    horizon: usize,
}

impl<R: Read + Seek> RecordReader<R> {
    /// Wrap an open stream using the limits from `config`
    #[must_use]
    pub fn new(inner: R, config: &Config) -> Self {
        Self {
            inner,
            max_record_words: config.limits.max_record_words,
            chunk_capacity: config.scan.chunk_capacity,
            horizon: config.scan.horizon,
        }
    }

    /// Read the record at `offset`
    ///
    /// # Errors
    ///
    /// See [`read_record`]
    pub fn read_at(&mut self, offset: u64) -> Result<Record> {
        read_record(&mut self.inner, offset, self.max_record_words)
    }

    /// Read the first record in the file
    ///
    /// # Errors
    ///
    /// See [`read_record`]
    pub fn first_record(&mut self) -> Result<Record> {
        self.read_at(0)
    }

    /// Locate the start of the last record by searching back from EOF
    ///
    /// # Errors
    ///
    /// Returns error on I/O failure; an unsuccessful search is
    /// [`ScanOutcome::Exhausted`], not an error
    pub fn locate_last_record(&mut self) -> Result<ScanOutcome> {
        find_last_record_offset(&mut self.inner, self.chunk_capacity, self.horizon)
    }

    /// Words per backward search window
    #[must_use]
    pub fn chunk_capacity(&self) -> usize {
        self.chunk_capacity
    }

    /// Backward search limit in words
    #[must_use]
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Give back the underlying stream
    pub fn into_inner(self) -> R {
        self.inner
    }
}
