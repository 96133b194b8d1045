//! Backward search for the last record in a file
//!
//! The last record's trailing tag is the file's final word `W`, and its
//! leading tag is `W + LEADING_TAG_BASE`. Searching back from EOF for that
//! leading tag finds the record without walking the file from the front.
//!
//! The search reads fixed windows of `chunk_capacity` words that tile the file
//! backward from EOF: window `n` covers
//! `[EOF - n * cap * 4, EOF - (n - 1) * cap * 4)`. Each window is scanned
//! front to back and the first match wins, so a duplicate of the key later in
//! the same window (closer to EOF) is not preferred.

use std::io::{self, Read, Seek, SeekFrom};

use tracing::debug;

use super::{decode_word, leading_tag_for, WORD_SIZE};
use crate::{EobError, Result};

/// Result of a backward search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Leading tag found
    Found {
        /// Byte offset of the last record
        offset: u64,
        /// Windows read, including the one holding the match
        chunks: usize,
    },
    /// No match within the horizon or before the start of the file
    Exhausted {
        /// Windows read
        chunks: usize,
    },
}

impl ScanOutcome {
    /// Offset of the last record, if found
    #[must_use]
    pub fn offset(&self) -> Option<u64> {
        match *self {
            Self::Found { offset, .. } => Some(offset),
            Self::Exhausted { .. } => None,
        }
    }

    /// Number of windows read
    #[must_use]
    pub fn chunks(&self) -> usize {
        match *self {
            Self::Found { chunks, .. } | Self::Exhausted { chunks } => chunks,
        }
    }
}

/// Find the byte offset of the last record in `stream`
///
/// Reads at most `chunk_capacity` words at a time and gives up once the next
/// window would reach further than `horizon` words back from EOF. A window
/// that would start before the file does is cut at the first word boundary
/// (counted from EOF) inside the file, and is the last one read.
///
/// # Errors
///
/// Returns `ConfigError` for a zero `chunk_capacity`, and `Io` if the stream
/// is shorter than one word or cannot be read
pub fn find_last_record_offset<R: Read + Seek>(
    stream: &mut R,
    chunk_capacity: usize,
    horizon: usize,
) -> Result<ScanOutcome> {
    if chunk_capacity == 0 {
        return Err(EobError::ConfigError(
            "chunk capacity must be > 0".to_string(),
        ));
    }

    let end = stream.seek(SeekFrom::End(0))?;
    let word = WORD_SIZE as u64;
    if end < word {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("file of {end} bytes holds no complete word"),
        )
        .into());
    }

    let mut last = [0u8; WORD_SIZE];
    stream.seek(SeekFrom::Start(end - word))?;
    stream.read_exact(&mut last)?;
    let key = leading_tag_for(decode_word(&last));

    let window_bytes = (chunk_capacity * WORD_SIZE) as u64;
    let mut window = vec![0u8; chunk_capacity * WORD_SIZE];
    let mut chunk = 1usize;

    loop {
        let back = window_bytes.saturating_mul(chunk as u64);
        let window_end = end - (back - window_bytes);
        let window_start = end.checked_sub(back).unwrap_or(end % word);
        let len = (window_end - window_start) as usize;

        stream.seek(SeekFrom::Start(window_start))?;
        stream.read_exact(&mut window[..len])?;

        let found = window[..len]
            .chunks_exact(WORD_SIZE)
            .position(|bytes| decode_word(bytes) == key);

        if let Some(index) = found {
            let offset = window_start + (index * WORD_SIZE) as u64;
            debug!(chunk, offset, key, "leading tag found");
            return Ok(ScanOutcome::Found {
                offset,
                chunks: chunk,
            });
        }

        if window_start < word || (chunk + 1).saturating_mul(chunk_capacity) > horizon {
            debug!(chunk, horizon, key, "leading tag not found");
            return Ok(ScanOutcome::Exhausted { chunks: chunk });
        }

        chunk += 1;
    }
}
