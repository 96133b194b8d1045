//! Record structure and field accessors

use std::fmt;

use super::{Word, END_OF_BURST_KEY, MIN_RECORD_WORDS};
use crate::{EobError, Result};

/// Index of the record length field
pub const LENGTH_INDEX: usize = 1;

/// Index of the burst identifier
pub const BURST_ID_INDEX: usize = 2;

/// Index of the trigger word
pub const TRIGGER_WORD_INDEX: usize = 4;

/// One variable-length event record
///
/// Always holds at least [`MIN_RECORD_WORDS`] words, and exactly as many as
/// its own length field declares, so the accessors below never go out of
/// bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    words: Vec<Word>,
}

impl Record {
    /// Build a record from its words
    ///
    /// # Errors
    ///
    /// Returns error if the words are too few or disagree with the length
    /// field they carry
    pub fn from_words(words: Vec<Word>) -> Result<Self> {
        if words.len() < MIN_RECORD_WORDS as usize {
            return Err(EobError::InvalidFormat(format!(
                "Record has {} words, need at least {MIN_RECORD_WORDS}",
                words.len()
            )));
        }

        let declared = words[LENGTH_INDEX] as usize;
        if declared != words.len() {
            return Err(EobError::InvalidFormat(format!(
                "Record length field says {declared} words, got {}",
                words.len()
            )));
        }

        Ok(Self { words })
    }

    /// Check a length field against the format minimum and a ceiling
    ///
    /// # Errors
    ///
    /// Returns error if `length` is outside `MIN_RECORD_WORDS..=max_words`
    pub fn validate_length(length: Word, max_words: u32) -> Result<()> {
        if length < MIN_RECORD_WORDS {
            return Err(EobError::InvalidFormat(format!(
                "Record length {length} below minimum of {MIN_RECORD_WORDS} words"
            )));
        }
        if length > max_words {
            return Err(EobError::InvalidFormat(format!(
                "Record length {length} exceeds limit of {max_words} words"
            )));
        }
        Ok(())
    }

    /// Raw words, in file order
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Record length in words
    #[must_use]
    pub fn length(&self) -> Word {
        self.words[LENGTH_INDEX]
    }

    /// First word of the record
    #[must_use]
    pub fn leading_tag(&self) -> Word {
        self.words[0]
    }

    /// Burst identifier
    #[must_use]
    pub fn burst_id(&self) -> Word {
        self.words[BURST_ID_INDEX]
    }

    /// Trigger word
    #[must_use]
    pub fn trigger_word(&self) -> Word {
        self.words[TRIGGER_WORD_INDEX]
    }

    /// Low byte of the trigger word
    #[must_use]
    pub fn trigger_key(&self) -> Word {
        self.trigger_word() % 256
    }

    /// Last word of the record
    #[must_use]
    pub fn trailing_tag(&self) -> Word {
        self.words[self.words.len() - 1]
    }

    /// Whether this record marks the end of a burst
    #[must_use]
    pub fn is_end_of_burst(&self) -> bool {
        self.trigger_key() == END_OF_BURST_KEY
    }
}

/// Multi-line summary used in the per-file progress report
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Event length: {}", self.length())?;
        writeln!(f, "         Top: {:#010x}", self.leading_tag())?;
        writeln!(f, "       Burst: {}", self.burst_id())?;
        writeln!(f, "Trigger word: {:#010x}", self.trigger_word())?;
        write!(f, "        Tail: {:#010x}", self.trailing_tag())
    }
}
