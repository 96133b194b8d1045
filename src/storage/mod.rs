//! Binary event-log storage: word codec, records, and the readers and writers
//! built on them
//!
//! Files are flat sequences of 32-bit words stored little-endian, whatever
//! the host byte order.

mod format;
mod reader;
mod scanner;
mod writer;

pub use format::Record;
pub use reader::{read_record, RecordReader};
pub use scanner::{find_last_record_offset, ScanOutcome};
pub use writer::{write_selected, write_selected_to_path};

use bytes::{Buf, BufMut};

/// Atomic unit of the event-log format
pub type Word = u32;

/// Size of one word on disk
pub const WORD_SIZE: usize = 4;

/// Smallest legal record: fields up to the trigger word must exist
pub const MIN_RECORD_WORDS: u32 = 5;

/// Added to the last record's trailing tag to get its leading tag
pub const LEADING_TAG_BASE: Word = 0x6200_0000;

/// Trigger key marking an End-Of-Burst record
pub const END_OF_BURST_KEY: Word = 0x23;

static_assertions::const_assert_eq!(std::mem::size_of::<Word>(), WORD_SIZE);

/// Decode one word from the first four bytes of `bytes`
///
/// # Panics
///
/// Panics if `bytes` is shorter than [`WORD_SIZE`]
#[must_use]
pub fn decode_word(mut bytes: &[u8]) -> Word {
    bytes.get_u32_le()
}

/// Decode little-endian words from `bytes`
///
/// Trailing bytes that do not fill a whole word are ignored.
#[must_use]
pub fn decode_words(mut bytes: &[u8]) -> Vec<Word> {
    let mut words = Vec::with_capacity(bytes.len() / WORD_SIZE);
    while bytes.remaining() >= WORD_SIZE {
        words.push(bytes.get_u32_le());
    }
    words
}

/// Append `words` to `buf` in the on-disk encoding
pub fn encode_words<B: BufMut>(buf: &mut B, words: &[Word]) {
    for &word in words {
        buf.put_u32_le(word);
    }
}

/// Leading tag the last record must carry, given the file's final word
#[must_use]
pub fn leading_tag_for(final_word: Word) -> Word {
    final_word.wrapping_add(LEADING_TAG_BASE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_is_little_endian() {
        let bytes = [0x23, 0x01, 0x00, 0x00, 0x78, 0x56, 0x34, 0x12];
        assert_eq!(decode_words(&bytes), vec![0x0000_0123, 0x1234_5678]);
    }

    #[test]
    fn test_decode_ignores_partial_word() {
        let bytes = [0x01, 0x00, 0x00, 0x00, 0xFF, 0xFF];
        assert_eq!(decode_words(&bytes), vec![1]);
    }

    #[test]
    fn test_encode_matches_decode() {
        let mut buf = Vec::new();
        encode_words(&mut buf, &[0xDEAD_BEEF, 7]);
        assert_eq!(buf, [0xEF, 0xBE, 0xAD, 0xDE, 0x07, 0x00, 0x00, 0x00]);
        assert_eq!(decode_words(&buf), vec![0xDEAD_BEEF, 7]);
    }

    #[test]
    fn test_leading_tag_wraps() {
        assert_eq!(leading_tag_for(0x0000_0042), 0x6200_0042);
        assert_eq!(leading_tag_for(0xA000_0001), 0x0200_0001);
    }
}
