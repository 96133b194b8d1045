//! Writer for extracted record pairs

use std::io::Write;
use std::path::Path;

use bytes::BytesMut;
use tempfile::NamedTempFile;

use super::format::Record;
use super::{encode_words, WORD_SIZE};
use crate::Result;

/// Write `first` then `last`, word for word, with no framing
///
/// Both records are encoded up front and handed to the sink in one
/// `write_all`. That does not make the write all-or-nothing: a sink that
/// fails partway keeps whatever it accepted before the error. Use
/// [`write_selected_to_path`] when a failed write must leave no output.
///
/// # Errors
///
/// Returns error if the sink rejects the write; the sink may then hold a
/// prefix of the pair
pub fn write_selected<W: Write>(sink: &mut W, first: &Record, last: &Record) -> Result<()> {
    let mut buf = BytesMut::with_capacity((first.words().len() + last.words().len()) * WORD_SIZE);
    encode_words(&mut buf, first.words());
    encode_words(&mut buf, last.words());

    sink.write_all(&buf)?;
    sink.flush()?;
    Ok(())
}

/// Write the record pair to `path`, replacing it atomically
///
/// Data goes to a temporary file next to `path` that is renamed into place
/// only after it has been fully written and synced. On any failure the
/// temporary file is removed and `path` is left untouched.
///
/// # Errors
///
/// Returns error if the temporary file cannot be created, written, synced
/// or renamed
pub fn write_selected_to_path(path: &Path, first: &Record, last: &Record) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    write_selected(&mut staged, first, last)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;

    Ok(())
}
