//! Opening inputs under a deadline

use std::fs::File;
use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::{EobError, Result};

/// Open `path` for reading, giving up after `deadline`
///
/// The open runs on its own detached thread, not on the runtime's blocking
/// pool. A plain `open(2)` cannot be interrupted, so on timeout the thread is
/// abandoned: it may keep waiting until the filesystem answers, and drops the
/// handle when it does. Nothing in the runtime waits for it, so a hung open
/// never keeps the process from shutting down. Callers only see the timeout.
///
/// # Errors
///
/// Returns `Timeout` if the deadline passes first, or `Io` if the open fails
pub async fn open_with_timeout(path: &Path, deadline: Duration) -> Result<File> {
    debug!(path = %path.display(), ?deadline, "opening input");

    let (tx, rx) = oneshot::channel();
    let target = path.to_path_buf();
    thread::Builder::new()
        .name("eob-open".to_string())
        .spawn(move || {
            // receiver is gone after a timeout
            let _ = tx.send(File::open(target));
        })?;

    match tokio::time::timeout(deadline, rx).await {
        Ok(Ok(opened)) => Ok(opened?),
        Ok(Err(_)) => Err(EobError::Io(io::Error::new(
            io::ErrorKind::Other,
            "open thread exited without a result",
        ))),
        Err(_) => {
            let millis = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
            warn!(path = %path.display(), millis, "open timed out");
            Err(EobError::Timeout { millis })
        }
    }
}
