use std::fs::{File, OpenOptions};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::time::{interval, Duration};
use tracing::{error, warn};

use crate::frame::{self, Frame};

const FLUSH_INTERVAL: Duration = Duration::from_secs(1);

/// Append-only file holding the wire encoding of every accepted mutating
/// command, in arrival order. Replaying it from the start reconstructs the
/// store state.
///
/// Appends go straight to the file (i.e. the OS page cache); a background
/// task forces them to stable storage once per second. Both paths take the
/// same mutex, so a flush never observes a partially written record.
#[derive(Clone)]
pub struct Aof {
    inner: Arc<Mutex<AofInner>>,
}

struct AofInner {
    file: File,
    path: PathBuf,
}

impl Aof {
    /// Opens the log in create-or-append mode and starts the periodic flush
    /// task. Must be called from within a tokio runtime.
    pub fn open(path: impl AsRef<Path>) -> crate::Result<Aof> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let inner = Arc::new(Mutex::new(AofInner { file, path }));

        tokio::spawn({
            let inner = inner.clone();
            async move {
                let mut interval = interval(FLUSH_INTERVAL);
                loop {
                    interval.tick().await;
                    let result = {
                        let inner = inner.lock().unwrap();
                        inner.file.sync_data()
                    };
                    if let Err(err) = result {
                        error!("failed to flush append-only file: {}", err);
                    }
                }
            }
        });

        Ok(Self { inner })
    }

    /// Appends the exact wire encoding of a request. The caller's mutation
    /// must not be applied if this fails.
    pub fn append(&self, encoded_request: &[u8]) -> crate::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.file.write_all(encoded_request)?;
        Ok(())
    }

    /// Decodes the whole log as back-to-back frames, invoking the callback
    /// for each one. Uses the same parser as live traffic.
    ///
    /// A truncated trailing record (partial write before a crash) is
    /// tolerated: replay stops there with a warning and the state replayed so
    /// far is kept. Any other decode error means the log is corrupt and is
    /// returned to the caller, which aborts startup.
    pub fn replay(&self, mut callback: impl FnMut(Frame)) -> crate::Result<()> {
        let inner = self.inner.lock().unwrap();
        let data = std::fs::read(&inner.path)?;
        let mut cursor = Cursor::new(&data[..]);

        while (cursor.position() as usize) < data.len() {
            match Frame::parse(&mut cursor) {
                Ok(frame) => callback(frame),
                Err(frame::Error::Incomplete) => {
                    warn!(
                        "append-only file ends with a truncated record at byte {}; \
                         ignoring the partial write",
                        cursor.position()
                    );
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}
