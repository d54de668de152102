//! File-backed session vault for native processes.
//!
//! Stores the serialized user record at a single path so a CLI session
//! survives process restarts. Change notifications reach sibling handles
//! created with [`FileVault::handle`] within the same process; writes by
//! other processes are picked up on the next [`SessionVault::load`], not
//! pushed.

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::broadcast;

use super::{EVENT_BUFFER, SessionVault, VaultError, VaultEvent, next_handle_id};

struct Shared {
    path: PathBuf,
    events: broadcast::Sender<VaultEvent>,
}

/// Durable vault handle rooted at one file path.
pub struct FileVault {
    shared: Arc<Shared>,
    handle: u64,
}

impl FileVault {
    /// Create a vault over `path`. The file is created lazily on the
    /// first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            shared: Arc::new(Shared {
                path: path.into(),
                events,
            }),
            handle: next_handle_id(),
        }
    }

    /// Create another handle over the same path and event stream.
    #[must_use]
    pub fn handle(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            handle: next_handle_id(),
        }
    }

    /// Path the record is stored at.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.shared.path
    }
}

impl SessionVault for FileVault {
    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.shared.path) {
            Ok(raw) => Some(raw),
            Err(error) if error.kind() == ErrorKind::NotFound => None,
            Err(error) => {
                tracing::warn!(path = %self.shared.path.display(), %error, "unreadable session record");
                None
            }
        }
    }

    fn save(&self, value: &str) -> Result<(), VaultError> {
        if let Some(parent) = self.shared.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.shared.path, value)?;
        let _ = self.shared.events.send(VaultEvent {
            writer: self.handle,
            value: Some(value.to_owned()),
        });
        Ok(())
    }

    fn clear(&self) -> Result<(), VaultError> {
        match fs::remove_file(&self.shared.path) {
            Ok(()) => {}
            Err(error) if error.kind() == ErrorKind::NotFound => {}
            Err(error) => return Err(error.into()),
        }
        let _ = self.shared.events.send(VaultEvent {
            writer: self.handle,
            value: None,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<VaultEvent> {
        self.shared.events.subscribe()
    }

    fn handle_id(&self) -> u64 {
        self.handle
    }
}
