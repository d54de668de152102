//! Persisted session record and cross-context change notifications.
//!
//! ARCHITECTURE
//! ============
//! A vault holds exactly one record: the JSON-serialized user of the
//! current session. Absence of the record means logged out. Every write
//! fans out a [`VaultEvent`] to subscribed handles; events are tagged with
//! the writing handle so a context can ignore its own writes and only
//! react to externally-originated changes, mirroring how browser storage
//! events fire in every tab except the writer.
//!
//! TRADE-OFFS
//! ==========
//! Reads are lock-free from the subscriber's point of view and eventually
//! consistent. A lagging subscriber re-reads the vault instead of
//! replaying missed events, so the latest record always wins.

pub mod file;
pub mod memory;

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

pub use file::FileVault;
pub use memory::MemoryVault;

/// Buffered events per subscriber before the stream reports lag.
pub(crate) const EVENT_BUFFER: usize = 16;

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Allocate a process-unique handle id for a new vault handle.
pub(crate) fn next_handle_id() -> u64 {
    NEXT_HANDLE.fetch_add(1, Ordering::Relaxed)
}

/// Change notification delivered to every subscribed handle of a vault.
#[derive(Clone, Debug)]
pub struct VaultEvent {
    /// Handle that performed the write.
    pub writer: u64,
    /// Raw record after the change; `None` means the record was cleared.
    pub value: Option<String>,
}

/// Error writing the persisted session record.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("failed to write session record: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable store for the single session record, plus change notifications.
///
/// Writes flow store-to-vault during a session's lifetime; the vault only
/// feeds state back at startup and through [`SessionVault::subscribe`]
/// events originated by other handles.
pub trait SessionVault: Send + Sync {
    /// Read the current record. Unreadable state degrades to `None`.
    fn load(&self) -> Option<String>;

    /// Replace the record and notify other handles.
    ///
    /// # Errors
    ///
    /// Fails when the backing store cannot be written.
    fn save(&self, value: &str) -> Result<(), VaultError>;

    /// Remove the record and notify other handles.
    ///
    /// # Errors
    ///
    /// Fails when the backing store cannot be written.
    fn clear(&self) -> Result<(), VaultError>;

    /// Subscribe to change notifications for this vault.
    ///
    /// Subscribers receive events for every write, the caller's own
    /// included; filter with [`SessionVault::handle_id`].
    fn subscribe(&self) -> broadcast::Receiver<VaultEvent>;

    /// Identity of this handle, used to recognize self-originated events.
    fn handle_id(&self) -> u64;
}
