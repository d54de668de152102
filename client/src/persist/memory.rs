//! In-memory session vault shared between handles.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each handle models one browser context over the same origin storage:
//! handles share the record, and a write in one handle is delivered to
//! subscribers of every other handle. Used by tests to drive cross-context
//! scenarios with synthetic notifications, and by embedders that keep the
//! session in process memory only.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use super::{EVENT_BUFFER, SessionVault, VaultError, VaultEvent, next_handle_id};

struct Shared {
    record: Mutex<Option<String>>,
    events: broadcast::Sender<VaultEvent>,
}

/// Volatile vault handle. Clone-like siblings are created with
/// [`MemoryVault::handle`].
pub struct MemoryVault {
    shared: Arc<Shared>,
    handle: u64,
}

impl MemoryVault {
    /// Create an empty vault with one initial handle.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            shared: Arc::new(Shared {
                record: Mutex::new(None),
                events,
            }),
            handle: next_handle_id(),
        }
    }

    /// Create another handle over the same storage, as another browser
    /// context sharing the origin would.
    #[must_use]
    pub fn handle(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            handle: next_handle_id(),
        }
    }
}

impl Default for MemoryVault {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionVault for MemoryVault {
    fn load(&self) -> Option<String> {
        self.shared
            .record
            .lock()
            .map_or(None, |record| record.clone())
    }

    fn save(&self, value: &str) -> Result<(), VaultError> {
        if let Ok(mut record) = self.shared.record.lock() {
            *record = Some(value.to_owned());
        }
        let _ = self.shared.events.send(VaultEvent {
            writer: self.handle,
            value: Some(value.to_owned()),
        });
        Ok(())
    }

    fn clear(&self) -> Result<(), VaultError> {
        if let Ok(mut record) = self.shared.record.lock() {
            *record = None;
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
