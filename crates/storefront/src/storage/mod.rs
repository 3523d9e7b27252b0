//! Local key-value storage.
//!
//! The widget persists the cart to a local key-value area and uses a key
//! change in that area as a cross-context broadcast. This module expresses
//! that storage area as the [`LocalStorage`] trait with two backends:
//!
//! - [`MemoryStorage`] - in-process area, used by tests and embedding
//! - [`FileStorage`] - one JSON file per key under a data directory
//!
//! # Change notifications
//!
//! Every handle on a storage area has its own [`Origin`]. Writes publish a
//! [`StorageEvent`] to all subscribers of the area, and [`StorageEvents`]
//! skips the events produced by its own handle, so a context only hears about
//! changes made elsewhere.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::broadcast;

/// Capacity of the per-area change notification channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Errors from storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be used by this backend.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Identifies the handle that produced a storage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin(u64);

impl Origin {
    /// Changes made by another process, observed by polling.
    pub const EXTERNAL: Self = Self(0);

    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A change to one key of a storage area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// New value, or `None` when the key was removed.
    pub new_value: Option<String>,
    pub origin: Origin,
}

/// Stream of storage changes made by other handles.
#[derive(Debug)]
pub struct StorageEvents {
    receiver: broadcast::Receiver<StorageEvent>,
    own: Origin,
}

impl StorageEvents {
    fn new(receiver: broadcast::Receiver<StorageEvent>, own: Origin) -> Self {
        Self { receiver, own }
    }

    /// Wait for the next change made by another handle.
    ///
    /// Returns `None` once the storage area has been dropped.
    pub async fn recv(&mut self) -> Option<StorageEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.origin == self.own => {}
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "storage listener lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// A local key-value storage area.
///
/// All methods are synchronous: callers persist immediately after an
/// in-memory mutation, within the same gesture handler.
pub trait LocalStorage: Send + Sync + std::fmt::Debug {
    /// Read a value. Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace a value and notify other handles.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Succeeds if the key did not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Subscribe to changes made through other handles on this area.
    fn subscribe(&self) -> StorageEvents;
}
