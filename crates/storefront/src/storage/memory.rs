//! In-process storage area.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;

use super::{EVENT_CHANNEL_CAPACITY, LocalStorage, Origin, StorageError, StorageEvent, StorageEvents};

/// A storage area held in memory.
///
/// Cloning shares the same handle (same origin). Use [`MemoryStorage::handle`]
/// to get a handle that behaves like another browsing context: it sees the
/// same data and receives events for writes made through this one.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    area: Arc<Area>,
    origin: Origin,
}

#[derive(Debug)]
struct Area {
    items: RwLock<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

impl MemoryStorage {
    /// Create an empty storage area.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            area: Arc::new(Area {
                items: RwLock::new(HashMap::new()),
                events,
            }),
            origin: Origin::next(),
        }
    }

    /// Another handle on the same area with its own origin.
    #[must_use]
    pub fn handle(&self) -> Self {
        Self {
            area: Arc::clone(&self.area),
            origin: Origin::next(),
        }
    }

    fn publish(&self, key: &str, new_value: Option<String>) {
        // No subscribers is fine.
        let _ = self.area.events.send(StorageEvent {
            key: key.to_string(),
            new_value,
            origin: self.origin,
        });
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self
            .area
            .items
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.area
            .items
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        self.publish(key, Some(value.to_string()));
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let removed = self
            .area
            .items
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
        if removed.is_some() {
            self.publish(key, None);
        }
        Ok(())
    }

    fn subscribe(&self) -> StorageEvents {
        StorageEvents::new(self.area.events.subscribe(), self.origin)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "v1").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v1"));

        storage.set_item("k", "v2").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v2"));

        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);

        // Removing a missing key is not an error
        storage.remove_item("k").unwrap();
    }

    #[test]
    fn test_handles_share_data() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.handle();
        tab_a.set_item("shared", "1").unwrap();
        assert_eq!(tab_b.get_item("shared").unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_other_handle_receives_event() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.handle();
        let mut events = tab_b.subscribe();

        tab_a.set_item("signal", "x").unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.key, "signal");
        assert_eq!(event.new_value.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_own_writes_are_not_delivered() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.handle();
        let mut events = tab_a.subscribe();

        tab_a.set_item("mine", "1").unwrap();
        tab_b.set_item("theirs", "2").unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.key, "theirs");
    }
}
