//! File-backed storage area.
//!
//! Each key is stored as its own file under the data directory. Writes go to
//! a uniquely named temporary file that is renamed over the target, so readers
//! never see a half-written value and concurrent writers (other processes on
//! the same directory) never share a temporary file.

use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::{EVENT_CHANNEL_CAPACITY, LocalStorage, Origin, StorageError, StorageEvent, StorageEvents};

/// A storage area persisted as files in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    area: Arc<Area>,
    origin: Origin,
}

#[derive(Debug)]
struct Area {
    dir: PathBuf,
    events: broadcast::Sender<StorageEvent>,
    /// Last value this process wrote or observed, per watched key.
    known: Mutex<HashMap<String, Option<String>>>,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            area: Arc::new(Area {
                dir,
                events,
                known: Mutex::new(HashMap::new()),
            }),
            origin: Origin::next(),
        })
    }

    /// Another handle on the same directory with its own origin.
    #[must_use]
    pub fn handle(&self) -> Self {
        Self {
            area: Arc::clone(&self.area),
            origin: Origin::next(),
        }
    }

    /// Directory holding the stored keys.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.area.dir
    }

    /// Poll `key` for changes written by other processes.
    ///
    /// Every `interval` the key's file is read; when its content differs from
    /// the last value this process wrote or saw, an event with
    /// [`Origin::EXTERNAL`] is published to all subscribers of the area.
    /// Must be called from within a tokio runtime.
    pub fn watch(&self, key: &str, interval: Duration) -> JoinHandle<()> {
        let storage = self.clone();
        let key = key.to_string();

        tokio::spawn(async move {
            let Ok(path) = storage.path_for(&key) else {
                tracing::error!(key = %key, "refusing to watch invalid storage key");
                return;
            };

            // Seed with the current value so startup does not look like a change.
            storage.poll_change(&key, &path);

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Some(current) = storage.poll_change(&key, &path) {
                    tracing::debug!(key = %key, "external storage change detected");
                    let _ = storage.area.events.send(StorageEvent {
                        key: key.clone(),
                        new_value: current,
                        origin: Origin::EXTERNAL,
                    });
                }
            }
        })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.area.dir.join(key))
    }

    /// Read a watched key and record it.
    ///
    /// Returns the new value if it differs from the last one recorded. The
    /// read happens under the same lock `set_item` holds while replacing the
    /// file, so this process's own writes never show up as changes.
    fn poll_change(&self, key: &str, path: &Path) -> Option<Option<String>> {
        let mut known = self.area.known.lock().unwrap_or_else(PoisonError::into_inner);
        let current = read_value(path);
        match known.insert(key.to_string(), current.clone()) {
            Some(previous) if previous != current => Some(current),
            _ => None,
        }
    }

    fn publish(&self, key: &str, new_value: Option<String>) {
        let _ = self.area.events.send(StorageEvent {
            key: key.to_string(),
            new_value,
            origin: self.origin,
        });
    }
}

fn read_value(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(value) => Some(value),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read watched key");
            None
        }
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        {
            let mut known = self.area.known.lock().unwrap_or_else(PoisonError::into_inner);
            let mut tmp = NamedTempFile::new_in(&self.area.dir)?;
            tmp.write_all(value.as_bytes())?;
            tmp.persist(&path).map_err(|e| e.error)?;
            known.insert(key.to_string(), Some(value.to_string()));
        }
        self.publish(key, Some(value.to_string()));
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        {
            let mut known = self.area.known.lock().unwrap_or_else(PoisonError::into_inner);
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
                Err(e) => return Err(e.into()),
            }
            known.insert(key.to_string(), None);
        }
        self.publish(key, None);
        Ok(())
    }

    fn subscribe(&self) -> StorageEvents {
        StorageEvents::new(self.area.events.subscribe(), self.origin)
    }
}
