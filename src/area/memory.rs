//! In-process storage area.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{KeySelector, PlatformError, Record, StorageArea};

/// A storage area kept in memory.
///
/// Clones share the same entries, so a test can keep a handle to inspect
/// what a [`LocalStore`](crate::LocalStore) wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryArea {
    entries: Arc<RwLock<Record>>,
}

impl MemoryArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// An area that already holds `entries`.
    pub fn with_entries(entries: Record) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// A copy of everything currently stored.
    pub fn snapshot(&self) -> Record {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[async_trait]
impl StorageArea for MemoryArea {
    async fn get(&self, keys: &KeySelector) -> Result<Record, PlatformError> {
        let entries = self.entries.read();
        let result = match keys.keys() {
            Some(names) => names
                .into_iter()
                .filter_map(|k| entries.get(k).map(|v| (k.to_string(), v.clone())))
                .collect(),
            None => entries.clone(),
        };
        Ok(result)
    }

    async fn set(&self, items: Record) -> Result<(), PlatformError> {
        // Last write wins per key.
        self.entries.write().extend(items);
        Ok(())
    }
}
