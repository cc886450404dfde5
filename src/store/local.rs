//! LocalStore implementation.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::area::{KeySelector, Record, StorageArea, StorageHost};
use crate::error::{Result, StoreError};
use crate::logging::{debug, error, trace};

/// Async accessor over the host's local storage area.
///
/// Reads return `None` when nothing is stored under the requested keys, so
/// callers never have to tell an empty map apart from missing state. Host
/// failures come back as [`StoreError::Platform`] holding the host's own
/// error.
///
/// # Example
///
/// ```ignore
/// use ext_store::{LocalStore, MemoryArea, record};
///
/// let store = LocalStore::new(MemoryArea::new());
/// assert_eq!(store.get_default().await?, None);
///
/// store.set(record!({"data": {"a": 1}})).await?;
/// assert_eq!(store.get("data").await?, Some(record!({"data": {"a": 1}})));
/// ```
///
/// # Unsupported hosts
///
/// [`detect`](Self::detect) never fails. On a host without a local area it
/// logs one error and yields a store whose reads resolve to `None` and
/// whose writes fail with [`StoreError::Unsupported`]. Use
/// [`try_detect`](Self::try_detect) to fail at construction instead.
#[derive(Clone)]
pub struct LocalStore {
    area: Option<Arc<dyn StorageArea>>,
}

impl LocalStore {
    /// A store over an explicit storage area.
    pub fn new(area: impl StorageArea + 'static) -> Self {
        Self {
            area: Some(Arc::new(area)),
        }
    }

    /// Probe `host` for a local storage area.
    pub fn detect(host: &impl StorageHost) -> Self {
        let area = host.local_area();
        if area.is_none() {
            error!("storage local API not available");
        } else {
            debug!("storage local API detected");
        }
        Self { area }
    }

    /// Like [`detect`](Self::detect), but fails when the host has no area.
    pub fn try_detect(host: &impl StorageHost) -> Result<Self> {
        let area = host.local_area().ok_or(StoreError::Unsupported)?;
        Ok(Self { area: Some(area) })
    }

    /// Whether the host exposed a local storage area at construction.
    pub fn is_supported(&self) -> bool {
        self.area.is_some()
    }

    /// Read the selected keys.
    ///
    /// Resolves to `None` if the host has no area or none of the keys are
    /// stored; otherwise to the mapping exactly as the area returned it,
    /// which may hold only some of the requested keys.
    pub async fn get(&self, keys: impl Into<KeySelector>) -> Result<Option<Record>> {
        let keys = keys.into();
        let Some(area) = &self.area else {
            trace!(keys = %keys, "storage unsupported, read skipped");
            return Ok(None);
        };

        let result = Self::read(area.as_ref(), &keys).await?;
        if result.is_empty() {
            return Ok(None);
        }
        Ok(Some(result))
    }

    /// Read the `data` and `meta` keys.
    pub async fn get_default(&self) -> Result<Option<Record>> {
        self.get(KeySelector::default()).await
    }

    /// Merge `state` into the area.
    ///
    /// Keys not present in `state` are left untouched. Concurrent writes to
    /// the same key are not ordered by this store.
    pub async fn set(&self, state: Record) -> Result<()> {
        let Some(area) = &self.area else {
            return Err(StoreError::Unsupported);
        };
        Self::write(area.as_ref(), state).await
    }

    /// Read the selected keys and decode the record into `T`.
    pub async fn get_as<T: DeserializeOwned>(
        &self,
        keys: impl Into<KeySelector>,
    ) -> Result<Option<T>> {
        let Some(record) = self.get(keys).await? else {
            return Ok(None);
        };
        serde_json::from_value(Value::Object(record))
            .map(Some)
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Encode `state` as a record and merge it into the area.
    ///
    /// `state` must serialize to a JSON object; each field becomes a key.
    pub async fn set_from<T: Serialize + ?Sized>(&self, state: &T) -> Result<()> {
        let record = match serde_json::to_value(state) {
            Ok(Value::Object(record)) => record,
            Ok(other) => {
                return Err(StoreError::Encode(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )));
            }
            Err(e) => return Err(StoreError::Encode(e.to_string())),
        };
        self.set(record).await
    }

    async fn read(area: &dyn StorageArea, keys: &KeySelector) -> Result<Record> {
        debug!(keys = %keys, "reading from local area");
        let result = area.get(keys).await?;
        trace!(keys = %keys, found = result.len(), "read complete");
        Ok(result)
    }

    async fn write(area: &dyn StorageArea, state: Record) -> Result<()> {
        debug!(count = state.len(), "writing to local area");
        area.set(state).await?;
        Ok(())
    }
}

impl fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStore")
            .field("supported", &self.is_supported())
            .finish()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
