//! Persistent storage area backed by fjall.

use std::path::Path;

use async_trait::async_trait;
use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};
use serde_json::Value;

use crate::logging::{debug, error, info, trace};

use super::error::AreaError;
use super::{KeySelector, PlatformError, PlatformErrorKind, Record, StorageArea};

const META_KEYSPACE: &str = "_meta";
const META_CONFIG_KEY: &str = "config";

/// Keyspace holding the stored entries.
const ENTRIES_KEYSPACE: &str = "local";

/// Length of the CRC32 prefix on every stored entry.
const CHECKSUM_LEN: usize = 4;

/// On-disk layout version.
///
/// Bump when changing the entry framing or keyspace names; directories
/// written with another version are refused.
const STORE_VERSION: u32 = 1;

/// A storage area persisted on the local filesystem.
///
/// Every entry is stored as its JSON encoding prefixed with a little-endian
/// CRC32 of those bytes. Writes are durably persisted before `set` returns.
///
/// ```ignore
/// use ext_store::{FjallArea, LocalStore};
///
/// let area = FjallArea::init(".ext-store")?;
/// let store = LocalStore::new(area);
/// store.set(ext_store::record!({"data": {"a": 1}})).await?;
/// ```
pub struct FjallArea {
    db: fjall::Database,
    entries: Keyspace,
}

impl FjallArea {
    /// Open an area previously created with [`init`](Self::init).
    ///
    /// A missing or empty directory is rejected without being touched. Any
    /// other directory is opened as a fjall database before the version
    /// marker is checked, so fjall may create its files in a non-empty
    /// directory that turns out not to be a storage area.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AreaError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening storage area");

        if !path.exists() || is_empty_dir(path)? {
            error!(path = %path.display(), "storage area path is missing or empty");
            return Err(AreaError::NotInitialized(path.display().to_string()));
        }

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;

        let Some(config) = meta.get(META_CONFIG_KEY)? else {
            error!(path = %path.display(), "storage area not initialized - no config found");
            return Err(AreaError::NotInitialized(path.display().to_string()));
        };
        let version = u32::from_le_bytes(
            config
                .as_ref()
                .try_into()
                .map_err(|_| AreaError::InvalidFormat("Invalid config format".to_string()))?,
        );
        if version != STORE_VERSION {
            error!(
                stored_version = version,
                expected_version = STORE_VERSION,
                "storage area version mismatch"
            );
            return Err(AreaError::InvalidFormat(format!(
                "Store version mismatch: expected {}, got {}",
                STORE_VERSION, version
            )));
        }

        let entries = db.keyspace(ENTRIES_KEYSPACE, KeyspaceCreateOptions::default)?;
        info!(path = %path.display(), "storage area opened");
        Ok(Self { db, entries })
    }

    /// Create an area at `path`, or reuse one already there.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, AreaError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "initializing storage area");

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;
        meta.insert(META_CONFIG_KEY, STORE_VERSION.to_le_bytes())?;
        let entries = db.keyspace(ENTRIES_KEYSPACE, KeyspaceCreateOptions::default)?;
        db.persist(PersistMode::SyncAll)?;

        info!(path = %path.display(), version = STORE_VERSION, "storage area initialized");
        Ok(Self { db, entries })
    }

    fn load(&self, key: &str) -> Result<Option<Value>, PlatformError> {
        let Some(bytes) = self.entries.get(key).map_err(backend)? else {
            return Ok(None);
        };
        decode_entry(key, bytes.as_ref()).map(Some)
    }

    fn stored_keys(&self) -> Result<Vec<String>, PlatformError> {
        self.entries
            .iter()
            .map(|kv| {
                let key = kv.key().map_err(backend)?;
                Ok(String::from_utf8_lossy(&key).into_owned())
            })
            .collect()
    }
}

#[async_trait]
impl StorageArea for FjallArea {
    async fn get(&self, keys: &KeySelector) -> Result<Record, PlatformError> {
        let names = match keys.keys() {
            Some(names) => names.into_iter().map(str::to_string).collect(),
            None => self.stored_keys()?,
        };

        let mut result = Record::new();
        for name in names {
            if let Some(value) = self.load(&name)? {
                result.insert(name, value);
            }
        }
        trace!(keys = %keys, found = result.len(), "read entries");
        Ok(result)
    }

    async fn set(&self, items: Record) -> Result<(), PlatformError> {
        // Encode everything before touching the keyspace; the batch commits
        // all entries or none.
        let framed = items
            .iter()
            .map(|(key, value)| Ok((key.as_str(), encode_entry(value)?)))
            .collect::<Result<Vec<_>, PlatformError>>()?;

        let mut batch = self.db.batch();
        for (key, bytes) in &framed {
            batch.insert(&self.entries, *key, bytes.as_slice());
        }
        batch.commit().map_err(backend)?;
        self.db.persist(PersistMode::SyncAll).map_err(backend)?;
        trace!(count = items.len(), "wrote entries");
        Ok(())
    }
}

fn is_empty_dir(path: &Path) -> Result<bool, AreaError> {
    if !path.is_dir() {
        return Ok(false);
    }
    Ok(std::fs::read_dir(path)?.next().is_none())
}

fn backend(e: fjall::Error) -> PlatformError {
    PlatformError::backend(e.to_string())
}

fn encode_entry(value: &Value) -> Result<Vec<u8>, PlatformError> {
    let json = serde_json::to_vec(value).map_err(|e| PlatformError::backend(e.to_string()))?;
    let mut framed = Vec::with_capacity(CHECKSUM_LEN + json.len());
    framed.extend_from_slice(&crc32fast::hash(&json).to_le_bytes());
    framed.extend_from_slice(&json);
    Ok(framed)
}

fn decode_entry(key: &str, bytes: &[u8]) -> Result<Value, PlatformError> {
    let corrupted = |reason: &str| {
        PlatformError::new(
            PlatformErrorKind::Corrupted,
            format!("entry '{}' is corrupted: {}", key, reason),
        )
    };

    let Some((checksum, json)) = bytes.split_first_chunk::<CHECKSUM_LEN>() else {
        return Err(corrupted("too short"));
    };
    if u32::from_le_bytes(*checksum) != crc32fast::hash(json) {
        return Err(corrupted("checksum mismatch"));
    }
    serde_json::from_slice(json).map_err(|e| corrupted(&e.to_string()))
}
