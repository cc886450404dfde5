//! The host's local storage capability.
//!
//! A [`StorageArea`] is the extension's private key-value area: an async
//! "get by key(s)" returning a JSON mapping and an async "set mapping" that
//! merges into what is already stored. Failures come back as
//! [`PlatformError`] values from the call itself.
//!
//! Hosts that only report failures through a shared last-error slot are
//! adapted with [`CheckedArea`].

mod checked;
#[cfg(feature = "kv")]
mod error;
#[cfg(feature = "kv")]
mod persistent;
mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use checked::{CheckedArea, SlotArea, check_for_error};
#[cfg(feature = "kv")]
pub use error::AreaError;
#[cfg(feature = "kv")]
pub use persistent::FjallArea;
pub use memory::MemoryArea;

/// A stored record: string keys mapped to arbitrary JSON values.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Keys read when the caller does not name any: the serialized application
/// state and its metadata.
pub const DEFAULT_KEYS: [&str; 2] = ["data", "meta"];

/// Which keys a read should return.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeySelector {
    /// A single key.
    One(String),
    /// An ordered list of keys.
    Many(Vec<String>),
    /// Every key in the area.
    All,
}

impl KeySelector {
    /// Returns `true` if `key` is selected.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::One(k) => k == key,
            Self::Many(keys) => keys.iter().any(|k| k == key),
            Self::All => true,
        }
    }

    /// The explicitly named keys, in order. `None` for [`KeySelector::All`].
    pub fn keys(&self) -> Option<Vec<&str>> {
        match self {
            Self::One(k) => Some(vec![k.as_str()]),
            Self::Many(keys) => Some(keys.iter().map(String::as_str).collect()),
            Self::All => None,
        }
    }
}

impl Default for KeySelector {
    fn default() -> Self {
        Self::from(DEFAULT_KEYS)
    }
}

impl fmt::Display for KeySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(k) => write!(f, "{}", k),
            Self::Many(keys) => write!(f, "[{}]", keys.join(", ")),
            Self::All => write!(f, "*"),
        }
    }
}

impl From<&str> for KeySelector {
    fn from(key: &str) -> Self {
        Self::One(key.to_string())
    }
}

impl From<String> for KeySelector {
    fn from(key: String) -> Self {
        Self::One(key)
    }
}

impl From<Vec<String>> for KeySelector {
    fn from(keys: Vec<String>) -> Self {
        Self::Many(keys)
    }
}

impl From<Vec<&str>> for KeySelector {
    fn from(keys: Vec<&str>) -> Self {
        Self::Many(keys.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for KeySelector {
    fn from(keys: &[&str]) -> Self {
        Self::Many(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for KeySelector {
    fn from(keys: [&str; N]) -> Self {
        Self::Many(keys.iter().map(|k| k.to_string()).collect())
    }
}

/// Broad category of a host storage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlatformErrorKind {
    /// The area ran out of space.
    QuotaExceeded,
    /// The calling context may not use the area.
    PermissionDenied,
    /// A stored entry could not be read back.
    Corrupted,
    /// Any other failure inside the storage backend.
    #[default]
    Backend,
}

/// A failure reported by the storage area for a single call.
///
/// [`LocalStore`](crate::LocalStore) hands this back to the caller as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct PlatformError {
    kind: PlatformErrorKind,
    message: String,
}

impl PlatformError {
    pub fn new(kind: PlatformErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A [`PlatformErrorKind::Backend`] error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::Backend, message)
    }

    pub fn kind(&self) -> PlatformErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Async key-value area provided by the host.
///
/// `get` always yields a mapping, possibly empty, holding whichever of the
/// selected keys are stored. `set` merges `items` into the area; keys not
/// in `items` stay as they are.
#[async_trait]
pub trait StorageArea: Send + Sync {
    async fn get(&self, keys: &KeySelector) -> Result<Record, PlatformError>;

    async fn set(&self, items: Record) -> Result<(), PlatformError>;
}

#[async_trait]
impl<A: StorageArea + ?Sized> StorageArea for Arc<A> {
    async fn get(&self, keys: &KeySelector) -> Result<Record, PlatformError> {
        (**self).get(keys).await
    }

    async fn set(&self, items: Record) -> Result<(), PlatformError> {
        (**self).set(items).await
    }
}

/// The environment a [`LocalStore`](crate::LocalStore) is constructed in.
///
/// Probed once; `None` means the host has no local storage area.
pub trait StorageHost {
    fn local_area(&self) -> Option<Arc<dyn StorageArea>>;
}

impl StorageHost for Arc<dyn StorageArea> {
    fn local_area(&self) -> Option<Arc<dyn StorageArea>> {
        Some(Arc::clone(self))
    }
}

impl StorageHost for Option<Arc<dyn StorageArea>> {
    fn local_area(&self) -> Option<Arc<dyn StorageArea>> {
        self.clone()
    }
}

/// A host without a local storage area.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStorage;

impl StorageHost for NoStorage {
    fn local_area(&self) -> Option<Arc<dyn StorageArea>> {
        None
    }
}
