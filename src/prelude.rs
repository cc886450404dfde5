//! Convenient re-exports for common usage patterns.
//!
//! ```ignore
//! use ext_store::prelude::*;
//!
//! let store = LocalStore::detect(&host);
//! if let Some(state) = store.get_default().await? {
//!     // ...
//! }
//! ```

// Unified error handling
pub use crate::error::{Error, Result, StoreError};

// Accessor
pub use crate::store::LocalStore;

// Storage capability
pub use crate::area::{
    CheckedArea, KeySelector, MemoryArea, NoStorage, PlatformError, PlatformErrorKind, Record,
    SlotArea, StorageArea, StorageHost, DEFAULT_KEYS,
};

// Persistent area (requires "kv" feature)
#[cfg(feature = "kv")]
pub use crate::area::{AreaError, FjallArea};

pub use crate::record;
