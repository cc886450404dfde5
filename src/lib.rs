//! An async accessor over an extension's local key-value storage area.
//!
//! ext-store wraps a host-provided storage area (anything implementing
//! [`StorageArea`]) behind [`LocalStore`], which reads and writes JSON
//! records, turns host failures into [`StoreError::Platform`] and reports
//! an empty read as `None`.
//!
//! # Module Organization
//!
//! - [`area`]: The host storage capability and its implementations
//! - [`store`]: The [`LocalStore`] accessor
//! - [`error`]: Unified error types
//! - [`config`]: TOML configuration for the CLI and embedders
//! - [`prelude`]: Convenient re-exports
//! - `logging`: Conditional logging macros (internal)
//!
//! # Features
//!
//! - `kv` (default): Persistent storage area backed by fjall
//! - `logging`: Enable tracing-based logging
//! - `cli`: Enable the `ext-store` binary
//! - `full`: Enable all features
//!
//! # Example
//!
//! ```ignore
//! use ext_store::prelude::*;
//!
//! let store = LocalStore::new(MemoryArea::new());
//!
//! store.set(record!({"data": {"a": 1}})).await?;
//! let state = store.get_default().await?; // Some({"data": {"a": 1}})
//! ```

#[macro_use]
pub(crate) mod logging;

pub mod area;
pub mod config;
pub mod error;
pub mod prelude;
pub mod store;

// Re-export unified error types
pub use error::{Error, Result, StoreError};

// Re-export the storage capability
pub use area::{
    CheckedArea, KeySelector, MemoryArea, NoStorage, PlatformError, PlatformErrorKind, Record,
    SlotArea, StorageArea, StorageHost, check_for_error, DEFAULT_KEYS,
};

// Re-export the persistent area (when feature enabled)
#[cfg(feature = "kv")]
pub use area::{AreaError, FjallArea};

pub use store::LocalStore;

#[doc(hidden)]
pub use serde_json as __json;

/// Build a [`Record`] from a JSON object literal.
///
/// Anything that is not an object literal produces an empty record.
///
/// ```ignore
/// let state = ext_store::record!({"data": {"a": 1}, "meta": {"version": 2}});
/// ```
#[macro_export]
macro_rules! record {
    ($($json:tt)+) => {
        match $crate::__json::json!($($json)+) {
            $crate::__json::Value::Object(map) => map,
            _ => $crate::__json::Map::new(),
        }
    };
}
