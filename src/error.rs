//! Unified error type for the ext-store library.
//!
//! Every fallible [`LocalStore`](crate::LocalStore) operation returns a
//! [`StoreError`]. Host failures are carried unchanged inside
//! [`StoreError::Platform`] so callers can match on exactly what the storage
//! area reported.

use thiserror::Error;

use crate::area::PlatformError;

/// Errors surfaced by [`LocalStore`](crate::LocalStore) operations.
///
/// # Example
///
/// ```ignore
/// use ext_store::{Result, LocalStore};
///
/// async fn save(store: &LocalStore) -> Result<()> {
///     store.set(ext_store::record!({"data": {"a": 1}})).await?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The storage area reported a failure for the most recent call.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The host does not expose a local storage area.
    #[error("storage local API not available")]
    Unsupported,

    /// A stored record could not be decoded into the requested type.
    #[error("failed to decode stored record: {0}")]
    Decode(String),

    /// A value could not be encoded as a record.
    #[error("failed to encode record: {0}")]
    Encode(String),
}

/// Short alias used across the public API.
pub type Error = StoreError;

/// A [`Result`] type alias using [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Returns `true` if the storage area reported this error.
    pub fn is_platform(&self) -> bool {
        matches!(self, Self::Platform(_))
    }

    /// Returns `true` if the host has no local storage area.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported)
    }

    /// The host's error, if this is one.
    pub fn platform(&self) -> Option<&PlatformError> {
        match self {
            Self::Platform(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::PlatformErrorKind;

    #[test]
    fn platform_error_is_transparent() {
        let inner = PlatformError::new(PlatformErrorKind::QuotaExceeded, "QUOTA_BYTES quota exceeded");
        let err = StoreError::from(inner.clone());

        assert!(err.is_platform());
        assert!(!err.is_unsupported());
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err.platform(), Some(&inner));
    }

    #[test]
    fn unsupported_has_no_platform_error() {
        let err = StoreError::Unsupported;
        assert!(err.is_unsupported());
        assert_eq!(err.platform(), None);
    }
}
