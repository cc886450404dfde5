//! Adapter for hosts that report failures through a last-error slot.

use async_trait::async_trait;

use crate::logging::trace;

use super::{KeySelector, PlatformError, Record, StorageArea};

/// A storage area whose calls never fail directly.
///
/// Instead the host records the outcome of the most recent call in a shared
/// slot, read back with [`last_error`](SlotArea::last_error) once the call
/// has settled.
#[async_trait]
pub trait SlotArea: Send + Sync {
    async fn get(&self, keys: &KeySelector) -> Record;

    async fn set(&self, items: Record);

    /// The error recorded for the most recent call, if any.
    fn last_error(&self) -> Option<PlatformError>;
}

/// Returns the error the host recorded for the call that just settled.
pub fn check_for_error<A: SlotArea + ?Sized>(area: &A) -> Option<PlatformError> {
    area.last_error()
}

/// Turns a [`SlotArea`] into a [`StorageArea`].
///
/// The slot is inspected immediately after each call resolves. A concurrent
/// call on the same host can still overwrite it in between; hosts that can
/// return errors directly should implement [`StorageArea`] instead.
#[derive(Debug, Clone, Default)]
pub struct CheckedArea<A> {
    inner: A,
}

impl<A: SlotArea> CheckedArea<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }
}

#[async_trait]
impl<A: SlotArea> StorageArea for CheckedArea<A> {
    async fn get(&self, keys: &KeySelector) -> Result<Record, PlatformError> {
        let result = self.inner.get(keys).await;
        match check_for_error(&self.inner) {
            Some(err) => {
                trace!(keys = %keys, error = %err, "slot reported read failure");
                Err(err)
            }
            None => Ok(result),
        }
    }

    async fn set(&self, items: Record) -> Result<(), PlatformError> {
        self.inner.set(items).await;
        match check_for_error(&self.inner) {
            Some(err) => {
                trace!(error = %err, "slot reported write failure");
                Err(err)
            }
            None => Ok(()),
        }
    }
}
