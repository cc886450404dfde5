//! Common test utilities and fixtures.
//!
//! Test doubles for the host storage capability: an area that counts the
//! calls it receives and can be told to fail the next ones.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ext_store::{KeySelector, MemoryArea, PlatformError, Record, StorageArea, StorageHost};
use parking_lot::Mutex;

// =============================================================================
// Scripted Area
// =============================================================================

/// A [`MemoryArea`] wrapper that counts calls and can inject failures.
#[derive(Clone, Default)]
pub struct ScriptedArea {
    pub memory: MemoryArea,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    failure: Arc<Mutex<Option<PlatformError>>>,
}

impl ScriptedArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Record) -> Self {
        Self {
            memory: MemoryArea::with_entries(entries),
            ..Self::default()
        }
    }

    /// Fail every following call with `err` until [`recover`](Self::recover).
    pub fn fail_with(&self, err: PlatformError) {
        *self.failure.lock() = Some(err);
    }

    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn injected(&self) -> Option<PlatformError> {
        self.failure.lock().clone()
    }
}

#[async_trait]
impl StorageArea for ScriptedArea {
    async fn get(&self, keys: &KeySelector) -> Result<Record, PlatformError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.injected() {
            return Err(err);
        }
        self.memory.get(keys).await
    }

    async fn set(&self, items: Record) -> Result<(), PlatformError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.injected() {
            return Err(err);
        }
        self.memory.set(items).await
    }
}

/// A host exposing a [`ScriptedArea`].
pub struct ScriptedHost(pub ScriptedArea);

impl StorageHost for ScriptedHost {
    fn local_area(&self) -> Option<Arc<dyn StorageArea>> {
        Some(Arc::new(self.0.clone()))
    }
}
