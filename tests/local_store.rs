//! Integration tests for LocalStore against scripted storage areas.

mod common;

use std::sync::Arc;

use common::{ScriptedArea, ScriptedHost};
use ext_store::prelude::*;

// =============================================================================
// Capability Detection
// =============================================================================

#[tokio::test]
async fn test_unsupported_get_resolves_none() -> anyhow::Result<()> {
    let store = LocalStore::detect(&NoStorage);

    assert!(!store.is_supported());
    assert_eq!(store.get_default().await?, None);
    assert_eq!(store.get(["x"]).await?, None);
    assert_eq!(store.get(KeySelector::All).await?, None);

    Ok(())
}

#[tokio::test]
async fn test_unsupported_set_is_refused() -> anyhow::Result<()> {
    let store = LocalStore::detect(&NoStorage);

    let err = store.set(record!({"data": {"a": 1}})).await.unwrap_err();
    assert!(err.is_unsupported());

    Ok(())
}

#[tokio::test]
async fn test_detect_uses_host_area() -> anyhow::Result<()> {
    let area = ScriptedArea::with_entries(record!({"data": {"a": 1}}));
    let store = LocalStore::detect(&ScriptedHost(area.clone()));

    assert!(store.is_supported());
    assert_eq!(store.get("data").await?, Some(record!({"data": {"a": 1}})));
    assert_eq!(area.reads(), 1);

    Ok(())
}

#[tokio::test]
async fn test_detect_from_optional_arc() -> anyhow::Result<()> {
    let present: Option<Arc<dyn StorageArea>> = Some(Arc::new(MemoryArea::new()));
    let absent: Option<Arc<dyn StorageArea>> = None;

    assert!(LocalStore::detect(&present).is_supported());
    assert!(!LocalStore::detect(&absent).is_supported());
    assert!(LocalStore::try_detect(&absent).is_err());

    Ok(())
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_empty_storage_resolves_none() -> anyhow::Result<()> {
    let area = ScriptedArea::new();
    let store = LocalStore::new(area.clone());

    assert_eq!(store.get(["data", "meta"]).await?, None);
    assert_eq!(area.reads(), 1);

    Ok(())
}

#[tokio::test]
async fn test_partial_result_is_returned_as_is() -> anyhow::Result<()> {
    let store = LocalStore::new(ScriptedArea::with_entries(record!({"data": {"a": 1}})));

    let result = store.get_default().await?;
    assert_eq!(result, Some(record!({"data": {"a": 1}})));
    assert!(!result.unwrap_or_default().contains_key("meta"));

    Ok(())
}

#[tokio::test]
async fn test_only_requested_keys_are_read() -> anyhow::Result<()> {
    let store = LocalStore::new(ScriptedArea::with_entries(record!({
        "data": 1,
        "meta": 2,
        "settings": {"theme": "dark"}
    })));

    assert_eq!(store.get("settings").await?, Some(record!({"settings": {"theme": "dark"}})));
    assert_eq!(store.get_default().await?, Some(record!({"data": 1, "meta": 2})));
    assert_eq!(
        store.get(KeySelector::All).await?,
        Some(record!({"data": 1, "meta": 2, "settings": {"theme": "dark"}}))
    );

    Ok(())
}

#[tokio::test]
async fn test_read_error_is_forwarded_unchanged() -> anyhow::Result<()> {
    let area = ScriptedArea::with_entries(record!({"data": {"a": 1}}));
    let failure = PlatformError::new(PlatformErrorKind::PermissionDenied, "access denied");
    area.fail_with(failure.clone());
    let store = LocalStore::new(area.clone());

    let err = store.get_default().await.unwrap_err();
    assert_eq!(err, StoreError::Platform(failure));
    assert_eq!(area.reads(), 1);

    area.recover();
    assert_eq!(store.get_default().await?, Some(record!({"data": {"a": 1}})));

    Ok(())
}

// =============================================================================
// Writes
// =============================================================================

#[tokio::test]
async fn test_set_then_get() -> anyhow::Result<()> {
    let store = LocalStore::new(ScriptedArea::new());

    store.set(record!({"data": {"a": 1}})).await?;
    assert_eq!(store.get(["data"]).await?, Some(record!({"data": {"a": 1}})));

    Ok(())
}

#[tokio::test]
async fn test_set_leaves_other_keys_untouched() -> anyhow::Result<()> {
    let area = ScriptedArea::with_entries(record!({"data": {"a": 1}, "meta": {"version": 1}}));
    let store = LocalStore::new(area.clone());

    store.set(record!({"data": {"a": 2}})).await?;

    assert_eq!(area.writes(), 1);
    assert_eq!(
        area.memory.snapshot(),
        record!({"data": {"a": 2}, "meta": {"version": 1}})
    );

    Ok(())
}

#[tokio::test]
async fn test_write_error_is_forwarded_unchanged() -> anyhow::Result<()> {
    let area = ScriptedArea::new();
    let failure = PlatformError::new(PlatformErrorKind::QuotaExceeded, "QUOTA_BYTES quota exceeded");
    area.fail_with(failure.clone());
    let store = LocalStore::new(area.clone());

    let err = store.set(record!({"data": "x"})).await.unwrap_err();
    assert_eq!(err.platform(), Some(&failure));
    assert!(area.memory.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_concurrent_writes_to_distinct_keys() -> anyhow::Result<()> {
    let area = ScriptedArea::new();
    let store = LocalStore::new(area.clone());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.set(record!({ format!("k{}", i): i })).await })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    assert_eq!(area.writes(), 8);
    assert_eq!(area.memory.len(), 8);

    Ok(())
}
