//! Storage state actions.
//!
//! This module contains actions that modify the global StorageState.

use anyhow::Result;
use gpui::*;

use bucketdesk::services::{StorageConfig, StorageSession};

use super::storage::{StorageConnectionStatus, StorageState};

/// Apply a storage configuration. Fails if a required field is missing.
pub fn storage_connect(config: StorageConfig, cx: &mut App) -> Result<()> {
    let session = StorageSession::new(config)?;
    let bucket = session.config().bucket.clone();

    cx.update_global::<StorageState, _>(|state, _cx| {
        state.session = Some(session);
        state.connection_status = StorageConnectionStatus::Connected;
        state.current_prefix = String::new();
    });

    tracing::info!("Storage configured for bucket {}", bucket);
    Ok(())
}

/// Drop the storage session.
pub fn storage_disconnect(cx: &mut App) {
    cx.update_global::<StorageState, _>(|state, _cx| {
        state.session = None;
        state.connection_status = StorageConnectionStatus::Disconnected;
        state.current_prefix = String::new();
    });
}

/// Remember the prefix being browsed.
pub fn set_storage_prefix(prefix: String, cx: &mut App) {
    cx.update_global::<StorageState, _>(|state, _cx| {
        state.current_prefix = prefix;
    });
}

/// Test a storage configuration without applying it.
pub async fn test_storage_connection(config: StorageConfig) -> Result<(), String> {
    let session = StorageSession::new(config).map_err(|e| e.to_string())?;
    session.test_connection().await.map_err(|e| e.to_string())
}
