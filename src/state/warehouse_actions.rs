//! Warehouse state actions.

use anyhow::Result;
use gpui::*;

use bucketdesk::services::{WarehouseConfig, WarehouseSession};

use super::storage::Settings;
use super::warehouse::{WarehouseConnectionStatus, WarehouseState};

/// Apply a warehouse configuration. Fails if a required field is missing.
pub fn warehouse_connect(config: WarehouseConfig, cx: &mut App) -> Result<()> {
    let limit = cx.global::<Settings>().config.browse_row_limit;
    let session = WarehouseSession::new(config)?.with_browse_limit(limit);
    let label = session.config().display_name();

    cx.update_global::<WarehouseState, _>(|state, _cx| {
        state.session = Some(session);
        state.connection_status = WarehouseConnectionStatus::Connected;
    });

    tracing::info!("Warehouse configured: {}", label);
    Ok(())
}

pub fn warehouse_disconnect(cx: &mut App) {
    cx.update_global::<WarehouseState, _>(|state, _cx| {
        state.session = None;
        state.connection_status = WarehouseConnectionStatus::Disconnected;
    });
}

/// Test a warehouse configuration without applying it.
pub async fn test_warehouse_connection(config: WarehouseConfig) -> Result<(), String> {
    let session = WarehouseSession::new(config).map_err(|e| e.to_string())?;
    session.test_connection().await.map_err(|e| e.to_string())
}
