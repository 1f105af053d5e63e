//! Warehouse session state.

use gpui::*;

use bucketdesk::services::WarehouseSession;

/// Connection status for the warehouse side.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WarehouseConnectionStatus {
    Disconnected,
    Connected,
}

/// Global state for the warehouse panel.
pub struct WarehouseState {
    pub session: Option<WarehouseSession>,
    pub connection_status: WarehouseConnectionStatus,
}

impl Global for WarehouseState {}

impl WarehouseState {
    pub fn init(cx: &mut App) {
        cx.set_global(WarehouseState {
            session: None,
            connection_status: WarehouseConnectionStatus::Disconnected,
        });
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.connection_status, WarehouseConnectionStatus::Connected)
    }
}
