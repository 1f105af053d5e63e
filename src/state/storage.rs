//! Storage session state.

use gpui::*;

use bucketdesk::services::{AppConfig, StorageSession};

/// Connection status for the storage side.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StorageConnectionStatus {
    Disconnected,
    Connected,
}

/// Global state for the storage browser.
pub struct StorageState {
    /// Session built from the last applied configuration.
    pub session: Option<StorageSession>,
    pub connection_status: StorageConnectionStatus,
    /// Folder prefix currently listed.
    pub current_prefix: String,
}

impl Global for StorageState {}

impl StorageState {
    pub fn init(cx: &mut App) {
        cx.set_global(StorageState {
            session: None,
            connection_status: StorageConnectionStatus::Disconnected,
            current_prefix: String::new(),
        });
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.connection_status, StorageConnectionStatus::Connected)
    }
}

/// Non-secret defaults read at startup.
pub struct Settings {
    pub config: AppConfig,
}

impl Global for Settings {}

impl Settings {
    pub fn init(cx: &mut App) {
        let config = AppConfig::from_env();
        tracing::debug!("Loaded settings: {:?}", config);
        cx.set_global(Settings { config });
    }
}
