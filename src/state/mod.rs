mod storage;
mod storage_actions;
mod warehouse;
mod warehouse_actions;

use gpui::App;

pub use storage::*;
pub use storage_actions::*;
pub use warehouse::*;
pub use warehouse_actions::*;

pub fn init(cx: &mut App) {
    Settings::init(cx);
    StorageState::init(cx);
    WarehouseState::init(cx);
}
