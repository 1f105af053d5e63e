//! Warehouse UI components.

mod connection_form;
mod panel;

pub use connection_form::WarehouseConnectionForm;
pub use panel::WarehousePanel;
