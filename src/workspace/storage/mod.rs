//! Storage browser UI components.

mod browser;
mod connection_form;

pub use browser::StorageBrowser;
pub use connection_form::StorageConnectionForm;
