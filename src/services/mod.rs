pub mod config;
pub mod preview;
pub mod storage;
pub mod warehouse;

pub use config::AppConfig;
pub use preview::{FileKind, Preview, PreviewFailure, TablePreview};
pub use storage::{ObjectInfo, StorageConfig, StorageSession};
pub use warehouse::{SelectResult, WarehouseConfig, WarehouseSession};
