//! Object storage access.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ StorageSession                              │
//! │  - holds the StorageConfig from the form    │
//! │  - builds a client per operation            │
//! └─────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────┐
//! │ StorageFactory                              │
//! │  - validates config, returns a client       │
//! └─────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────┐
//! │ S3Storage (OpenDAL)                         │
//! └─────────────────────────────────────────────┘
//! ```

pub mod factory;
pub mod keys;
pub mod s3;
pub mod session;
pub mod traits;
pub mod types;

pub use factory::StorageFactory;
pub use s3::{S3Storage, filter_listing};
pub use session::{StorageSession, save_download};
pub use traits::{BoxedStorageConnection, StorageConnection};
pub use types::{Download, LocalFile, ObjectInfo, StorageConfig};
