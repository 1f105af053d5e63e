//! Service layer for bucketdesk.
//!
//! Everything that talks to the object store, the SQL warehouse or a content
//! decoder lives here, independent of the gpui shell in `main.rs`.

pub mod services;
