mod results;
pub mod storage;
pub mod warehouse;
mod workspace;

pub use workspace::*;
