//! Download audit entities.

pub mod model;

pub use model::{DownloadRecord, FileDownloadHistory};
