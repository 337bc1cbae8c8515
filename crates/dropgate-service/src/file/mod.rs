//! Owner-facing file services.

pub mod service;
pub mod upload;

pub use service::FileService;
pub use upload::{UploadRequest, UploadService};
