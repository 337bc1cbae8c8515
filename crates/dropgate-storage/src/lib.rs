//! # dropgate-storage
//!
//! [`BlobStore`](dropgate_core::traits::storage::BlobStore) implementations:
//! the local filesystem backend used in production and an in-memory backend
//! for tests.

pub mod local;
pub mod memory;

pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;
