//! Shared value types used by list endpoints and services.

pub mod pagination;
pub mod sorting;

pub use pagination::{PageRequest, PageResponse};
pub use sorting::{FileSortField, SortDirection};
