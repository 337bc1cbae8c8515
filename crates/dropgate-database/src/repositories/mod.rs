//! Store implementations for all Dropgate entities.

pub mod auth;
pub mod file;
pub mod memory;
pub mod user;

pub use auth::PgAuthStore;
pub use file::PgFileStore;
pub use user::PgUserStore;
