//! # dropgate-entity
//!
//! Domain entity models for Dropgate. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.
//!
//! The crate also defines the store capability traits ([`store`]) that
//! `dropgate-database` implements against PostgreSQL and, for tests,
//! in memory.

pub mod download;
pub mod file;
pub mod session;
pub mod store;
pub mod user;
