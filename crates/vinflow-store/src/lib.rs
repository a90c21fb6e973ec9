//! vinflow store - SQLite persistence for orders, profiles and inventory
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - A repository layer mapping workflow models to tables
//! - [`SqliteStore`], the durable implementation of the core storage ports

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod sqlite_store;

pub use errors::Result;
pub use sqlite_store::SqliteStore;
