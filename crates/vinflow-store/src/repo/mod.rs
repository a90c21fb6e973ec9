//! Repository layer mapping workflow models to SQLite tables

pub mod hydration;
pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;
