//! Core types shared across vinflow crates
//!
//! This crate holds the small vocabulary every other crate agrees on:
//!
//! - **Identifiers**: OrderId
//! - **Correlation types**: RequestId
//! - **Personal data**: Sensitive<T> marker for redaction in logs
//! - **Schema constants**: Canonical log field keys and event names

pub mod correlation;
pub mod ids;
pub mod schema;
pub mod sensitive;

pub use correlation::RequestId;
pub use ids::OrderId;
pub use sensitive::Sensitive;
