//! Structured logging facility for vinflow
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use vinflow_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Only engine operations and the CLI emit start/end events. The pure
//! workflow functions in [`crate::ops`] never log.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
