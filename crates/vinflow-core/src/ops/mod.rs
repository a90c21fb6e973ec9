//! Workflow operations
//!
//! Each operation is a pure function over an order snapshot that either
//! refuses with a [`WorkflowError`](crate::errors::WorkflowError) or returns
//! the write set a store commits.

pub mod batch;
pub mod create;
pub mod finish;
pub mod progress;
pub mod store;

pub use batch::{apply_step, plan_step, RowStamp, StepWriteSet};
pub use create::{lookup_keys, plan_order, NewOrder, RowInput};
pub use finish::{finish, plan_finish, FinishWriteSet};
pub use progress::{actionable_rows, progress, step_summary, StepSummary};
pub use store::Store;
