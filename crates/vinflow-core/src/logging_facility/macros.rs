//! Canonical logging macros
//!
//! Field names come from `vinflow_core_types::schema`. Callers need `tracing`
//! in their own dependencies.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use vinflow_core::log_op_start;
/// log_op_start!("apply_step");
/// log_op_start!("apply_step", order_id = "o1", step = 2u8);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::vinflow_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::vinflow_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use vinflow_core::log_op_end;
/// log_op_end!("apply_step", duration_ms = 42);
/// log_op_end!("apply_step", duration_ms = 42, applied = 3usize);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::vinflow_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::vinflow_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// `$err` is anything convertible into [`ExError`](crate::errors::ExError).
/// Workflow refusals log at warn, storage or internal failures at error.
///
/// # Example
///
/// ```
/// # use vinflow_core::{log_op_error, errors::WorkflowError};
/// let err = WorkflowError::OrderNotFound { order_id: "o1".to_string() };
/// log_op_error!("order_detail", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {
        $crate::log_op_error!($op, $err, duration_ms = $duration,)
    };
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        if ex_err.kind().is_domain_refusal() {
            tracing::warn!(
                component = module_path!(),
                op = $op,
                event = $crate::vinflow_core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ?ex_err.kind(),
                err_code = ex_err.code(),
                $($field)*
            );
        } else {
            tracing::error!(
                component = module_path!(),
                op = $op,
                event = $crate::vinflow_core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ?ex_err.kind(),
                err_code = ex_err.code(),
                $($field)*
            );
        }
    }};
}
