//! Canonical schema constants for structured logging
//!
//! These constants keep field keys identical across the engine, the store and
//! the log capture used in tests.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Workflow identifiers
pub const FIELD_ORDER_ID: &str = "order_id";
pub const FIELD_VIN: &str = "vin";
pub const FIELD_STEP: &str = "step";
pub const FIELD_ACTOR_UID: &str = "actor_uid";

// Batch sizes
pub const FIELD_APPLIED: &str = "applied";
pub const FIELD_EXCLUDED: &str = "excluded";
pub const FIELD_ROW_COUNT: &str = "row_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
