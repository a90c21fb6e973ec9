use vinflow_core_types::RequestId;
use thiserror::Error;

/// Result type alias using WorkflowError
pub type Result<T> = std::result::Result<T, WorkflowError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used by the CLI exit path, by tests,
/// and by any host that needs to tell a domain refusal apart from a storage
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Creation
    InvalidInput,

    // Authorization
    Unauthorised,
    Forbidden,

    // Step application
    InvalidStep,
    NoEligibleTargets,
    PrecedenceViolation,

    // Completion
    IncompleteRows,
    IdentityMismatch,
    AlreadyCompleted,

    // Lookup
    NotFound,

    /// A compare-and-set precondition failed at commit time
    Concurrency,
    /// Persisted data breaks a workflow invariant
    CorruptRecord,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Unauthorised => "ERR_UNAUTHORISED",
            ExErrorKind::Forbidden => "ERR_FORBIDDEN",
            ExErrorKind::InvalidStep => "ERR_INVALID_STEP",
            ExErrorKind::NoEligibleTargets => "ERR_NO_ELIGIBLE_TARGETS",
            ExErrorKind::PrecedenceViolation => "ERR_PRECEDENCE_VIOLATION",
            ExErrorKind::IncompleteRows => "ERR_INCOMPLETE_ROWS",
            ExErrorKind::IdentityMismatch => "ERR_IDENTITY_MISMATCH",
            ExErrorKind::AlreadyCompleted => "ERR_ALREADY_COMPLETED",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::CorruptRecord => "ERR_CORRUPT_RECORD",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for kinds raised by the storage or transport side rather than by
    /// a workflow rule
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ExErrorKind::Io | ExErrorKind::Serialization | ExErrorKind::Persistence
        )
    }

    /// True when a workflow rule refused the request and the system itself is healthy
    pub fn is_domain_refusal(&self) -> bool {
        !self.is_transport() && !matches!(self, ExErrorKind::CorruptRecord | ExErrorKind::Internal)
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the workflow context (order, row, step)
/// the failure was raised in.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    order_id: Option<String>,
    vin: Option<String>,
    step: Option<u8>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
    vins: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            order_id: None,
            vin: None,
            step: None,
            request_id: None,
            message: String::new(),
            source: None,
            vins: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add order ID context
    pub fn with_order_id(mut self, id: impl Into<String>) -> Self {
        self.order_id = Some(id.into());
        self
    }

    /// Add single-row context
    pub fn with_vin(mut self, vin: impl Into<String>) -> Self {
        self.vin = Some(vin.into());
        self
    }

    /// Add step number context
    pub fn with_step(mut self, step: u8) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach the rows a batch failure refers to (offending or pending VINs)
    pub fn with_vins(mut self, vins: Vec<String>) -> Self {
        self.vins = Some(vins);
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    pub fn vin(&self) -> Option<&str> {
        self.vin.as_deref()
    }

    pub fn step(&self) -> Option<u8> {
        self.step
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Rows the error refers to, if any
    pub fn vins(&self) -> Option<&[String]> {
        self.vins.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(order_id) = &self.order_id {
            write!(f, " (order_id: {})", order_id)?;
        }
        if let Some(step) = self.step {
            write!(f, " (step: {})", step)?;
        }
        if let Some(vin) = &self.vin {
            write!(f, " (vin: {})", vin)?;
        }
        if let Some(vins) = &self.vins {
            write!(f, " (vins: {})", vins.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Workflow error taxonomy returned by the pure engine functions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    // ===== Creation =====
    /// Creation input is malformed or incomplete
    #[error("Invalid order input: {reason}")]
    Validation { reason: String },

    // ===== Authorization =====
    /// Actor lacks the capability for the requested step or row kind
    #[error("Actor {actor_uid} is not authorized: {reason}")]
    Unauthorized { actor_uid: String, reason: String },

    // ===== Step application =====
    /// Step number outside 1..=3
    #[error("Invalid step number: {step}")]
    InvalidStep { step: u8 },

    /// No row in the order is a valid target for this actor and step
    #[error("No rows in order {order_id} are eligible for step {step} by this actor")]
    NoEligibleTargets { order_id: String, step: u8 },

    /// At least one targeted row has not completed the previous step
    #[error("Step {step} cannot run before the previous step on rows {vins:?} of order {order_id}")]
    PrecedenceViolation {
        order_id: String,
        step: u8,
        vins: Vec<String>,
    },

    // ===== Completion =====
    /// Finish attempted while some rows have not arrived
    #[error("Order {order_id} has rows that have not arrived: {pending:?}")]
    IncompleteRows {
        order_id: String,
        pending: Vec<String>,
    },

    /// Finish attempted by an actor who is neither admin nor the creator
    #[error("Only the creator or an admin may finish order {order_id}")]
    IdentityMismatch { order_id: String },

    /// Order is already completed
    #[error("Order {order_id} is already completed")]
    AlreadyCompleted { order_id: String },

    // ===== Lookup / storage =====
    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: String },

    /// A compare-and-set condition failed at commit time
    #[error("Concurrent update on order {order_id}: {message}")]
    Conflict { order_id: String, message: String },

    /// Stored data breaks a workflow invariant
    #[error("Corrupt record in order {order_id}: {reason}")]
    CorruptRecord { order_id: String, reason: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from WorkflowError to ExError
impl From<WorkflowError> for ExError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation { reason } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("create_order")
                .with_message(reason),

            WorkflowError::Unauthorized { actor_uid, reason } => {
                ExError::new(ExErrorKind::Forbidden)
                    .with_message(format!("actor {}: {}", actor_uid, reason))
            }

            WorkflowError::InvalidStep { step } => ExError::new(ExErrorKind::InvalidStep)
                .with_step(step)
                .with_message("Step must be 1, 2 or 3"),

            WorkflowError::NoEligibleTargets { order_id, step } => {
                ExError::new(ExErrorKind::NoEligibleTargets)
                    .with_op("apply_step")
                    .with_order_id(order_id)
                    .with_step(step)
                    .with_message("No rows are eligible for this step by this actor")
            }

            WorkflowError::PrecedenceViolation {
                order_id,
                step,
                vins,
            } => ExError::new(ExErrorKind::PrecedenceViolation)
                .with_op("apply_step")
                .with_order_id(order_id)
                .with_step(step)
                .with_vins(vins)
                .with_message("Previous step is missing on targeted rows"),

            WorkflowError::IncompleteRows { order_id, pending } => {
                ExError::new(ExErrorKind::IncompleteRows)
                    .with_op("finish_order")
                    .with_order_id(order_id)
                    .with_vins(pending)
                    .with_message("All rows must arrive before the order is finished")
            }

            WorkflowError::IdentityMismatch { order_id } => {
                ExError::new(ExErrorKind::IdentityMismatch)
                    .with_op("finish_order")
                    .with_order_id(order_id)
                    .with_message("Only the order creator or an admin may finish the order")
            }

            WorkflowError::AlreadyCompleted { order_id } => {
                ExError::new(ExErrorKind::AlreadyCompleted)
                    .with_op("finish_order")
                    .with_order_id(order_id)
                    .with_message("Order is already completed")
            }

            WorkflowError::OrderNotFound { order_id } => ExError::new(ExErrorKind::NotFound)
                .with_order_id(order_id)
                .with_message("Order not found"),

            WorkflowError::Conflict { order_id, message } => {
                ExError::new(ExErrorKind::Concurrency)
                    .with_order_id(order_id)
                    .with_message(message)
            }

            WorkflowError::CorruptRecord { order_id, reason } => {
                ExError::new(ExErrorKind::CorruptRecord)
                    .with_order_id(order_id)
                    .with_message(reason)
            }

            WorkflowError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to WorkflowError
impl From<serde_json::Error> for WorkflowError {
    fn from(err: serde_json::Error) -> Self {
        WorkflowError::Internal {
            message: format!("serialization failed: {}", err),
        }
    }
}
