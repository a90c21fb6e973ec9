//! Log capture for assertions on operation events
//!
//! Events are read back through the schema fields the logging macros emit,
//! so a test asks for "the `end` event of `apply_step` on order X" directly.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use vinflow_core_types::schema::{FIELD_EVENT, FIELD_OP, FIELD_ORDER_ID};

/// One emitted event; every field is kept in its rendered form
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op() == Some(op) && self.event() == Some(event)
    }
}

struct Fields<'a>(&'a mut HashMap<String, String>);

impl Visit for Fields<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    // numbers and bools render through Debug without quotes
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

/// Layer that appends every event to a shared buffer
pub struct TestCaptureLayer {
    buffer: Buffer,
}

impl TestCaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let buffer = Buffer::default();
        (
            Self {
                buffer: buffer.clone(),
            },
            TestCapture { buffer },
        )
    }
}

impl<S: Subscriber> Layer<S> for TestCaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut Fields(&mut fields));
        let captured = CapturedEvent {
            level: *event.metadata().level(),
            fields,
        };
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(captured);
        }
    }
}

/// Read side of the capture buffer
#[derive(Clone)]
pub struct TestCapture {
    buffer: Buffer,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.buffer.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events whose `field` was recorded with exactly `value`
    pub fn events_with_field(&self, field: &str, value: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.field(field) == Some(value))
            .collect()
    }

    /// Events `op` emitted for one order, in emission order
    pub fn order_events(&self, op: &str, order_id: &str) -> Vec<CapturedEvent> {
        self.events_with_field(FIELD_ORDER_ID, order_id)
            .into_iter()
            .filter(|e| e.op() == Some(op))
            .collect()
    }

    /// The first `event` logged by `op`
    ///
    /// # Panics
    ///
    /// Panics if `op` never logged `event`
    pub fn expect_event(&self, op: &str, event: &str) -> CapturedEvent {
        let events = self.events();
        let found = events.iter().find(|e| e.is(op, event)).cloned();
        match found {
            Some(e) => e,
            None => panic!(
                "event op={} event={} not found in {} captured events",
                op,
                event,
                events.len()
            ),
        }
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber
///
/// Later calls return a handle to the same buffer. Tests sharing a binary see
/// each other's events, so filter on `op` or `order_id`.
///
/// ```
/// use vinflow_core::log_op_start;
/// use vinflow_core::logging_facility::test_capture::init_test_capture;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_operation", order_id = "o-doc");
/// assert_eq!(capture.order_events("doc_operation", "o-doc").len(), 1);
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            tracing_subscriber::registry().with(layer).init();
            capture
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vinflow_core_types::schema::{FIELD_APPLIED, FIELD_STEP};

    #[test]
    fn test_step_fields_are_readable_by_order() {
        let (layer, capture) = TestCaptureLayer::new();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(op = "apply_step", event = "end", order_id = "o1", step = 2u8, applied = 3u64);
            tracing::info!(op = "apply_step", event = "end", order_id = "o2", step = 1u8, applied = 1u64);
        });

        let events = capture.order_events("apply_step", "o1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::INFO);
        assert_eq!(events[0].field(FIELD_STEP), Some("2"));
        assert_eq!(events[0].field(FIELD_APPLIED), Some("3"));
        assert!(events[0].is("apply_step", "end"));
    }
}
