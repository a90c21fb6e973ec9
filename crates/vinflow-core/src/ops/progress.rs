//! Progress and completion views over an order snapshot

use serde::Serialize;

use crate::authz::can_perform;
use crate::model::{Actor, Order, OrderRow};
use crate::steps::{next_step, Step};

/// Completion percentage, 0..=100
///
/// Each row contributes three checkpoints and the order one closing
/// checkpoint, so the value only grows as steps are stamped and reaches 100
/// exactly when every row has arrived and the order is completed. Halves
/// round up.
pub fn progress(order: &Order, rows: &[OrderRow]) -> u8 {
    if rows.is_empty() {
        return 0;
    }
    let done: u64 = Step::ALL
        .into_iter()
        .map(|s| rows.iter().filter(|r| r.steps.has(s)).count() as u64)
        .sum::<u64>()
        + u64::from(order.is_completed());
    let possible = 3 * rows.len() as u64 + 1;
    ((200 * done + possible) / (2 * possible)) as u8
}

/// Per-step counts for an order, with a flag for each step every row holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSummary {
    pub rows: usize,
    pub received: usize,
    pub sent: usize,
    pub arrived: usize,
    pub all_received: bool,
    pub all_sent: bool,
    pub all_arrived: bool,
    pub finished: bool,
}

pub fn step_summary(order: &Order, rows: &[OrderRow]) -> StepSummary {
    let count = |s: Step| rows.iter().filter(|r| r.steps.has(s)).count();
    let all = |n: usize| !rows.is_empty() && n == rows.len();
    let (received, sent, arrived) = (
        count(Step::Received),
        count(Step::Sent),
        count(Step::CarReceived),
    );
    StepSummary {
        rows: rows.len(),
        received,
        sent,
        arrived,
        all_received: all(received),
        all_sent: all(sent),
        all_arrived: all(arrived),
        finished: order.is_completed(),
    }
}

/// Rows whose next step the actor may perform right now
pub fn actionable_rows<'a>(actor: &Actor, order: &Order, rows: &'a [OrderRow]) -> Vec<&'a OrderRow> {
    rows.iter()
        .filter(|r| next_step(&r.steps).is_some_and(|s| can_perform(actor, r, s, order)))
        .collect()
}
