//! # Production Priority
//!
//! Ranks open orders for the kitchen by how large they are relative to the
//! rest of the current batch.
//!
//! ## Buckets
//! ```text
//!   min                                                          max
//!    ├──────────────┼──────────────┼──────────────┼──────────────┤
//!    │     LOW      │    MEDIUM    │     HIGH     │    URGENT    │
//!    0%            25%            50%            75%          100%
//! ```
//!
//! A batch where every quantity is the same has no spread; all members are
//! MEDIUM.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::types::{Order, OrderStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Baixa",
            Priority::Medium => "Média",
            Priority::High => "Alta",
            Priority::Urgent => "Urgente",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Buckets `quantity` by its position within `[min, max]`.
///
/// ```rust
/// use sapore_core::priority::{priority_for, Priority};
///
/// assert_eq!(priority_for(10.0, 0.0, 100.0), Priority::Low);
/// assert_eq!(priority_for(75.0, 0.0, 100.0), Priority::Urgent);
/// assert_eq!(priority_for(5.0, 5.0, 5.0), Priority::Medium);
/// ```
pub fn priority_for(quantity: f64, min: f64, max: f64) -> Priority {
    let spread = max - min;
    if spread <= 0.0 || !spread.is_finite() {
        return Priority::Medium;
    }

    let position = (quantity - min) / spread;
    if position < 0.25 {
        Priority::Low
    } else if position < 0.50 {
        Priority::Medium
    } else if position < 0.75 {
        Priority::High
    } else {
        Priority::Urgent
    }
}

/// Buckets every quantity against the batch's own min and max.
pub fn prioritize(quantities: &[f64]) -> Vec<Priority> {
    let min = quantities.iter().copied().fold(f64::INFINITY, f64::min);
    let max = quantities.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    quantities.iter().map(|&q| priority_for(q, min, max)).collect()
}

// =============================================================================
// Production Queue
// =============================================================================

/// An open order as the kitchen sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductionTask {
    pub order_id: Option<String>,
    pub customer: String,
    pub units: i64,
    pub status: OrderStatus,
    pub priority: Priority,
}

/// Open orders (pending or in production), most urgent first.
///
/// Orders of equal priority keep their original order.
pub fn production_queue(orders: &[Order]) -> Vec<ProductionTask> {
    let open: Vec<&Order> = orders
        .iter()
        .filter(|o| matches!(o.status, OrderStatus::Pending | OrderStatus::InProgress))
        .collect();

    let units: Vec<i64> = open
        .iter()
        .map(|o| o.items.iter().map(|i| i.quantity).sum())
        .collect();
    let priorities = prioritize(&units.iter().map(|&u| u as f64).collect::<Vec<_>>());

    let mut queue: Vec<ProductionTask> = open
        .into_iter()
        .zip(units)
        .zip(priorities)
        .map(|((order, units), priority)| ProductionTask {
            order_id: order.id.clone(),
            customer: order
                .customer_name
                .clone()
                .unwrap_or_else(|| order.customer_id.clone()),
            units,
            status: order.status,
            priority,
        })
        .collect();

    queue.sort_by(|a, b| b.priority.cmp(&a.priority));
    queue
}

// =============================================================================
// Unit Tests
// =============================================================================
