//! Notifications produced by cart transitions.

use crate::addon::AddonKind;
use crate::ids::ProductId;
use serde::Serialize;
use std::fmt;

/// Something the user may want to be told about.
///
/// Transitions only describe what happened; the caller decides whether and
/// when to display it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CartEvent {
    /// A product entered the cart.
    Added { id: ProductId, title: String },
    /// An existing line was replaced.
    Updated { id: ProductId, title: String },
    /// A line was removed.
    Removed { id: ProductId },
    /// An add-on was selected on a line.
    AddonAdded {
        line_id: ProductId,
        addon: AddonKind,
        label: String,
    },
    /// An add-on was deselected on a line.
    AddonRemoved {
        line_id: ProductId,
        addon: AddonKind,
        label: String,
    },
    /// Every line was removed.
    Cleared,
    /// Reconciliation changed prices or offers; emitted once per run.
    PricesUpdated { lines: Vec<ProductId> },
}

impl fmt::Display for CartEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartEvent::Added { title, .. } => write!(f, "{} added to cart", title),
            CartEvent::Updated { title, .. } => write!(f, "{} updated in cart", title),
            CartEvent::Removed { id } => write!(f, "{} removed from cart", id),
            CartEvent::AddonAdded { label, .. } => write!(f, "{} added", label),
            CartEvent::AddonRemoved { label, .. } => write!(f, "{} removed", label),
            CartEvent::Cleared => write!(f, "Cart cleared"),
            CartEvent::PricesUpdated { lines } => {
                write!(f, "Prices updated for {} item(s) in your cart", lines.len())
            }
        }
    }
}
