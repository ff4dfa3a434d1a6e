//! Cart state and its transitions.

use crate::addon::AddonKind;
use crate::cart::{CartEvent, CartLine};
use crate::catalog::ProductRecord;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use crate::reconcile;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A change requested of the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Insert a line, or replace the line with the same id wholesale.
    Add(CartLine),
    /// Remove a line.
    Remove(ProductId),
    /// Select an add-on on a line.
    AddAddon { line_id: ProductId, addon: AddonKind },
    /// Deselect an add-on on a line.
    RemoveAddon { line_id: ProductId, addon: AddonKind },
    /// Remove every line.
    Clear,
    /// Patch lines from authoritative catalog records.
    Reconcile(Vec<ProductRecord>),
}

/// Result of a pure transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: CartState,
    pub events: Vec<CartEvent>,
}

/// Ordered cart lines.
///
/// Serializes as a bare array of lines; the display currency is a session
/// setting and is not persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartState {
    lines: Vec<CartLine>,
    #[serde(skip)]
    currency: Currency,
}

impl CartState {
    /// An empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
        }
    }

    /// Build a state from lines, e.g. a hydrated snapshot.
    ///
    /// Lines are repriced and later duplicates of an id replace earlier ones.
    pub fn from_lines(lines: Vec<CartLine>, currency: Currency) -> Self {
        let mut state = Self::new(currency);
        for line in lines {
            state.upsert(line);
        }
        state
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Change the display currency and refresh formatted prices.
    pub fn set_currency(&mut self, currency: Currency) {
        self.currency = currency;
        for line in &mut self.lines {
            line.reprice(currency);
        }
    }

    pub fn get(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == id)
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line prices.
    pub fn total(&self) -> Money {
        self.lines.iter().map(|l| l.current_price).sum()
    }

    /// Pure transition: the new state and the events it produced.
    pub fn transition(&self, action: CartAction) -> Transition {
        let mut state = self.clone();
        let events = state.apply(action);
        Transition { state, events }
    }

    /// Apply an action in place. An empty event list means nothing changed.
    pub fn apply(&mut self, action: CartAction) -> Vec<CartEvent> {
        match action {
            CartAction::Add(line) => {
                let id = line.id.clone();
                let title = line.title.clone();
                if self.upsert(line) {
                    vec![CartEvent::Updated { id, title }]
                } else {
                    vec![CartEvent::Added { id, title }]
                }
            }
            CartAction::Remove(id) => {
                let before = self.lines.len();
                self.lines.retain(|l| l.id != id);
                if self.lines.len() < before {
                    vec![CartEvent::Removed { id }]
                } else {
                    Vec::new()
                }
            }
            CartAction::AddAddon { line_id, addon } => self.add_addon(line_id, addon),
            CartAction::RemoveAddon { line_id, addon } => self.remove_addon(line_id, addon),
            CartAction::Clear => {
                if self.lines.is_empty() {
                    return Vec::new();
                }
                self.lines.clear();
                vec![CartEvent::Cleared]
            }
            CartAction::Reconcile(records) => self.reconcile(records),
        }
    }

    /// Insert or replace; returns whether a line was replaced.
    fn upsert(&mut self, mut line: CartLine) -> bool {
        line.reprice(self.currency);
        match self.lines.iter_mut().find(|l| l.id == line.id) {
            Some(existing) => {
                *existing = line;
                true
            }
            None => {
                self.lines.push(line);
                false
            }
        }
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| &l.id == id)
    }

    fn add_addon(&mut self, line_id: ProductId, addon: AddonKind) -> Vec<CartEvent> {
        let currency = self.currency;
        let Some(line) = self.line_mut(&line_id) else {
            return Vec::new();
        };
        if line.is_selected(&addon) || !line.offers(&addon) {
            return Vec::new();
        }

        let label = line
            .addon(&addon)
            .map(|a| a.label.clone())
            .unwrap_or_default();
        line.selected_addon_ids.insert(addon.clone());
        line.reprice(currency);

        vec![CartEvent::AddonAdded {
            line_id,
            addon,
            label,
        }]
    }

    fn remove_addon(&mut self, line_id: ProductId, addon: AddonKind) -> Vec<CartEvent> {
        let currency = self.currency;
        let Some(line) = self.line_mut(&line_id) else {
            return Vec::new();
        };
        if !line.selected_addon_ids.remove(&addon) {
            return Vec::new();
        }

        let label = line
            .addon(&addon)
            .map(|a| a.label.clone())
            .unwrap_or_else(|| addon.label().to_string());
        line.reprice(currency);

        vec![CartEvent::AddonRemoved {
            line_id,
            addon,
            label,
        }]
    }

    fn reconcile(&mut self, records: Vec<ProductRecord>) -> Vec<CartEvent> {
        let currency = self.currency;
        let by_id: HashMap<ProductId, ProductRecord> =
            records.into_iter().map(|r| (r.id.clone(), r)).collect();

        let mut changed = Vec::new();
        for line in &mut self.lines {
            // Lines without a record are left alone this cycle.
            let Some(record) = by_id.get(&line.id) else {
                continue;
            };
            if reconcile::patch_line(line, record, currency) {
                changed.push(line.id.clone());
            }
        }

        if changed.is_empty() {
            Vec::new()
        } else {
            vec![CartEvent::PricesUpdated { lines: changed }]
        }
    }
}
