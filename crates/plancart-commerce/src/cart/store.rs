//! The cart store: cart state plus persistence.

use crate::addon::AddonKind;
use crate::cart::{CartAction, CartEvent, CartLine, CartState};
use crate::catalog::{CatalogService, ProductRecord};
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use crate::persistence::CartStorage;
use crate::reconcile::PriceReconciler;

/// Owns the session's cart.
///
/// Hydrates once from storage when opened, then persists after every
/// mutation that changed something. Mutations never fail; each returns the
/// events it produced for the caller to display.
///
/// # Example
///
/// ```rust,ignore
/// let mut store = CartStore::open(CartStorage::new(cache), Currency::BRL);
/// store.add(line);
/// store.add_addon(&ProductId::new("P1"), AddonKind::Electrical);
/// println!("{}", store.formatted_total());
/// ```
#[derive(Debug)]
pub struct CartStore {
    state: CartState,
    storage: CartStorage,
}

impl CartStore {
    /// Open the store, restoring the last saved cart.
    pub fn open(storage: CartStorage, currency: Currency) -> Self {
        let state = storage.load(currency);
        Self { state, storage }
    }

    /// Insert a line, or replace the line with the same id.
    pub fn add(&mut self, line: CartLine) -> Vec<CartEvent> {
        self.dispatch(CartAction::Add(line))
    }

    /// Remove a line. No-op if absent.
    pub fn remove(&mut self, id: &ProductId) -> Vec<CartEvent> {
        self.dispatch(CartAction::Remove(id.clone()))
    }

    /// Select an add-on. No-op if the line is missing, the add-on is not
    /// offered, or it is already selected.
    pub fn add_addon(&mut self, line_id: &ProductId, addon: AddonKind) -> Vec<CartEvent> {
        self.dispatch(CartAction::AddAddon {
            line_id: line_id.clone(),
            addon,
        })
    }

    /// Deselect an add-on. No-op if it is not selected.
    pub fn remove_addon(&mut self, line_id: &ProductId, addon: AddonKind) -> Vec<CartEvent> {
        self.dispatch(CartAction::RemoveAddon {
            line_id: line_id.clone(),
            addon,
        })
    }

    /// Remove every line.
    pub fn clear(&mut self) -> Vec<CartEvent> {
        self.dispatch(CartAction::Clear)
    }

    /// Patch lines from catalog records fetched earlier.
    ///
    /// The patch applies to the cart as it is now, including changes made
    /// while the records were being fetched.
    pub fn apply_catalog_records(&mut self, records: Vec<ProductRecord>) -> Vec<CartEvent> {
        let events = self.dispatch(CartAction::Reconcile(records));
        if let Some(CartEvent::PricesUpdated { lines }) = events.first() {
            tracing::info!(changed = lines.len(), "cart prices reconciled");
        }
        events
    }

    /// Refresh prices against the catalog.
    ///
    /// A failed fetch leaves the cart untouched and returns no events.
    pub async fn reconcile(&mut self, catalog: &dyn CatalogService) -> Vec<CartEvent> {
        let ids = PriceReconciler::catalog_ids(&self.state);
        match PriceReconciler::new(catalog).fetch(&ids).await {
            Some(records) => self.apply_catalog_records(records),
            None => Vec::new(),
        }
    }

    fn dispatch(&mut self, action: CartAction) -> Vec<CartEvent> {
        let events = self.state.apply(action);
        if !events.is_empty() {
            self.storage.save(&self.state);
        }
        events
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn lines(&self) -> &[CartLine] {
        self.state.lines()
    }

    pub fn get(&self, id: &ProductId) -> Option<&CartLine> {
        self.state.get(id)
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn currency(&self) -> Currency {
        self.state.currency()
    }

    /// Sum of line prices.
    pub fn total(&self) -> Money {
        self.state.total()
    }

    pub fn formatted_total(&self) -> String {
        self.currency().format(self.total())
    }
}
