//! Price reconciliation against the catalog.
//!
//! Cached cart lines drift from the catalog when prices or add-on offers
//! change. A reconciliation run:
//!
//! 1. collects the ids of cart lines that look like catalog ids,
//! 2. fetches their current records in one batch,
//! 3. patches each line that has a record (base price, offers, selection,
//!    price, code, upsell),
//! 4. persists and reports a single [`CartEvent::PricesUpdated`] when
//!    anything changed.
//!
//! Steps 1 and 2 live on [`PriceReconciler`]; steps 3 and 4 are the
//! [`CartAction::Reconcile`] transition, applied through the store against
//! whatever state exists when the fetch resolves.
//!
//! [`CartEvent::PricesUpdated`]: crate::cart::CartEvent::PricesUpdated
//! [`CartAction::Reconcile`]: crate::cart::CartAction::Reconcile

use crate::addon::{Addon, AddonKind};
use crate::cart::{CartLine, CartState};
use crate::catalog::{CatalogService, ProductRecord};
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use std::collections::BTreeSet;

/// Fetches fresh catalog records for a cart.
pub struct PriceReconciler<'a> {
    catalog: &'a dyn CatalogService,
}

impl<'a> PriceReconciler<'a> {
    pub fn new(catalog: &'a dyn CatalogService) -> Self {
        Self { catalog }
    }

    /// Ids worth asking the catalog about. Malformed ids are skipped.
    pub fn catalog_ids(state: &CartState) -> Vec<ProductId> {
        state
            .lines()
            .iter()
            .filter_map(|line| {
                if line.id.is_catalog_id() {
                    Some(line.id.clone())
                } else {
                    tracing::warn!(id = %line.id, "skipping malformed product id");
                    None
                }
            })
            .collect()
    }

    /// Fetch records for `ids`.
    ///
    /// Returns `None` when the catalog could not be reached; the caller
    /// should keep its current state for this cycle.
    pub async fn fetch(&self, ids: &[ProductId]) -> Option<Vec<ProductRecord>> {
        if ids.is_empty() {
            return Some(Vec::new());
        }

        match self.catalog.fetch_products_by_ids(ids).await {
            Ok(records) => {
                tracing::debug!(
                    requested = ids.len(),
                    received = records.len(),
                    "fetched catalog records"
                );
                Some(records)
            }
            Err(e) => {
                tracing::warn!(error = %e, "price reconciliation skipped");
                None
            }
        }
    }
}

/// The fields reconciliation owns, for change detection.
#[derive(PartialEq)]
struct Owned {
    base_price: Money,
    offers: Vec<(AddonKind, Money)>,
    selected: BTreeSet<AddonKind>,
    current_price: Money,
    code: Option<String>,
    upsell: Option<ProductId>,
}

impl Owned {
    fn of(line: &CartLine) -> Self {
        Self {
            base_price: line.base_price,
            offers: line
                .available_addons
                .iter()
                .map(|a| (a.id.clone(), a.price))
                .collect(),
            selected: line.selected_addon_ids.clone(),
            current_price: line.current_price,
            code: line.product_code.clone(),
            upsell: line.recommended_upsell_id.clone(),
        }
    }
}

/// Patch `line` from `record`; returns whether anything it owns changed.
///
/// Previously selected add-ons survive only if the record still offers
/// them, and are priced at the record's price.
pub(crate) fn patch_line(line: &mut CartLine, record: &ProductRecord, currency: Currency) -> bool {
    let Some(base_price) = record.base_price() else {
        tracing::warn!(id = %record.id, "catalog record has no usable base price; line left as is");
        return false;
    };
    let before = Owned::of(line);

    let fresh: Vec<Addon> = record
        .offered_addons()
        .into_iter()
        .map(|addon| match line.addon(&addon.id) {
            // keep labels the line was added with
            Some(known) => addon.with_label(known.label.clone()),
            None => addon,
        })
        .collect();

    line.base_price = base_price;
    line.available_addons = fresh;
    line.product_code = record.code.clone();
    line.recommended_upsell_id = record.recommended_upsell_id.clone();
    line.reprice(currency);

    Owned::of(line) != before
}
