//! Cart line: one plan plus its add-on selection.

use crate::addon::{Addon, AddonKind};
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A line in the cart.
///
/// `current_price` and `formatted_price` are derived from `base_price`,
/// `available_addons` and `selected_addon_ids` by [`CartLine::reprice`].
/// Fields added after the first release default when missing so older
/// persisted carts still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Product being purchased; unique within a cart.
    pub id: ProductId,
    /// Product title (denormalized for display).
    pub title: String,
    /// Price of the plan alone.
    pub base_price: Money,
    /// Base price plus selected add-ons.
    #[serde(default)]
    pub current_price: Money,
    /// Image shown next to the line.
    #[serde(default)]
    pub display_image: Option<String>,
    /// Catalog code printed on the plan.
    #[serde(default)]
    pub product_code: Option<String>,
    /// Selected add-ons.
    #[serde(default)]
    pub selected_addon_ids: BTreeSet<AddonKind>,
    /// Add-ons currently offered for this product, in display order.
    #[serde(default)]
    pub available_addons: Vec<Addon>,
    /// `current_price` rendered in the cart currency.
    #[serde(default)]
    pub formatted_price: String,
    /// Product suggested as an upsell for this line.
    #[serde(default)]
    pub recommended_upsell_id: Option<ProductId>,
}

impl CartLine {
    /// Create a line with no add-ons.
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, base_price: Money) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            base_price,
            current_price: base_price,
            display_image: None,
            product_code: None,
            selected_addon_ids: BTreeSet::new(),
            available_addons: Vec::new(),
            formatted_price: String::new(),
            recommended_upsell_id: None,
        }
    }

    /// Set the offered add-ons.
    pub fn with_addons(mut self, addons: Vec<Addon>) -> Self {
        self.available_addons = addons;
        self
    }

    /// Set the selected add-ons.
    pub fn with_selected(mut self, selected: impl IntoIterator<Item = AddonKind>) -> Self {
        self.selected_addon_ids = selected.into_iter().collect();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.display_image = Some(image.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.product_code = Some(code.into());
        self
    }

    pub fn with_upsell(mut self, upsell: impl Into<ProductId>) -> Self {
        self.recommended_upsell_id = Some(upsell.into());
        self
    }

    /// Look up an offered add-on.
    pub fn addon(&self, kind: &AddonKind) -> Option<&Addon> {
        self.available_addons.iter().find(|a| &a.id == kind)
    }

    /// Whether `kind` is offered and may be selected.
    pub fn offers(&self, kind: &AddonKind) -> bool {
        kind.is_known() && self.addon(kind).is_some()
    }

    pub fn is_selected(&self, kind: &AddonKind) -> bool {
        self.selected_addon_ids.contains(kind)
    }

    /// Selected add-ons, in offer order.
    pub fn selected_addons(&self) -> impl Iterator<Item = &Addon> {
        self.available_addons
            .iter()
            .filter(|a| a.id.is_known() && self.selected_addon_ids.contains(&a.id))
    }

    /// Sum of the selected add-on prices.
    pub fn addons_total(&self) -> Money {
        self.selected_addons().map(|a| a.price).sum()
    }

    /// Recompute derived fields from the base price and the add-on snapshot.
    ///
    /// Selected ids that are no longer offered (or that name an unknown
    /// kind) are dropped from the selection. Only the first offer of each
    /// kind is kept.
    pub fn reprice(&mut self, currency: Currency) {
        let mut seen = BTreeSet::new();
        self.available_addons.retain(|a| seen.insert(a.id.clone()));

        let offered: BTreeSet<AddonKind> = self
            .available_addons
            .iter()
            .filter(|a| a.id.is_known())
            .map(|a| a.id.clone())
            .collect();
        self.selected_addon_ids.retain(|id| offered.contains(id));

        self.current_price = self.base_price + self.addons_total();
        self.formatted_price = currency.format(self.current_price);
    }
}
