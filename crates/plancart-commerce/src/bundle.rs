//! Complete-bundle discount for the product page add-on selector.
//!
//! Before a plan goes into the cart the customer picks which add-ons to
//! buy with it. Buying every optional add-on of a product that offers
//! enough of them earns a percentage off the whole selection.

use crate::addon::{Addon, AddonKind};
use crate::cart::CartLine;
use crate::catalog::ProductRecord;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// When the complete-bundle discount applies and how large it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleRule {
    /// Fewest optional add-ons a product must offer to qualify.
    pub min_optional_addons: usize,
    /// Percentage off the subtotal.
    pub discount_percent: u32,
}

impl Default for BundleRule {
    fn default() -> Self {
        Self {
            min_optional_addons: 3,
            discount_percent: 15,
        }
    }
}

impl BundleRule {
    /// Discount for `subtotal` given whether the bundle is complete.
    pub fn calculate(&self, subtotal: Money, complete_bundle: bool) -> Money {
        if complete_bundle {
            subtotal.percentage(self.discount_percent)
        } else {
            Money::zero()
        }
    }

    /// Whether offering `offered` optional add-ons can ever earn the discount.
    pub fn applies_to(&self, offered: usize) -> bool {
        offered > 0 && offered >= self.min_optional_addons
    }
}

/// An entry in the selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectionItem {
    /// The plan itself; always selected.
    Base,
    Addon(AddonKind),
}

/// Price breakdown of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BundleQuote {
    /// Base price plus selected add-ons.
    pub subtotal: Money,
    pub discount: Money,
    /// `subtotal - discount`.
    pub total: Money,
    /// Every optional add-on is selected and the rule applies.
    pub complete_bundle: bool,
}

/// Price a selection.
///
/// `optional` is the product's add-on catalog; only priceable entries count
/// towards the bundle, and only the first offer of each kind. Ids in
/// `selected` that are not offered are ignored.
pub fn quote(
    base_price: Money,
    optional: &[Addon],
    selected: &BTreeSet<AddonKind>,
    rule: &BundleRule,
) -> BundleQuote {
    let mut seen = BTreeSet::new();
    let offered: Vec<&Addon> = optional
        .iter()
        .filter(|a| a.is_priceable() && seen.insert(a.id.clone()))
        .collect();
    let chosen: Vec<&&Addon> = offered
        .iter()
        .filter(|a| selected.contains(&a.id))
        .collect();

    let subtotal = base_price + chosen.iter().map(|a| a.price).sum::<Money>();
    let complete_bundle = rule.applies_to(offered.len()) && chosen.len() == offered.len();
    let discount = rule.calculate(subtotal, complete_bundle);

    BundleQuote {
        subtotal,
        discount,
        total: subtotal - discount,
        complete_bundle,
    }
}

/// Add-on choices for one product that is not in the cart yet.
#[derive(Debug, Clone, PartialEq)]
pub struct AddonSelection {
    base_price: Money,
    optional: Vec<Addon>,
    selected: BTreeSet<AddonKind>,
}

impl AddonSelection {
    /// Start a selection with only the base item chosen.
    ///
    /// Unknown or non-positively priced add-ons are not offered, nor is a
    /// second offer of a kind already listed.
    pub fn new(base_price: Money, optional: Vec<Addon>) -> Self {
        let mut seen = BTreeSet::new();
        let optional: Vec<Addon> = optional
            .into_iter()
            .filter(|a| a.is_priceable() && seen.insert(a.id.clone()))
            .collect();
        Self {
            base_price,
            optional,
            selected: BTreeSet::new(),
        }
    }

    /// Selector for a catalog record; `None` if the record has no usable
    /// base price.
    pub fn for_product(record: &ProductRecord) -> Option<Self> {
        Some(Self::new(record.base_price()?, record.offered_addons()))
    }

    pub fn base_price(&self) -> Money {
        self.base_price
    }

    pub fn optional_addons(&self) -> &[Addon] {
        &self.optional
    }

    /// Every selected item, base first.
    pub fn items(&self) -> Vec<SelectionItem> {
        std::iter::once(SelectionItem::Base)
            .chain(
                self.optional
                    .iter()
                    .filter(|a| self.selected.contains(&a.id))
                    .map(|a| SelectionItem::Addon(a.id.clone())),
            )
            .collect()
    }

    pub fn is_selected(&self, item: &SelectionItem) -> bool {
        match item {
            SelectionItem::Base => true,
            SelectionItem::Addon(kind) => self.selected.contains(kind),
        }
    }

    /// Select an item. Returns whether the selection changed.
    pub fn select(&mut self, item: SelectionItem) -> bool {
        match item {
            SelectionItem::Base => false,
            SelectionItem::Addon(kind) => {
                let offered = self.optional.iter().any(|a| a.id == kind);
                offered && self.selected.insert(kind)
            }
        }
    }

    /// Deselect an item. The base item cannot be deselected.
    pub fn deselect(&mut self, item: &SelectionItem) -> bool {
        match item {
            SelectionItem::Base => false,
            SelectionItem::Addon(kind) => self.selected.remove(kind),
        }
    }

    /// Flip an item. Toggling the base item does nothing.
    pub fn toggle(&mut self, item: SelectionItem) -> bool {
        if self.is_selected(&item) {
            self.deselect(&item)
        } else {
            self.select(item)
        }
    }

    /// Select every optional add-on.
    pub fn select_all(&mut self) {
        self.selected = self.optional.iter().map(|a| a.id.clone()).collect();
    }

    pub fn quote(&self, rule: &BundleRule) -> BundleQuote {
        quote(self.base_price, &self.optional, &self.selected, rule)
    }

    /// The cart line for this selection.
    pub fn into_cart_line(self, id: impl Into<ProductId>, title: impl Into<String>) -> CartLine {
        CartLine::new(id, title, self.base_price)
            .with_addons(self.optional)
            .with_selected(self.selected)
    }
}
