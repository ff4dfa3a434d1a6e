//! Cart state, add-on pricing and price reconciliation for PlanCart.
//!
//! A PlanCart storefront sells architectural house plans. Each cart line is
//! one plan plus independently priced add-on projects (electrical,
//! hydraulic, ...). This crate owns:
//!
//! - **Cart**: lines, add-on toggles, totals and the events they produce
//! - **Bundle**: the complete-bundle discount shown in the add-on selector
//! - **Persistence**: saving and restoring the cart across sessions
//! - **Reconciliation**: correcting cached prices against the catalog
//! - **Checkout**: handing the cart to the payment provider
//!
//! # Example
//!
//! ```rust,ignore
//! use plancart_commerce::prelude::*;
//!
//! let mut store = CartStore::open(CartStorage::in_memory(), Currency::BRL);
//!
//! let mut selection = AddonSelection::for_product(&record)?;
//! selection.toggle(SelectionItem::Addon(AddonKind::Electrical));
//! println!("{}", selection.quote(&BundleRule::default()).total);
//!
//! for event in store.add(selection.into_cart_line("P1", "Casa Térrea")) {
//!     println!("{}", event);
//! }
//!
//! // When the cart is shown
//! store.reconcile(&catalog).await;
//! println!("Total: {}", store.formatted_total());
//! ```

pub mod addon;
pub mod bundle;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod ids;
pub mod money;
pub mod persistence;
pub mod reconcile;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    pub use crate::addon::{Addon, AddonKind};

    // Cart
    pub use crate::cart::{CartAction, CartEvent, CartLine, CartState, CartStore, Transition};
    pub use crate::persistence::{CartStorage, CART_STORAGE_KEY};

    // Bundle
    pub use crate::bundle::{quote, AddonSelection, BundleQuote, BundleRule, SelectionItem};

    // Catalog
    pub use crate::catalog::{CatalogService, ProductRecord};
    pub use crate::reconcile::PriceReconciler;

    // Checkout
    pub use crate::checkout::{
        checkout, CheckoutLine, CheckoutRedirect, CheckoutRequest, CheckoutService, Contact,
        Lead, LeadCapture,
    };
}
