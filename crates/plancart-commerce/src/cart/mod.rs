//! Shopping cart module.
//!
//! Contains the cart line model, the state transitions, the events they
//! produce and the persisted store that ties them together.

mod event;
mod line;
mod state;
mod store;

pub use event::CartEvent;
pub use line::CartLine;
pub use state::{CartAction, CartState, Transition};
pub use store::CartStore;
