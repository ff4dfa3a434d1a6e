//! Price an add-on selection before it goes into the cart.

use anyhow::{bail, Result};
use plancart_commerce::addon::AddonKind;
use plancart_commerce::bundle::{AddonSelection, SelectionItem};
use plancart_commerce::Money;

use super::QuoteArgs;
use crate::context::Context;

/// Run the quote command.
pub fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    if !args.base.is_finite() || args.base < 0.0 {
        bail!("Base price must be a non-negative amount");
    }

    let mut selection = AddonSelection::new(Money::from_decimal(args.base), args.addons);
    if args.all {
        selection.select_all();
    } else {
        for key in &args.selected {
            let kind = AddonKind::parse(key);
            if !selection.select(SelectionItem::Addon(kind.clone())) {
                ctx.output.warn(&format!("{} is not offered; ignored", kind));
            }
        }
    }

    let rule = ctx.bundle_rule();
    let quote = selection.quote(&rule);
    ctx.output.quote(&selection, &quote, ctx.currency);

    if let Some(id) = args.add_to_cart {
        let title = args.title.unwrap_or_else(|| id.clone());
        let mut store = ctx.open_store()?;
        let events = store.add(selection.into_cart_line(id, title));
        ctx.output.events(&events);
    }
    Ok(())
}
