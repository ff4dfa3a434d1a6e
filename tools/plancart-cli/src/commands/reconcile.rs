//! Refresh cart prices against the catalog.

use anyhow::Result;
use plancart_commerce::reconcile::PriceReconciler;

use super::cart::print_cart;
use crate::context::Context;

/// Run the reconcile command.
///
/// An unreachable catalog is reported but is not an error; the cart is
/// left as it was.
pub async fn run(ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let catalog = ctx.catalog();

    let ids = PriceReconciler::catalog_ids(store.state());
    ctx.output.debug(&format!(
        "Fetching {} product(s) from {}",
        ids.len(),
        ctx.config.catalog.base_url
    ));

    match PriceReconciler::new(&catalog).fetch(&ids).await {
        Some(records) => {
            let events = store.apply_catalog_records(records);
            if events.is_empty() {
                ctx.output.info("Prices are up to date.");
            } else if !ctx.output.is_json() {
                ctx.output.events(&events);
            }
        }
        None => ctx
            .output
            .warn("Catalog unavailable; showing saved prices."),
    }

    print_cart(&store, ctx);
    Ok(())
}
