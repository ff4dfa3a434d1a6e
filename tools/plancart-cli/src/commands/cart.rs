//! Cart listing and line commands.

use std::io::Read;

use anyhow::{Context as _, Result};
use plancart_commerce::cart::{CartLine, CartStore};
use plancart_commerce::{Money, ProductId};
use serde::Serialize;

use super::{AddArgs, RemoveArgs};
use crate::context::Context;

/// Cart as printed by `show --json`.
#[derive(Serialize)]
struct CartSummary<'a> {
    lines: &'a [CartLine],
    total: Money,
    formatted_total: String,
}

/// List cart lines and the total.
pub fn show(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    print_cart(&store, ctx);
    Ok(())
}

pub(crate) fn print_cart(store: &CartStore, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&CartSummary {
            lines: store.lines(),
            total: store.total(),
            formatted_total: store.formatted_total(),
        });
        return;
    }

    if store.is_empty() {
        ctx.output.info("Your cart is empty.");
        return;
    }

    ctx.output.header(&format!("Cart ({} item(s))", store.len()));
    for line in store.lines() {
        ctx.output.cart_line(line, store.currency());
    }
    println!();
    ctx.output.kv("total", &store.formatted_total());

    let upsells: Vec<&ProductId> = store
        .lines()
        .iter()
        .filter_map(|l| l.recommended_upsell_id.as_ref())
        .filter(|id| store.get(id).is_none())
        .collect();
    if !upsells.is_empty() {
        ctx.output.header("You may also like");
        for id in upsells {
            ctx.output.list_item(id.as_str());
        }
    }
}

/// Add a line from a JSON file, replacing any line with the same id.
pub fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let line = read_line(&args.file, ctx)?;
    if !line.id.is_catalog_id() {
        ctx.output.warn(&format!(
            "'{}' is not a catalog id; its price will not be reconciled",
            line.id
        ));
    }

    let mut store = ctx.open_store()?;
    let events = store.add(line);
    ctx.output.events(&events);
    Ok(())
}

fn read_line(file: &str, ctx: &Context) -> Result<CartLine> {
    let content = if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read cart line from stdin")?;
        buf
    } else {
        let path = ctx.resolve_path(file);
        ctx.output.debug(&format!("Reading {}", path.display()));
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    serde_json::from_str(&content).with_context(|| format!("Invalid cart line in {}", file))
}

/// Remove a line.
pub fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let events = store.remove(&ProductId::new(args.id));
    ctx.output.events(&events);
    Ok(())
}

/// Empty the cart.
pub fn clear(ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let events = store.clear();
    ctx.output.events(&events);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_line(dir: &std::path::Path, name: &str, json: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, json).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_add_from_file_reprices() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::in_dir(dir.path());
        let file = write_line(
            dir.path(),
            "line.json",
            r#"{
                "id": "P1",
                "title": "Casa Térrea",
                "base_price": 100000,
                "selected_addon_ids": ["electrical"],
                "available_addons": [{"id": "electrical", "price": 20000}]
            }"#,
        );

        add(AddArgs { file }, &ctx).unwrap();

        let store = ctx.open_store().unwrap();
        let line = store.get(&ProductId::new("P1")).unwrap();
        assert_eq!(line.current_price, Money::new(120_000));
        assert_eq!(line.formatted_price, "R$ 1.200,00");
    }

    #[test]
    fn test_add_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::in_dir(dir.path());
        let file = write_line(dir.path(), "bad.json", "{not json");

        assert!(add(AddArgs { file }, &ctx).is_err());
        assert!(ctx.open_store().unwrap().is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::in_dir(dir.path());
        {
            let mut store = ctx.open_store().unwrap();
            store.add(CartLine::new("P1", "Casa", Money::new(100_000)));
            store.add(CartLine::new("P2", "Sobrado", Money::new(150_000)));
        }

        remove(RemoveArgs { id: "P1".into() }, &ctx).unwrap();
        let store = ctx.open_store().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.total(), Money::new(150_000));

        clear(&ctx).unwrap();
        assert!(ctx.open_store().unwrap().is_empty());
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::in_dir(dir.path());
        assert!(remove(RemoveArgs { id: "nope".into() }, &ctx).is_ok());
    }
}
