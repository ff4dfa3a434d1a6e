//! Add-on selection on cart lines.

use anyhow::{bail, Result};
use plancart_commerce::addon::AddonKind;
use plancart_commerce::ProductId;

use super::{AddonArgs, AddonCommand};
use crate::context::Context;

/// Run the addon command.
pub fn run(args: AddonArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;

    let events = match args.command {
        AddonCommand::Add { line_id, addon } => {
            let (line_id, kind) = resolve(&line_id, &addon)?;
            if let Some(line) = store.get(&line_id) {
                if !line.offers(&kind) {
                    ctx.output
                        .warn(&format!("{} does not offer {}", line.title, kind.label()));
                }
            }
            store.add_addon(&line_id, kind)
        }
        AddonCommand::Remove { line_id, addon } => {
            let (line_id, kind) = resolve(&line_id, &addon)?;
            store.remove_addon(&line_id, kind)
        }
    };

    ctx.output.events(&events);
    if !events.is_empty() {
        ctx.output.kv("total", &store.formatted_total());
    }
    Ok(())
}

fn resolve(line_id: &str, addon: &str) -> Result<(ProductId, AddonKind)> {
    let kind = AddonKind::parse(addon);
    if !kind.is_known() {
        let known: Vec<&str> = AddonKind::KNOWN.iter().map(AddonKind::as_str).collect();
        bail!("Unknown add-on '{}' (expected one of: {})", addon, known.join(", "));
    }
    Ok((ProductId::new(line_id), kind))
}
