//! CLI command implementations.

pub mod addon;
pub mod cart;
pub mod quote;
pub mod reconcile;

use clap::{Args, Subcommand};
use plancart_commerce::addon::{Addon, AddonKind};
use plancart_commerce::Money;

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// JSON file holding the cart line (`-` reads stdin).
    pub file: String,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Product id of the line.
    pub id: String,
}

/// Arguments for the addon command.
#[derive(Args)]
pub struct AddonArgs {
    #[command(subcommand)]
    pub command: AddonCommand,
}

#[derive(Subcommand)]
pub enum AddonCommand {
    /// Select an add-on on a line.
    Add {
        /// Product id of the line.
        line_id: String,
        /// Add-on kind (electrical, hydraulic, structural, sanitary).
        addon: String,
    },
    /// Deselect an add-on on a line.
    Remove {
        /// Product id of the line.
        line_id: String,
        /// Add-on kind.
        addon: String,
    },
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Price of the plan alone.
    #[arg(long)]
    pub base: f64,

    /// Optional add-on offered with the plan, as `kind=price`.
    #[arg(long = "addon", value_parser = parse_addon_offer)]
    pub addons: Vec<Addon>,

    /// Add-on to select.
    #[arg(long = "select")]
    pub selected: Vec<String>,

    /// Select every offered add-on.
    #[arg(long, conflicts_with = "selected")]
    pub all: bool,

    /// Put the quoted selection in the cart under this product id.
    #[arg(long)]
    pub add_to_cart: Option<String>,

    /// Title of the line created by --add-to-cart.
    #[arg(long, requires = "add_to_cart")]
    pub title: Option<String>,
}

/// Parse `kind=price`.
fn parse_addon_offer(s: &str) -> Result<Addon, String> {
    let (kind, price) = s
        .split_once('=')
        .ok_or_else(|| format!("expected kind=price, got '{}'", s))?;
    let price: f64 = price
        .trim()
        .parse()
        .map_err(|_| format!("invalid price '{}'", price))?;
    Ok(Addon::new(AddonKind::parse(kind), Money::from_decimal(price)))
}
