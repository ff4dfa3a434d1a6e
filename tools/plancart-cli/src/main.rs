//! PlanCart CLI - inspect and edit a storefront cart from the terminal.
//!
//! Commands:
//! - `plancart show` - List cart lines and the total
//! - `plancart add` - Add or replace a line from a JSON file
//! - `plancart remove` - Remove a line
//! - `plancart addon` - Select or deselect an add-on on a line
//! - `plancart clear` - Empty the cart
//! - `plancart quote` - Price an add-on selection with the bundle discount
//! - `plancart reconcile` - Refresh prices against the catalog

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddArgs, AddonArgs, QuoteArgs, RemoveArgs};

/// PlanCart CLI - inspect and edit a storefront cart
#[derive(Parser)]
#[command(name = "plancart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List cart lines and the total
    Show,

    /// Add a line, or replace the line with the same id
    Add(AddArgs),

    /// Remove a line
    Remove(RemoveArgs),

    /// Select or deselect an add-on
    Addon(AddonArgs),

    /// Empty the cart
    Clear,

    /// Price an add-on selection
    Quote(QuoteArgs),

    /// Refresh prices against the catalog
    Reconcile,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Show => commands::cart::show(&ctx),
        Commands::Add(args) => commands::cart::add(args, &ctx),
        Commands::Remove(args) => commands::cart::remove(args, &ctx),
        Commands::Addon(args) => commands::addon::run(args, &ctx),
        Commands::Clear => commands::cart::clear(&ctx),
        Commands::Quote(args) => commands::quote::run(args, &ctx),
        Commands::Reconcile => commands::reconcile::run(&ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
