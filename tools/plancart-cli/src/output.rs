//! Output formatting for the CLI.

use console::style;
use plancart_commerce::bundle::{AddonSelection, BundleQuote, SelectionItem};
use plancart_commerce::cart::{CartEvent, CartLine};
use plancart_commerce::Currency;
use serde::Serialize;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Report the events a cart change produced.
    ///
    /// An empty list means the command changed nothing.
    pub fn events(&self, events: &[CartEvent]) {
        if self.json {
            self.json(&events);
            return;
        }
        if events.is_empty() {
            self.info("Nothing changed");
            return;
        }
        for event in events {
            self.success(&event.to_string());
        }
    }

    /// Print one cart line with its selected add-ons.
    pub fn cart_line(&self, line: &CartLine, currency: Currency) {
        if self.json {
            return;
        }
        let code = line
            .product_code
            .as_deref()
            .map(|code| format!(" {}", style(format!("[{}]", code)).dim()))
            .unwrap_or_default();
        println!(
            "  {} {}{}  {}",
            style(line.id.as_str()).cyan(),
            line.title,
            code,
            style(&line.formatted_price).bold()
        );
        self.kv("plan", &currency.format(line.base_price));
        for addon in &line.available_addons {
            let mark = if line.is_selected(&addon.id) {
                style("[x]").green()
            } else {
                style("[ ]").dim()
            };
            println!(
                "    {} {} {}",
                mark,
                addon.label,
                style(currency.format(addon.price)).dim()
            );
        }
    }

    /// Print an add-on selection and its price breakdown.
    pub fn quote(&self, selection: &AddonSelection, quote: &BundleQuote, currency: Currency) {
        if self.json {
            self.json(quote);
            return;
        }
        println!(
            "  {} Plan {}",
            style("[x]").green(),
            style(currency.format(selection.base_price())).dim()
        );
        for addon in selection.optional_addons() {
            let mark = if selection.is_selected(&SelectionItem::Addon(addon.id.clone())) {
                style("[x]").green()
            } else {
                style("[ ]").dim()
            };
            println!(
                "  {} {} {}",
                mark,
                addon.label,
                style(currency.format(addon.price)).dim()
            );
        }
        println!();
        self.kv("subtotal", &currency.format(quote.subtotal));
        if quote.complete_bundle {
            self.kv(
                "bundle discount",
                &style(format!("-{}", currency.format(quote.discount)))
                    .green()
                    .to_string(),
            );
        }
        self.kv("total", &style(currency.format(quote.total)).bold().to_string());
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}
