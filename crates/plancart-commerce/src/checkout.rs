//! Handing the cart over to payment.
//!
//! Checkout is the one cart operation that fails loudly: the caller gets an
//! error it can show, and the cart is kept so the customer can retry. Lead
//! capture runs alongside the payment call and never blocks it.

use crate::addon::AddonKind;
use crate::cart::{CartLine, CartStore};
use crate::error::CommerceError;
use crate::ids::{CheckoutSessionId, ProductId};
use crate::money::Money;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Who is buying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Contact {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            phone: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// A cart line as the payment provider sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutLine {
    pub id: ProductId,
    pub title: String,
    /// Plan price including selected add-ons.
    pub unit_price: Money,
    pub addons: Vec<AddonKind>,
}

impl From<&CartLine> for CheckoutLine {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.clone(),
            title: line.title.clone(),
            unit_price: line.current_price,
            addons: line.selected_addons().map(|a| a.id.clone()).collect(),
        }
    }
}

/// Everything needed to open a payment session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutRequest {
    pub email: String,
    pub lines: Vec<CheckoutLine>,
}

/// Where to send the customer to pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRedirect {
    #[serde(default)]
    pub session_id: Option<CheckoutSessionId>,
    pub url: String,
}

/// Contact details plus the cart, for the sales pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lead {
    pub contact: Contact,
    pub lines: Vec<CartLine>,
    pub total: Money,
}

/// Opens payment sessions.
#[async_trait]
pub trait CheckoutService: Send + Sync {
    async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutRedirect, CommerceError>;
}

/// Records leads for the sales pipeline.
#[async_trait]
pub trait LeadCapture: Send + Sync {
    async fn record(&self, lead: &Lead) -> Result<(), CommerceError>;
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split('.')
            .filter(|part| !part.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Open a payment session for the cart.
///
/// On success the cart is cleared and the redirect returned. On failure the
/// cart is left exactly as it was.
pub async fn checkout(
    store: &mut CartStore,
    contact: &Contact,
    payments: &dyn CheckoutService,
    leads: &dyn LeadCapture,
) -> Result<CheckoutRedirect, CommerceError> {
    if store.is_empty() {
        return Err(CommerceError::EmptyCart);
    }
    if !is_valid_email(&contact.email) {
        return Err(CommerceError::InvalidEmail(contact.email.clone()));
    }

    let request = CheckoutRequest {
        email: contact.email.trim().to_string(),
        lines: store.lines().iter().map(CheckoutLine::from).collect(),
    };
    let lead = Lead {
        contact: contact.clone(),
        lines: store.lines().to_vec(),
        total: store.total(),
    };

    let (lead_result, session) =
        futures::join!(leads.record(&lead), payments.create_session(&request));

    if let Err(e) = lead_result {
        tracing::warn!(error = %e, "lead capture failed");
    }

    match session {
        Ok(redirect) => {
            tracing::info!(lines = request.lines.len(), "checkout session created");
            store.clear();
            Ok(redirect)
        }
        Err(e) => {
            tracing::warn!(error = %e, "checkout session failed; cart kept");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("  ana.souza@obra.com.br "));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("ana"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@localhost"));
        assert!(!is_valid_email("ana@@example.com"));
        assert!(!is_valid_email("ana@.example.com"));
        assert!(!is_valid_email("ana maria@example.com"));
    }

    #[test]
    fn test_checkout_line_from_cart_line() {
        use crate::addon::Addon;
        use crate::money::Currency;

        let mut line = CartLine::new("P1", "Casa", Money::new(100_000))
            .with_addons(vec![Addon::new(AddonKind::Electrical, Money::new(20_000))])
            .with_selected([AddonKind::Electrical]);
        line.reprice(Currency::BRL);

        let checkout_line = CheckoutLine::from(&line);
        assert_eq!(checkout_line.unit_price, Money::new(120_000));
        assert_eq!(checkout_line.addons, vec![AddonKind::Electrical]);
    }
}
