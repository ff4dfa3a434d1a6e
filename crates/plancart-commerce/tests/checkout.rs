//! Checkout orchestration with scripted collaborators.

use async_trait::async_trait;
use plancart_commerce::prelude::*;
use std::sync::Mutex;

#[derive(Default)]
struct ScriptedPayments {
    fail_with: Option<String>,
    requests: Mutex<Vec<CheckoutRequest>>,
}

impl ScriptedPayments {
    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CheckoutService for ScriptedPayments {
    async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutRedirect, CommerceError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.fail_with {
            Some(message) => Err(CommerceError::PaymentFailed(message.clone())),
            None => Ok(CheckoutRedirect {
                session_id: Some(CheckoutSessionId::new("cs_test_1")),
                url: "https://pay.example.com/cs_test_1".to_string(),
            }),
        }
    }
}

#[derive(Default)]
struct RecordingLeads {
    fail: bool,
    leads: Mutex<Vec<Lead>>,
}

#[async_trait]
impl LeadCapture for RecordingLeads {
    async fn record(&self, lead: &Lead) -> Result<(), CommerceError> {
        self.leads.lock().unwrap().push(lead.clone());
        if self.fail {
            Err(CommerceError::LeadCaptureFailed("crm timeout".to_string()))
        } else {
            Ok(())
        }
    }
}

fn filled_store(storage: CartStorage) -> CartStore {
    let mut store = CartStore::open(storage, Currency::BRL);
    store.add(
        CartLine::new("P1", "Casa", Money::new(100_000))
            .with_addons(vec![Addon::new(AddonKind::Electrical, Money::new(20_000))])
            .with_selected([AddonKind::Electrical]),
    );
    store.add(CartLine::new("P2", "Sobrado", Money::new(250_000)));
    store
}

#[tokio::test]
async fn test_successful_checkout_clears_cart() {
    let storage = CartStorage::in_memory();
    let mut store = filled_store(storage.clone());
    let payments = ScriptedPayments::default();
    let leads = RecordingLeads::default();
    let contact = Contact::new("ana@example.com").with_name("Ana");

    let redirect = checkout(&mut store, &contact, &payments, &leads).await.unwrap();

    assert_eq!(redirect.url, "https://pay.example.com/cs_test_1");
    assert!(store.is_empty());
    assert!(storage.load(Currency::BRL).is_empty());

    let requests = payments.requests.lock().unwrap();
    assert_eq!(requests[0].email, "ana@example.com");
    assert_eq!(requests[0].lines.len(), 2);
    assert_eq!(requests[0].lines[0].unit_price, Money::new(120_000));
    assert_eq!(requests[0].lines[0].addons, vec![AddonKind::Electrical]);

    let leads = leads.leads.lock().unwrap();
    assert_eq!(leads[0].total, Money::new(370_000));
    assert_eq!(leads[0].contact.name.as_deref(), Some("Ana"));
}

#[tokio::test]
async fn test_payment_failure_preserves_cart() {
    let storage = CartStorage::in_memory();
    let mut store = filled_store(storage.clone());
    let before = store.state().clone();
    let payments = ScriptedPayments::failing("card network down");

    let err = checkout(
        &mut store,
        &Contact::new("ana@example.com"),
        &payments,
        &RecordingLeads::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CommerceError::PaymentFailed(_)));
    assert_eq!(store.state(), &before);
    assert_eq!(storage.load(Currency::BRL), before);
}

#[tokio::test]
async fn test_lead_failure_does_not_block() {
    let mut store = filled_store(CartStorage::in_memory());
    let leads = RecordingLeads {
        fail: true,
        ..RecordingLeads::default()
    };

    let result = checkout(
        &mut store,
        &Contact::new("ana@example.com"),
        &ScriptedPayments::default(),
        &leads,
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(leads.leads.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_before_contacting_services() {
    let payments = ScriptedPayments::default();
    let leads = RecordingLeads::default();

    let mut empty = CartStore::open(CartStorage::in_memory(), Currency::BRL);
    let err = checkout(&mut empty, &Contact::new("ana@example.com"), &payments, &leads)
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::EmptyCart));

    let mut store = filled_store(CartStorage::in_memory());
    let err = checkout(&mut store, &Contact::new("not-an-email"), &payments, &leads)
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::InvalidEmail(_)));
    assert_eq!(store.len(), 2);

    assert_eq!(payments.calls(), 0);
    assert!(leads.leads.lock().unwrap().is_empty());
}
