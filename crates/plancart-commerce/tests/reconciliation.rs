//! Price reconciliation against a catalog double.

use async_trait::async_trait;
use plancart_cache::{Cache, MemoryStore};
use plancart_commerce::prelude::*;
use std::collections::HashMap;
use std::sync::Mutex;

/// Catalog serving fixed records and remembering what it was asked.
#[derive(Default)]
struct StaticCatalog {
    records: Mutex<HashMap<ProductId, ProductRecord>>,
    requests: Mutex<Vec<Vec<ProductId>>>,
}

impl StaticCatalog {
    fn with(records: Vec<ProductRecord>) -> Self {
        let catalog = Self::default();
        for record in records {
            catalog.publish(record);
        }
        catalog
    }

    fn publish(&self, record: ProductRecord) {
        self.records.lock().unwrap().insert(record.id.clone(), record);
    }

    fn requests(&self) -> Vec<Vec<ProductId>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogService for StaticCatalog {
    async fn fetch_products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<ProductRecord>, CommerceError> {
        self.requests.lock().unwrap().push(ids.to_vec());
        let records = self.records.lock().unwrap();
        Ok(ids.iter().filter_map(|id| records.get(id).cloned()).collect())
    }
}

struct DownCatalog;

#[async_trait]
impl CatalogService for DownCatalog {
    async fn fetch_products_by_ids(
        &self,
        _ids: &[ProductId],
    ) -> Result<Vec<ProductRecord>, CommerceError> {
        Err(CommerceError::CatalogUnavailable("503".to_string()))
    }
}

fn casa() -> CartLine {
    CartLine::new("P1", "Casa", Money::new(100_000))
        .with_addons(vec![
            Addon::new(AddonKind::Electrical, Money::new(20_000)),
            Addon::new(AddonKind::Hydraulic, Money::new(15_000)),
        ])
        .with_selected([AddonKind::Electrical, AddonKind::Hydraulic])
}

fn casa_record() -> ProductRecord {
    ProductRecord::new("P1", Money::new(100_000))
        .with_addon("electrical", Money::new(20_000))
        .with_addon("hydraulic", Money::new(15_000))
}

#[tokio::test]
async fn test_withdrawn_addon_is_dropped() {
    let mut store = CartStore::open(CartStorage::in_memory(), Currency::BRL);
    store.add(casa());

    let catalog = StaticCatalog::with(vec![
        ProductRecord::new("P1", Money::new(100_000)).with_addon("electrical", Money::new(20_000)),
    ]);
    let events = store.reconcile(&catalog).await;

    assert_eq!(
        events,
        vec![CartEvent::PricesUpdated {
            lines: vec![ProductId::new("P1")]
        }]
    );
    let line = store.get(&ProductId::new("P1")).unwrap();
    assert_eq!(
        line.selected_addon_ids.iter().collect::<Vec<_>>(),
        vec![&AddonKind::Electrical]
    );
    assert_eq!(line.current_price, Money::new(120_000));
}

#[tokio::test]
async fn test_single_notification_for_many_lines() {
    let mut store = CartStore::open(CartStorage::in_memory(), Currency::BRL);
    store.add(casa());
    store.add(CartLine::new("P2", "Sobrado", Money::new(200_000)));
    store.add(CartLine::new("P3", "Chalé", Money::new(80_000)));

    let catalog = StaticCatalog::with(vec![
        ProductRecord::new("P1", Money::new(110_000))
            .with_addon("electrical", Money::new(20_000))
            .with_addon("hydraulic", Money::new(15_000)),
        ProductRecord::new("P2", Money::new(210_000)),
        ProductRecord::new("P3", Money::new(80_000)),
    ]);
    let events = store.reconcile(&catalog).await;

    assert_eq!(events.len(), 1);
    match &events[0] {
        CartEvent::PricesUpdated { lines } => {
            assert_eq!(lines, &vec![ProductId::new("P1"), ProductId::new("P2")]);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(store.total(), Money::new(145_000 + 210_000 + 80_000));
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let cache = Cache::new(MemoryStore::new());
    let mut store = CartStore::open(CartStorage::new(cache.clone()), Currency::BRL);
    store.add(casa());

    let catalog = StaticCatalog::with(vec![
        ProductRecord::new("P1", Money::new(90_000))
            .with_addon("electrical", Money::new(20_000))
            .with_code("CT-1"),
    ]);
    assert_eq!(store.reconcile(&catalog).await.len(), 1);
    let after_first = store.state().clone();
    let saved_first = cache.get_raw(CART_STORAGE_KEY).unwrap();

    assert!(store.reconcile(&catalog).await.is_empty());
    assert_eq!(store.state(), &after_first);
    assert_eq!(cache.get_raw(CART_STORAGE_KEY).unwrap(), saved_first);
}

#[tokio::test]
async fn test_unchanged_prices_do_not_notify() {
    let mut store = CartStore::open(CartStorage::in_memory(), Currency::BRL);
    store.add(casa());

    let catalog = StaticCatalog::with(vec![casa_record()]);
    assert!(store.reconcile(&catalog).await.is_empty());
}

#[tokio::test]
async fn test_missing_product_left_untouched() {
    let mut store = CartStore::open(CartStorage::in_memory(), Currency::BRL);
    store.add(casa());
    store.add(CartLine::new("GONE", "Deleted plan", Money::new(50_000)).with_code("OLD"));
    let gone_before = store.get(&ProductId::new("GONE")).cloned();

    let catalog = StaticCatalog::with(vec![casa_record()]);
    store.reconcile(&catalog).await;

    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&ProductId::new("GONE")).cloned(), gone_before);
}

#[tokio::test]
async fn test_fetch_failure_keeps_state() {
    let mut store = CartStore::open(CartStorage::in_memory(), Currency::BRL);
    store.add(casa());
    let before = store.state().clone();

    assert!(store.reconcile(&DownCatalog).await.is_empty());
    assert_eq!(store.state(), &before);
}

#[tokio::test]
async fn test_only_valid_ids_are_requested() {
    let mut store = CartStore::open(CartStorage::in_memory(), Currency::BRL);
    store.add(casa());
    store.add(CartLine::new("../etc/passwd", "Tampered", Money::new(1)));

    let catalog = StaticCatalog::with(vec![casa_record()]);
    store.reconcile(&catalog).await;

    assert_eq!(catalog.requests(), vec![vec![ProductId::new("P1")]]);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_empty_cart_skips_catalog() {
    let mut store = CartStore::open(CartStorage::in_memory(), Currency::BRL);
    let catalog = StaticCatalog::default();

    assert!(store.reconcile(&catalog).await.is_empty());
    assert!(catalog.requests().is_empty());
}

#[tokio::test]
async fn test_mutations_during_fetch_are_kept() {
    let mut store = CartStore::open(CartStorage::in_memory(), Currency::BRL);
    store.add(casa());
    let p1 = ProductId::new("P1");

    let catalog = StaticCatalog::with(vec![ProductRecord::new("P1", Money::new(105_000))
        .with_addon("electrical", Money::new(22_000))
        .with_addon("hydraulic", Money::new(15_000))
        .with_addon("structural", Money::new(30_000))]);

    // Fetch against the cart as it was when shown...
    let ids = PriceReconciler::catalog_ids(store.state());
    let records = PriceReconciler::new(&catalog).fetch(&ids).await.unwrap();

    // ...while the customer keeps editing.
    store.remove_addon(&p1, AddonKind::Hydraulic);
    store.add(CartLine::new("P2", "Sobrado", Money::new(200_000)));

    let events = store.apply_catalog_records(records);
    assert_eq!(events.len(), 1);

    let line = store.get(&p1).unwrap();
    assert!(!line.is_selected(&AddonKind::Hydraulic));
    assert!(line.offers(&AddonKind::Structural));
    assert_eq!(line.current_price, Money::new(127_000));
    assert_eq!(store.get(&ProductId::new("P2")).unwrap().base_price, Money::new(200_000));
}

#[tokio::test]
async fn test_reconciled_state_is_persisted() {
    let storage = CartStorage::in_memory();
    let mut store = CartStore::open(storage.clone(), Currency::BRL);
    store.add(casa());

    let catalog = StaticCatalog::with(vec![casa_record().with_upsell("P5")]);
    store.reconcile(&catalog).await;

    let saved = storage.load(Currency::BRL);
    assert_eq!(
        saved.get(&ProductId::new("P1")).unwrap().recommended_upsell_id,
        Some(ProductId::new("P5"))
    );
}

#[tokio::test]
async fn test_price_change_published_later() {
    let mut store = CartStore::open(CartStorage::in_memory(), Currency::BRL);
    store.add(casa());
    let catalog = StaticCatalog::with(vec![casa_record()]);

    assert!(store.reconcile(&catalog).await.is_empty());

    catalog.publish(
        ProductRecord::new("P1", Money::new(100_000))
            .with_addon("electrical", Money::new(25_000))
            .with_addon("hydraulic", Money::new(15_000)),
    );
    assert_eq!(store.reconcile(&catalog).await.len(), 1);
    assert_eq!(store.total(), Money::new(140_000));
}

#[tokio::test]
async fn test_unusable_record_does_not_block_batch() {
    let mut store = CartStore::open(CartStorage::in_memory(), Currency::BRL);
    store.add(casa());
    store.add(CartLine::new("P2", "Sobrado", Money::new(200_000)));

    let mut broken = casa_record();
    broken.base_price = serde_json::json!(1e30);
    let catalog = StaticCatalog::with(vec![broken, ProductRecord::new("P2", Money::new(210_000))]);

    let events = store.reconcile(&catalog).await;

    assert_eq!(
        events,
        vec![CartEvent::PricesUpdated {
            lines: vec![ProductId::new("P2")]
        }]
    );
    assert_eq!(store.get(&ProductId::new("P1")).unwrap().current_price, Money::new(135_000));
    assert_eq!(store.total(), Money::new(345_000));
}
