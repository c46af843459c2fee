//! In-memory commerce platform double for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use order_desk_core::{CustomerId, Money, OrderId, Phone, ProductId, VariationId};

use super::{
    AttributeValue, CatalogProduct, CatalogVariation, Commerce, CommerceError, OrderDraft,
    PlacedOrder, ProductKind, PurchasableItem,
};

/// An in-memory stand-in for the commerce platform.
///
/// Holds a small catalog plus customer/order fixtures, and records every
/// committed draft so tests can assert exactly what would persist.
#[derive(Default)]
pub struct FakeCommerce {
    products: Vec<CatalogProduct>,
    variations: HashMap<i64, Vec<CatalogVariation>>,
    customers: HashMap<String, CustomerId>,
    prior_orders: HashMap<String, DateTime<Utc>>,
    fail_place: bool,
    fail_history: bool,
    next_order_id: AtomicI64,
    placed: Mutex<Vec<OrderDraft>>,
}

impl FakeCommerce {
    /// A small catalog: a variable tee (id 5, variations 12/13) and a simple
    /// mug (id 9).
    pub fn with_tee_catalog() -> Self {
        let mut fake = Self {
            next_order_id: AtomicI64::new(1001),
            ..Self::default()
        };
        fake.add_product(product(5, "Classic Tee", ProductKind::Variable, "100", true));
        fake.add_variations(
            5,
            vec![
                variation(12, "110", "m", Some("Medium")),
                variation(13, "120", "l", Some("Large")),
            ],
        );
        fake.add_product(product(9, "Simple Mug", ProductKind::Simple, "50", true));
        fake
    }

    pub fn add_product(&mut self, product: CatalogProduct) {
        self.products.push(product);
    }

    pub fn add_variations(&mut self, product_id: i64, variations: Vec<CatalogVariation>) {
        self.variations.insert(product_id, variations);
    }

    pub fn add_customer(&mut self, phone: &str, id: i64) {
        self.customers.insert(phone.to_string(), CustomerId::new(id));
    }

    pub fn set_prior_order(&mut self, phone: &str, placed_at: DateTime<Utc>) {
        self.prior_orders.insert(phone.to_string(), placed_at);
    }

    pub fn fail_place_order(&mut self) {
        self.fail_place = true;
    }

    pub fn fail_order_history(&mut self) {
        self.fail_history = true;
    }

    /// Drafts committed so far; empty means nothing would persist.
    pub fn placed_orders(&self) -> Vec<OrderDraft> {
        self.placed.lock().expect("lock").clone()
    }
}

/// Build a catalog product fixture.
pub fn product(
    id: i64,
    name: &str,
    kind: ProductKind,
    price: &str,
    purchasable: bool,
) -> CatalogProduct {
    CatalogProduct {
        id: ProductId::new(id),
        name: name.to_string(),
        kind,
        price: Money::parse(price).expect("price fixture"),
        image: None,
        purchasable,
        variations: Vec::new(),
    }
}

/// Build a purchasable in-stock variation fixture with one size attribute.
pub fn variation(id: i64, price: &str, value: &str, term: Option<&str>) -> CatalogVariation {
    CatalogVariation {
        id: VariationId::new(id),
        price: Money::parse(price).expect("price fixture"),
        sku: None,
        image: None,
        in_stock: true,
        purchasable: true,
        attributes: vec![AttributeValue {
            attribute: "size".to_string(),
            value: value.to_string(),
            term: term.map(str::to_string),
        }],
    }
}

#[async_trait]
impl Commerce for FakeCommerce {
    async fn search_products(
        &self,
        term: &str,
        limit: u32,
    ) -> Result<Vec<CatalogProduct>, CommerceError> {
        let needle = term.to_lowercase();
        let mut matches: Vec<CatalogProduct> = self
            .products
            .iter()
            .filter(|p| p.purchasable && p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.truncate(limit as usize);
        for product in &mut matches {
            if product.kind == ProductKind::Variable {
                product.variations = self
                    .variations
                    .get(&product.id.as_i64())
                    .cloned()
                    .unwrap_or_default();
            }
        }
        Ok(matches)
    }

    async fn product(&self, id: ProductId) -> Result<Option<CatalogProduct>, CommerceError> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    async fn variations(&self, id: ProductId) -> Result<Vec<CatalogVariation>, CommerceError> {
        Ok(self
            .variations
            .get(&id.as_i64())
            .map(|vs| vs.iter().filter(|v| v.purchasable).cloned().collect())
            .unwrap_or_default())
    }

    async fn customer_by_phone(
        &self,
        phone: &Phone,
    ) -> Result<Option<CustomerId>, CommerceError> {
        Ok(self.customers.get(phone.as_str()).copied())
    }

    async fn latest_order_placed_at(
        &self,
        phone: &Phone,
    ) -> Result<Option<DateTime<Utc>>, CommerceError> {
        if self.fail_history {
            return Err(CommerceError::Platform {
                status: 500,
                message: "order history unavailable".to_string(),
            });
        }
        Ok(self.prior_orders.get(phone.as_str()).copied())
    }

    async fn resolve_item(
        &self,
        product_id: ProductId,
        variation_id: Option<VariationId>,
    ) -> Result<Option<PurchasableItem>, CommerceError> {
        let Some(parent) = self.products.iter().find(|p| p.id == product_id) else {
            return Ok(None);
        };

        if let Some(vid) = variation_id {
            let found = self
                .variations
                .get(&product_id.as_i64())
                .and_then(|vs| vs.iter().find(|v| v.id == vid && v.purchasable));
            return Ok(found.map(|v| PurchasableItem {
                product_id,
                variation_id: Some(v.id),
                name: format!("{} - {}", parent.name, v.label()),
                unit_price: v.price,
            }));
        }

        if !parent.purchasable {
            return Ok(None);
        }
        Ok(Some(PurchasableItem {
            product_id,
            variation_id: None,
            name: parent.name.clone(),
            unit_price: parent.price,
        }))
    }

    async fn place_order(&self, draft: OrderDraft) -> Result<PlacedOrder, CommerceError> {
        if self.fail_place {
            return Err(CommerceError::Platform {
                status: 500,
                message: "order store unavailable".to_string(),
            });
        }

        let id = self.next_order_id.fetch_add(1, Ordering::SeqCst);
        let total = draft.total;
        self.placed.lock().expect("lock").push(draft);
        Ok(PlacedOrder {
            id: OrderId::new(id),
            total,
            placed_at: Utc::now(),
        })
    }
}
