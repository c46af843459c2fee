//! Domain types exchanged with the commerce platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use order_desk_core::{CustomerId, Money, OrderId, ProductId, VariationId};

/// Separator used when composing a variation label from its attributes.
const LABEL_SEPARATOR: &str = " - ";

/// How a catalog product is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    /// One purchasable item.
    Simple,
    /// Sold through concrete variations (size/color combinations).
    Variable,
}

/// A catalog product as the platform reports it.
#[derive(Debug, Clone)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub kind: ProductKind,
    pub price: Money,
    pub image: Option<String>,
    pub purchasable: bool,
    /// Purchasable variations; only populated for variable products.
    pub variations: Vec<CatalogVariation>,
}

/// One distinguishing attribute value of a variation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValue {
    /// Attribute name (e.g. "size").
    pub attribute: String,
    /// Raw attribute value (often a slug, e.g. "navy-blue").
    pub value: String,
    /// Human-readable term for the value, when the platform defines one.
    pub term: Option<String>,
}

/// A concrete purchasable variation of a variable product.
#[derive(Debug, Clone)]
pub struct CatalogVariation {
    pub id: VariationId,
    pub price: Money,
    pub sku: Option<String>,
    pub image: Option<String>,
    pub in_stock: bool,
    pub purchasable: bool,
    pub attributes: Vec<AttributeValue>,
}

impl CatalogVariation {
    /// Compose the display label from the distinguishing attribute values.
    ///
    /// Joins the human-readable term of each non-empty value with `" - "`,
    /// falling back to the raw value when the platform has no term for it.
    #[must_use]
    pub fn label(&self) -> String {
        self.attributes
            .iter()
            .filter(|attr| !attr.value.is_empty())
            .map(|attr| attr.term.clone().unwrap_or_else(|| attr.value.clone()))
            .collect::<Vec<_>>()
            .join(LABEL_SEPARATOR)
    }
}

/// A resolved, purchasable order line target.
#[derive(Debug, Clone)]
pub struct PurchasableItem {
    pub product_id: ProductId,
    pub variation_id: Option<VariationId>,
    pub name: String,
    pub unit_price: Money,
}

/// Billing/shipping address attached to a desk order.
///
/// Desk orders always ship to the billing address, so one value serves both.
#[derive(Debug, Clone, Serialize)]
pub struct OrderAddress {
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub address_1: String,
    /// Landmark or area line.
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// One line of an order draft.
#[derive(Debug, Clone, Serialize)]
pub struct DraftLine {
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<VariationId>,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    /// `unit_price x quantity`, fixed at line-add time.
    pub subtotal: Money,
}

/// A fully assembled order, ready to commit in one step.
///
/// Built locally by the submission workflow and handed to
/// [`Commerce::place_order`](super::Commerce::place_order) only once complete;
/// nothing is written to the platform while it is being assembled.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDraft {
    /// Existing customer matched by phone; `None` places a guest order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    pub lines: Vec<DraftLine>,
    pub address: OrderAddress,
    pub payment_method: &'static str,
    pub payment_method_title: &'static str,
    /// Target status; desk orders go straight to processing.
    pub status: &'static str,
    /// Accumulated sum of line subtotals. Not recomputed at save time.
    pub total: Money,
    /// Provenance marker for reporting.
    pub created_via: &'static str,
    /// Note recorded on the order.
    pub note: &'static str,
    /// Advisory flag: a prior order exists for this phone outside the
    /// duplicate-submission cool-down. Does not affect status or pricing.
    pub repeat_customer: bool,
}

/// The committed order as the platform acknowledged it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub id: OrderId,
    pub total: Money,
    pub placed_at: DateTime<Utc>,
}
