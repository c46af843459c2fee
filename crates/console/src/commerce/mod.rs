//! Commerce platform client.
//!
//! # Architecture
//!
//! - The platform is source of truth for products, variations, customers and
//!   orders - NO local sync, direct API calls
//! - The console talks to it through the [`Commerce`] trait so the order
//!   workflow can be exercised against an in-memory double in tests
//! - The production implementation is [`RestCommerce`], a JSON client over
//!   the platform's REST API with in-memory caching via `moka` for catalog
//!   reads (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use order_desk_console::commerce::{Commerce, RestCommerce};
//!
//! let commerce = RestCommerce::new(&config.commerce);
//!
//! // Search the catalog
//! let hits = commerce.search_products("shirt", 15).await?;
//!
//! // Resolve a line to a purchasable item (variation wins over parent)
//! let item = commerce.resolve_item(product_id, Some(variation_id)).await?;
//! ```

#[cfg(test)]
pub mod fake;
mod rest;
pub mod types;

pub use rest::RestCommerce;
pub use types::*;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use order_desk_core::{CustomerId, Phone, ProductId, VariationId};

/// Errors that can occur when interacting with the commerce platform.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform returned a non-success status.
    #[error("platform returned {status}: {message}")]
    Platform { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The platform returned a price the client could not interpret.
    #[error("unreadable price from platform: {0}")]
    BadPrice(String),

    /// Rate limited by the platform.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// Contract with the external commerce platform.
///
/// Each method maps to one collaborator operation the console consumes. The
/// platform owns all durable state; the console never persists anything of
/// its own.
#[async_trait]
pub trait Commerce: Send + Sync {
    /// Case-insensitive title search over published, purchasable products.
    ///
    /// Variable products carry their purchasable variations. A term with no
    /// matches yields an empty list, not an error.
    async fn search_products(
        &self,
        term: &str,
        limit: u32,
    ) -> Result<Vec<CatalogProduct>, CommerceError>;

    /// Look up a single product by id.
    async fn product(&self, id: ProductId) -> Result<Option<CatalogProduct>, CommerceError>;

    /// Purchasable variations of a variable product, in platform order.
    async fn variations(&self, id: ProductId) -> Result<Vec<CatalogVariation>, CommerceError>;

    /// Exact-match lookup of an existing customer by normalized phone.
    async fn customer_by_phone(&self, phone: &Phone)
    -> Result<Option<CustomerId>, CommerceError>;

    /// When the most recent prior order for this phone was placed, if any.
    async fn latest_order_placed_at(
        &self,
        phone: &Phone,
    ) -> Result<Option<DateTime<Utc>>, CommerceError>;

    /// Resolve a submitted line to a concrete purchasable item.
    ///
    /// A variation id takes precedence over the parent product id. Returns
    /// `None` when the target does not exist or is not purchasable; the
    /// caller decides whether that is fatal.
    async fn resolve_item(
        &self,
        product_id: ProductId,
        variation_id: Option<VariationId>,
    ) -> Result<Option<PurchasableItem>, CommerceError>;

    /// Commit a fully assembled order draft in a single step.
    ///
    /// The draft carries everything the platform needs - lines, addresses,
    /// payment method, status, totals - so no partially populated order can
    /// ever exist on the platform.
    async fn place_order(&self, draft: OrderDraft) -> Result<PlacedOrder, CommerceError>;
}
