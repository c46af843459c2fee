//! Commerce platform REST API client implementation.
//!
//! Plain JSON-over-HTTP with `reqwest`. Catalog reads (product and variation
//! lookups) are cached with `moka` (5-minute TTL); customer and order
//! operations always go to the platform.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use order_desk_core::{CustomerId, Money, OrderId, Phone, ProductId, VariationId};

use super::{
    AttributeValue, CatalogProduct, CatalogVariation, Commerce, CommerceError, OrderDraft,
    PlacedOrder, ProductKind, PurchasableItem,
};
use crate::config::CommerceApiConfig;

/// Catalog cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Product(i64),
    Variations(i64),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<CatalogProduct>),
    Variations(Vec<CatalogVariation>),
}

// =============================================================================
// RestCommerce
// =============================================================================

/// Client for the commerce platform REST API.
#[derive(Clone)]
pub struct RestCommerce {
    inner: Arc<RestCommerceInner>,
}

struct RestCommerceInner {
    client: reqwest::Client,
    base_url: String,
    token: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl RestCommerce {
    /// Create a new commerce platform client.
    #[must_use]
    pub fn new(config: &CommerceApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(RestCommerceInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.trim_end_matches('/').to_string(),
                token: config.api_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Execute a GET request and decode the JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CommerceError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(&self.inner.token)
            .query(query)
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Decode a platform response, surfacing rate limits and error statuses.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CommerceError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CommerceError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics.
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CommerceError::Platform {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Map a 404 platform error to `None`, keeping other errors fatal.
    fn optional<T>(result: Result<T, CommerceError>) -> Result<Option<T>, CommerceError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(CommerceError::Platform { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch a product, going through the catalog cache.
    async fn product_cached(
        &self,
        id: ProductId,
    ) -> Result<Option<CatalogProduct>, CommerceError> {
        if let Some(CacheValue::Product(product)) =
            self.inner.cache.get(&CacheKey::Product(id.as_i64())).await
        {
            return Ok(Some(*product));
        }

        let fetched: Option<ProductDto> =
            Self::optional(self.get_json(&format!("/products/{id}"), &[]).await)?;
        let Some(dto) = fetched else {
            return Ok(None);
        };

        let product = dto.into_product()?;
        self.inner
            .cache
            .insert(
                CacheKey::Product(id.as_i64()),
                CacheValue::Product(Box::new(product.clone())),
            )
            .await;
        Ok(Some(product))
    }

    /// Fetch the purchasable variations of a product, through the cache.
    async fn variations_cached(
        &self,
        id: ProductId,
    ) -> Result<Vec<CatalogVariation>, CommerceError> {
        if let Some(CacheValue::Variations(variations)) = self
            .inner
            .cache
            .get(&CacheKey::Variations(id.as_i64()))
            .await
        {
            return Ok(variations);
        }

        let dtos: Vec<VariationDto> = self
            .get_json(
                &format!("/products/{id}/variations"),
                &[("per_page", "100".to_string())],
            )
            .await?;

        let variations = dtos
            .into_iter()
            .map(VariationDto::into_variation)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|v| v.purchasable)
            .collect::<Vec<_>>();

        self.inner
            .cache
            .insert(
                CacheKey::Variations(id.as_i64()),
                CacheValue::Variations(variations.clone()),
            )
            .await;
        Ok(variations)
    }
}

#[async_trait]
impl Commerce for RestCommerce {
    #[instrument(skip(self))]
    async fn search_products(
        &self,
        term: &str,
        limit: u32,
    ) -> Result<Vec<CatalogProduct>, CommerceError> {
        let dtos: Vec<ProductDto> = self
            .get_json(
                "/products",
                &[
                    ("search", term.to_string()),
                    ("status", "publish".to_string()),
                    ("orderby", "title".to_string()),
                    ("per_page", limit.to_string()),
                ],
            )
            .await?;

        let mut products = Vec::with_capacity(dtos.len());
        for dto in dtos {
            let mut product = dto.into_product()?;
            if !product.purchasable {
                continue;
            }
            if product.kind == ProductKind::Variable {
                product.variations = self.variations_cached(product.id).await?;
            }
            products.push(product);
        }
        Ok(products)
    }

    async fn product(&self, id: ProductId) -> Result<Option<CatalogProduct>, CommerceError> {
        self.product_cached(id).await
    }

    async fn variations(&self, id: ProductId) -> Result<Vec<CatalogVariation>, CommerceError> {
        self.variations_cached(id).await
    }

    #[instrument(skip(self))]
    async fn customer_by_phone(
        &self,
        phone: &Phone,
    ) -> Result<Option<CustomerId>, CommerceError> {
        let customers: Vec<CustomerDto> = self
            .get_json(
                "/customers",
                &[
                    ("phone", phone.as_str().to_string()),
                    ("per_page", "1".to_string()),
                ],
            )
            .await?;
        Ok(customers.first().map(|c| CustomerId::new(c.id)))
    }

    async fn latest_order_placed_at(
        &self,
        phone: &Phone,
    ) -> Result<Option<DateTime<Utc>>, CommerceError> {
        let orders: Vec<OrderDto> = self
            .get_json(
                "/orders",
                &[
                    ("phone", phone.as_str().to_string()),
                    ("orderby", "date".to_string()),
                    ("order", "desc".to_string()),
                    ("per_page", "1".to_string()),
                ],
            )
            .await?;
        Ok(orders.first().map(|o| o.placed_at))
    }

    #[instrument(skip(self))]
    async fn resolve_item(
        &self,
        product_id: ProductId,
        variation_id: Option<VariationId>,
    ) -> Result<Option<PurchasableItem>, CommerceError> {
        let Some(product) = self.product_cached(product_id).await? else {
            return Ok(None);
        };

        // A variation id wins over the parent product id.
        if let Some(vid) = variation_id {
            let variation = self
                .variations_cached(product_id)
                .await?
                .into_iter()
                .find(|v| v.id == vid);
            return Ok(variation.map(|v| PurchasableItem {
                product_id,
                variation_id: Some(v.id),
                name: format!("{} - {}", product.name, v.label()),
                unit_price: v.price,
            }));
        }

        if !product.purchasable {
            return Ok(None);
        }
        Ok(Some(PurchasableItem {
            product_id,
            variation_id: None,
            name: product.name,
            unit_price: product.price,
        }))
    }

    #[instrument(skip(self, draft), fields(lines = draft.lines.len()))]
    async fn place_order(&self, draft: OrderDraft) -> Result<PlacedOrder, CommerceError> {
        let url = format!("{}/orders", self.inner.base_url);
        let response = self
            .inner
            .client
            .post(&url)
            .bearer_auth(&self.inner.token)
            .json(&draft)
            .send()
            .await?;

        let dto: OrderDto = Self::decode(response).await?;
        Ok(PlacedOrder {
            id: OrderId::new(dto.id),
            total: parse_price(&dto.total)?,
            placed_at: dto.placed_at,
        })
    }
}

// =============================================================================
// Wire types
// =============================================================================

/// Parse a platform price string; the platform sends `""` for priceless items.
fn parse_price(raw: &str) -> Result<Money, CommerceError> {
    if raw.trim().is_empty() {
        return Ok(Money::ZERO);
    }
    Money::parse(raw).map_err(|_| CommerceError::BadPrice(raw.to_string()))
}

#[derive(Debug, Deserialize)]
struct ImageDto {
    src: String,
}

#[derive(Debug, Deserialize)]
struct ProductDto {
    id: i64,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    price: String,
    #[serde(default)]
    purchasable: bool,
    #[serde(default)]
    images: Vec<ImageDto>,
}

impl ProductDto {
    fn into_product(self) -> Result<CatalogProduct, CommerceError> {
        let price = parse_price(&self.price)?;
        Ok(CatalogProduct {
            id: ProductId::new(self.id),
            name: self.name,
            kind: if self.kind == "variable" {
                ProductKind::Variable
            } else {
                ProductKind::Simple
            },
            price,
            image: self.images.into_iter().next().map(|i| i.src),
            purchasable: self.purchasable,
            variations: Vec::new(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct AttributeDto {
    name: String,
    option: String,
    #[serde(default)]
    option_label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VariationDto {
    id: i64,
    #[serde(default)]
    price: String,
    #[serde(default)]
    sku: Option<String>,
    #[serde(default)]
    purchasable: bool,
    #[serde(default)]
    stock_status: String,
    #[serde(default)]
    image: Option<ImageDto>,
    #[serde(default)]
    attributes: Vec<AttributeDto>,
}

impl VariationDto {
    fn into_variation(self) -> Result<CatalogVariation, CommerceError> {
        let price = parse_price(&self.price)?;
        Ok(CatalogVariation {
            id: VariationId::new(self.id),
            price,
            sku: self.sku,
            image: self.image.map(|i| i.src),
            in_stock: self.stock_status == "instock",
            purchasable: self.purchasable,
            attributes: self
                .attributes
                .into_iter()
                .map(|a| AttributeValue {
                    attribute: a.name,
                    value: a.option,
                    term: a.option_label,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CustomerDto {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct OrderDto {
    id: i64,
    #[serde(default)]
    total: String,
    #[serde(rename = "date_created_gmt")]
    placed_at: DateTime<Utc>,
}
