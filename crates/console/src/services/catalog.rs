//! Catalog lookups: product search and variation listing.
//!
//! Read-only queries over the commerce platform, shaped into the summaries
//! the order form consumes.

use serde::Serialize;
use thiserror::Error;

use order_desk_core::{Money, ProductId, VariationId};

use crate::commerce::{CatalogVariation, Commerce, CommerceError, ProductKind};

/// Maximum products returned per search.
pub const SEARCH_RESULT_LIMIT: u32 = 15;

/// Errors from catalog lookups.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The id does not name an existing variable product.
    #[error("invalid product")]
    InvalidProduct,

    /// The platform call failed.
    #[error(transparent)]
    Commerce(#[from] CommerceError),
}

/// One product search hit.
#[derive(Debug, Clone, Serialize)]
pub struct ProductHit {
    pub id: ProductId,
    /// Display name.
    pub text: String,
    pub price: Money,
    pub kind: ProductKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Purchasable variations; empty for simple products.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<VariationView>,
}

/// One purchasable variation summary.
#[derive(Debug, Clone, Serialize)]
pub struct VariationView {
    pub id: VariationId,
    /// Composed attribute label (e.g. "Medium - Navy Blue").
    pub text: String,
    pub price: Money,
    pub in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&CatalogVariation> for VariationView {
    fn from(variation: &CatalogVariation) -> Self {
        Self {
            id: variation.id,
            text: variation.label(),
            price: variation.price,
            in_stock: variation.in_stock,
            sku: variation.sku.clone(),
            image: variation.image.clone(),
        }
    }
}

/// Search the catalog by title.
///
/// The caller is responsible for rejecting empty terms; a non-empty term
/// with no matches yields an empty list.
///
/// # Errors
///
/// Returns `CommerceError` if the platform call fails.
pub async fn search(
    commerce: &dyn Commerce,
    term: &str,
) -> Result<Vec<ProductHit>, CommerceError> {
    let products = commerce.search_products(term, SEARCH_RESULT_LIMIT).await?;

    Ok(products
        .into_iter()
        .map(|product| ProductHit {
            id: product.id,
            text: product.name,
            price: product.price,
            kind: product.kind,
            image: product.image,
            variations: product.variations.iter().map(VariationView::from).collect(),
        })
        .collect())
}

/// List the purchasable variations of a variable product.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidProduct`] when the id is unknown or names
/// a non-variable product, and [`CatalogError::Commerce`] when the platform
/// call fails.
pub async fn variations(
    commerce: &dyn Commerce,
    id: ProductId,
) -> Result<Vec<VariationView>, CatalogError> {
    let product = commerce
        .product(id)
        .await?
        .ok_or(CatalogError::InvalidProduct)?;

    if product.kind != ProductKind::Variable {
        return Err(CatalogError::InvalidProduct);
    }

    let variations = commerce.variations(id).await?;
    Ok(variations.iter().map(VariationView::from).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commerce::fake::FakeCommerce;

    #[tokio::test]
    async fn test_search_shapes_hits() {
        let commerce = FakeCommerce::with_tee_catalog();

        let hits = search(&commerce, "tee").await.unwrap();
        assert_eq!(hits.len(), 1);

        let hit = &hits[0];
        assert_eq!(hit.text, "Classic Tee");
        assert_eq!(hit.kind, ProductKind::Variable);
        assert_eq!(hit.variations.len(), 2);
        assert_eq!(hit.variations[0].text, "Medium");
    }

    #[tokio::test]
    async fn test_search_no_matches_is_empty_not_error() {
        let commerce = FakeCommerce::with_tee_catalog();
        let hits = search(&commerce, "no-such-product").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_variations_of_variable_product() {
        let commerce = FakeCommerce::with_tee_catalog();
        let views = variations(&commerce, ProductId::new(5)).await.unwrap();
        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|v| !v.text.is_empty()));
    }

    #[tokio::test]
    async fn test_variations_of_simple_product_is_invalid() {
        let commerce = FakeCommerce::with_tee_catalog();
        let result = variations(&commerce, ProductId::new(9)).await;
        assert!(matches!(result, Err(CatalogError::InvalidProduct)));
    }

    #[tokio::test]
    async fn test_variations_of_unknown_product_is_invalid() {
        let commerce = FakeCommerce::with_tee_catalog();
        let result = variations(&commerce, ProductId::new(404)).await;
        assert!(matches!(result, Err(CatalogError::InvalidProduct)));
    }
}
