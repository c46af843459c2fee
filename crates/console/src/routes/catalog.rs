//! Catalog JSON API consumed by the order form's product picker.
//!
//! Every response carries a `success` flag; failures add an `error` string.
//! Both endpoints require a signed-in operator and the page's authenticity
//! token, so these cannot be queried from another origin on a stolen cookie.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use order_desk_core::ProductId;

use crate::commerce::CommerceError;
use crate::middleware::RequireOperator;
use crate::services::catalog::{self, CatalogError};
use crate::services::tokens;
use crate::state::AppState;

/// Query parameters for the search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub token: String,
}

/// Query parameters for the variations endpoint.
#[derive(Debug, Deserialize)]
pub struct VariationsQuery {
    #[serde(default)]
    pub token: String,
}

/// The `success: false` half of the response envelope.
#[derive(Debug, Serialize)]
struct ApiFailure {
    success: bool,
    error: &'static str,
}

fn failure(status: StatusCode, error: &'static str) -> Response {
    (
        status,
        Json(ApiFailure {
            success: false,
            error,
        }),
    )
        .into_response()
}

fn platform_failure(error: &CommerceError) -> Response {
    tracing::error!("catalog lookup failed: {error}");
    let status = match error {
        CommerceError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::BAD_GATEWAY,
    };
    failure(status, "Commerce platform error")
}

/// Search products by title.
///
/// `GET /api/products/search?term=...&token=...`
#[instrument(skip_all, fields(term = %query.term))]
pub async fn search(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Response {
    if !tokens::verify(&session, &query.token).await {
        return failure(StatusCode::FORBIDDEN, "Invalid token");
    }

    let term = query.term.trim();
    if term.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Search term is required");
    }

    match catalog::search(state.commerce(), term).await {
        Ok(results) => Json(json!({ "success": true, "results": results })).into_response(),
        Err(e) => platform_failure(&e),
    }
}

/// List the purchasable variations of a variable product.
///
/// `GET /api/products/{id}/variations?token=...`
#[instrument(skip_all, fields(product_id = id))]
pub async fn variations(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Query(query): Query<VariationsQuery>,
) -> Response {
    if !tokens::verify(&session, &query.token).await {
        return failure(StatusCode::FORBIDDEN, "Invalid token");
    }

    match catalog::variations(state.commerce(), ProductId::new(id)).await {
        Ok(variations) => {
            Json(json!({ "success": true, "variations": variations })).into_response()
        }
        Err(CatalogError::InvalidProduct) => failure(StatusCode::BAD_REQUEST, "Invalid product"),
        Err(CatalogError::Commerce(e)) => platform_failure(&e),
    }
}
