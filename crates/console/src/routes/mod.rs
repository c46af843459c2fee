//! HTTP route handlers for the order desk console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Order form (requires operator)
//! POST /orders                 - Submit an order (requires operator + token)
//! GET  /guide                  - Operator guide
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (probes the platform)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! POST /auth/logout            - Logout action
//!
//! # Catalog API (requires operator + token; JSON responses)
//! GET  /api/products/search            - Title search, `term` + `token` query
//! GET  /api/products/{id}/variations   - Variations of a variable product
//! ```

pub mod auth;
pub mod catalog;
pub mod orders;
pub mod pages;


use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the catalog API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products/search", get(catalog::search))
        .route("/products/{id}/variations", get(catalog::variations))
}

/// Create all routes for the console.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Order form and submission
        .route("/", get(orders::show))
        .route("/orders", post(orders::submit))
        // Operator guide
        .route("/guide", get(pages::guide))
        // Auth routes
        .nest("/auth", auth_routes())
        // Catalog API
        .nest("/api", api_routes())
}
