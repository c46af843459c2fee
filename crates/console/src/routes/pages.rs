//! Static operator-facing pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::RequireOperator;

/// Operator guide template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/guide.html")]
pub struct GuideTemplate {
    pub operator_name: String,
}

/// Display the operator guide.
pub async fn guide(RequireOperator(operator): RequireOperator) -> impl IntoResponse {
    GuideTemplate {
        operator_name: operator.name,
    }
}
