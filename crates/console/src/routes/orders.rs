//! Order form page and submission handler.
//!
//! POST/redirect/GET throughout: a submission always answers with a
//! redirect, carrying the outcome either in the `order_success` query
//! parameter or in the one-shot flash slot.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use order_desk_core::OrderId;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireOperator;
use crate::services::orders::{OrderForm, SubmitError, submit_order};
use crate::services::{flash, tokens};
use crate::state::AppState;

/// Query parameters for the order form page.
#[derive(Debug, Deserialize)]
pub struct ShowQuery {
    /// Id of the order just placed, set by the submission redirect.
    pub order_success: Option<i64>,
}

/// Order form page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/order_form.html")]
pub struct OrderFormTemplate {
    pub operator_name: String,
    pub token: String,
    pub errors: Vec<String>,
    pub placed_order: Option<OrderId>,
}

/// Display the order form.
///
/// Mints the session's authenticity token and drains the flash slot, so
/// errors from a failed submission show exactly once.
pub async fn show(
    RequireOperator(operator): RequireOperator,
    session: Session,
    Query(query): Query<ShowQuery>,
) -> Result<Response, AppError> {
    let token = tokens::issue(&session).await?;
    let errors = flash::take_errors(&session).await;

    Ok(OrderFormTemplate {
        operator_name: operator.name,
        token,
        errors,
        placed_order: query.order_success.map(OrderId::new),
    }
    .into_response())
}

/// Handle order form submission.
///
/// The authenticity token is checked before anything else. Validation and
/// platform failures flash their messages and redirect back to the form; a
/// placed order redirects with its id in the query string.
#[instrument(skip_all)]
pub async fn submit(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    axum::Form(form): axum::Form<OrderForm>,
) -> Result<Response, AppError> {
    if !tokens::verify(&session, &form.token).await {
        return Err(AppError::InvalidToken);
    }

    match submit_order(state.commerce(), &form).await {
        Ok(placed) => Ok(Redirect::to(&format!("/?order_success={}", placed.id)).into_response()),
        Err(SubmitError::Invalid(errors)) => {
            flash::push_errors(&session, errors).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(SubmitError::NoPurchasableProducts) => {
            flash::push_errors(
                &session,
                vec!["None of the selected products are available for purchase.".to_string()],
            )
            .await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(SubmitError::Commerce(e)) => {
            tracing::error!("order submission failed: {e}");
            flash::push_errors(
                &session,
                vec!["The order could not be placed. Please try again.".to_string()],
            )
            .await?;
            Ok(Redirect::to("/").into_response())
        }
    }
}
