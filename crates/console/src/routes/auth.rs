//! Operator sign-in and sign-out.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tower_sessions::Session;

use crate::filters;
use crate::middleware::{clear_operator, set_operator};
use crate::models::{Operator, session_keys};
use crate::services::tokens;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub access_key: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Display the login page.
///
/// An already-signed-in operator is sent straight to the order form.
pub async fn login_page(session: Session, Query(query): Query<MessageQuery>) -> Response {
    if let Ok(Some(_)) = session.get::<Operator>(session_keys::OPERATOR).await {
        return Redirect::to("/").into_response();
    }

    let error = query.error.as_deref().map(|code| match code {
        "key" => "That access key is not valid.".to_string(),
        "session" => "Could not start a session. Please try again.".to_string(),
        other => other.to_string(),
    });

    LoginTemplate { error }.into_response()
}

/// Handle login form submission.
///
/// The access key is compared against the configured key in constant time;
/// the session id is cycled on success so a pre-login cookie cannot be fixed.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    axum::Form(form): axum::Form<LoginForm>,
) -> Response {
    let expected = state.config().operator_key.expose_secret();
    if !tokens::constant_time_eq(expected, form.access_key.trim()) {
        tracing::warn!("login rejected: access key mismatch");
        return Redirect::to("/auth/login?error=key").into_response();
    }

    if let Err(e) = session.cycle_id().await {
        tracing::error!("Failed to cycle session id: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    let name = match form.name.trim() {
        "" => "Operator".to_string(),
        n => n.to_string(),
    };
    let operator = Operator {
        name,
        manage_orders: true,
    };

    if let Err(e) = set_operator(&session, &operator).await {
        tracing::error!("Failed to set session: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    tracing::info!(operator = %operator.name, "operator signed in");
    Redirect::to("/").into_response()
}

/// Handle logout. Destroys the whole session, token and flash slots included.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_operator(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Redirect::to("/auth/login").into_response()
}
