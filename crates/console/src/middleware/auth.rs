//! Authorization middleware and extractors.
//!
//! Provides the extractor that gates every order-management surface: the
//! caller must be a signed-in operator holding the manage-orders capability,
//! and the check runs before any handler state change.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{Operator, session_keys};

/// Extractor that requires a signed-in operator with the manage-orders
/// capability.
///
/// HTML requests without one are redirected to the login page; API requests
/// get a bare status code.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireOperator(operator): RequireOperator,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", operator.name)
/// }
/// ```
pub struct RequireOperator(pub Operator);

/// Rejection for requests without an authorized operator.
pub enum OperatorRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Not signed in (for API requests).
    Unauthorized,
    /// Signed in but missing the manage-orders capability.
    PermissionDenied,
}

impl IntoResponse for OperatorRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::PermissionDenied => {
                (StatusCode::FORBIDDEN, "Permission denied").into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireOperator
where
    S: Send + Sync,
{
    type Rejection = OperatorRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(OperatorRejection::Unauthorized)?;

        let is_api = parts.uri.path().starts_with("/api/");

        let operator: Operator = session
            .get(session_keys::OPERATOR)
            .await
            .ok()
            .flatten()
            .ok_or(if is_api {
                OperatorRejection::Unauthorized
            } else {
                OperatorRejection::RedirectToLogin
            })?;

        if !operator.manage_orders {
            return Err(OperatorRejection::PermissionDenied);
        }

        Ok(Self(operator))
    }
}

/// Set the signed-in operator in the session.
///
/// # Errors
///
/// Returns the session store error if the write fails.
pub async fn set_operator(
    session: &Session,
    operator: &Operator,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::OPERATOR, operator).await
}

/// Clear the signed-in operator from the session.
///
/// # Errors
///
/// Returns the session store error if the removal fails.
pub async fn clear_operator(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<Operator>(session_keys::OPERATOR).await?;
    Ok(())
}
