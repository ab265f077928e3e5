//! Identity resolution for protected routes.

use std::convert::Infallible;

use axum::{
    extract::{OptionalFromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::AppState;
use tally_shared::{Claims, types::UserId};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Resolves the caller's identity from a JWT bearer token.
///
/// Valid claims are stored in request extensions. A missing, malformed or
/// expired token leaves the request anonymous; handlers decide whether that
/// is acceptable.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token);

    if let Some(token) = token {
        match state.jwt_service.validate_token(token) {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
            }
            Err(e) => {
                debug!(error = %e, "Ignoring unusable bearer token");
            }
        }
    }

    next.run(request).await
}

/// Extractor for the authenticated caller.
///
/// Extract as `Option<AuthUser>`; `None` means no usable token was sent:
///
/// ```ignore
/// async fn handler(user: Option<AuthUser>) -> impl IntoResponse {
///     let user_id = user.map(|u| u.user_id());
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.0.user_id()
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Claims>().cloned().map(AuthUser))
    }
}
