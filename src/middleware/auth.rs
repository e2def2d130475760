use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{verify_token, Claims};
use crate::config::SecurityConfig;
use crate::error::ApiError;

/// Header carrying the signed token
pub const TOKEN_HEADER: &str = "x-auth-token";

/// Authenticated caller for the current request, decoded from the token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub username: String,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            username: claims.username,
        }
    }
}

/// Credential gate applied to every route. A valid token attaches a
/// [`Principal`] to the request; anything else lets the request through
/// unauthenticated and leaves the decision to the handler.
pub async fn credential_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if let Some(principal) = principal_from_headers(&state.config.security, request.headers()) {
        tracing::debug!("Authenticated request as {} ({})", principal.username, principal.id);
        request.extensions_mut().insert(principal);
    }

    next.run(request).await
}

/// Decode the principal from the token header, if one is present and valid
pub fn principal_from_headers(security: &SecurityConfig, headers: &HeaderMap) -> Option<Principal> {
    let token = headers.get(TOKEN_HEADER)?.to_str().ok()?.trim();
    if token.is_empty() {
        return None;
    }

    match verify_token(security, token) {
        Ok(claims) => Some(claims.into()),
        Err(e) => {
            tracing::debug!("Ignoring invalid token: {}", e);
            None
        }
    }
}

/// Taking a `Principal` argument makes a handler require authentication.
/// Extraction fails with 401 before any other extractor or handler logic
/// runs when the gate attached no principal.
#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(ApiError::unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::issue_token;
    use axum::http::HeaderValue;

    fn security() -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "gate-secret".to_string(),
            jwt_expiry_hours: 1,
            cors_origins: Vec::new(),
        }
    }

    #[test]
    fn missing_header_yields_no_principal() {
        assert_eq!(principal_from_headers(&security(), &HeaderMap::new()), None);
    }

    #[test]
    fn malformed_token_yields_no_principal() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("not-a-jwt"));
        assert_eq!(principal_from_headers(&security(), &headers), None);
    }

    #[test]
    fn valid_token_yields_principal() {
        let token = issue_token(&security(), 9, "alice").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_str(&token).unwrap());
        assert_eq!(
            principal_from_headers(&security(), &headers),
            Some(Principal { id: 9, username: "alice".to_string() })
        );
    }

    #[test]
    fn bearer_authorization_header_is_not_read() {
        let token = issue_token(&security(), 9, "alice").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        assert_eq!(principal_from_headers(&security(), &headers), None);
    }
}
