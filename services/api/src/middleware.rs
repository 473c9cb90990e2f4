//! Authentication middleware for JWT token validation

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::warn;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Raw token header accepted alongside `Authorization: Bearer`
pub const TOKEN_HEADER: &str = "token";

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Pick the session token from the `token` header, else from `Authorization: Bearer`
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(token) = raw {
        return Some(token.to_string());
    }

    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_string())
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(req.headers()).ok_or_else(|| {
        ApiError::Unauthenticated("No Authorization Header Provided".to_string())
    })?;

    let identity = state.jwt_service.validate(&token).map_err(|e| {
        warn!("Rejected token for {} {}: {}", req.method(), req.uri().path(), e);
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(AuthUser {
        id: identity.uid,
        email: identity.email,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header::AUTHORIZATION};

    #[test]
    fn raw_token_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("raw-token"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer bearer-token"));
        assert_eq!(extract_token(&headers).as_deref(), Some("raw-token"));
    }

    #[test]
    fn bearer_header_is_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer bearer-token"));
        assert_eq!(extract_token(&headers).as_deref(), Some("bearer-token"));
    }

    #[test]
    fn missing_or_malformed_headers_yield_nothing() {
        assert!(extract_token(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("  "));
        assert!(extract_token(&headers).is_none());
    }
}
