//! Custom error types for the API service

use auth::AuthError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::services::ShopError;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, malformed or expired credentials
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    NotFound(String),

    /// Malformed input or a refused business rule
    #[error("{0}")]
    Validation(String),

    /// Duplicate email or phone
    #[error("{0}")]
    Conflict(String),

    /// The store timed out or is unreachable
    #[error("Service temporarily unavailable")]
    Unavailable(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Unavailable(detail) => error!("Store unavailable: {}", detail),
            ApiError::Internal(detail) => error!("Internal error: {}", detail),
            _ => {}
        }

        // Display for 5xx variants is a fixed message, never the detail
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Expired | AuthError::Invalid => ApiError::Unauthenticated(err.to_string()),
            AuthError::Signing(_) | AuthError::Hashing(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) => ApiError::Unavailable(err.to_string()),
            StoreError::Duplicate { .. } => {
                ApiError::Conflict("Email or phone is already in use".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ShopError> for ApiError {
    fn from(err: ShopError) -> Self {
        match err {
            ShopError::UserNotFound
            | ShopError::ProductNotFound
            | ShopError::ItemNotFound
            | ShopError::AddressNotFound
            | ShopError::OrderNotFound => ApiError::NotFound(err.to_string()),
            ShopError::EmptyCart
            | ShopError::InvalidQuantity
            | ShopError::AddressLimitExceeded
            | ShopError::Validation(_) => ApiError::Validation(err.to_string()),
            ShopError::InvalidCredentials => ApiError::Unauthenticated(err.to_string()),
            ShopError::Conflict(msg) => ApiError::Conflict(msg),
            ShopError::Auth(auth) => auth.into(),
            ShopError::Store(store) => store.into(),
            ShopError::Internal(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (ShopError::ProductNotFound, StatusCode::NOT_FOUND),
            (ShopError::EmptyCart, StatusCode::BAD_REQUEST),
            (ShopError::AddressLimitExceeded, StatusCode::BAD_REQUEST),
            (ShopError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ShopError::Conflict("taken".to_string()), StatusCode::CONFLICT),
            (ShopError::Auth(AuthError::Expired), StatusCode::UNAUTHORIZED),
            (
                ShopError::Store(StoreError::Unavailable("timeout".to_string())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ShopError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn server_errors_hide_details() {
        let err = ApiError::from(ShopError::Store(StoreError::Serialization(
            "column cart: invalid type".to_string(),
        )));
        assert_eq!(err.to_string(), "Internal server error");

        let err = ApiError::from(StoreError::Unavailable("pool timed out".to_string()));
        assert_eq!(err.to_string(), "Service temporarily unavailable");
    }

    #[test]
    fn token_errors_keep_their_reason() {
        assert_eq!(
            ApiError::from(AuthError::Expired).to_string(),
            "token is expired"
        );
        assert_eq!(
            ApiError::from(AuthError::Invalid).to_string(),
            "The Token is invalid"
        );
    }
}
