//! Registration, session and profile handlers

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::ApiResult,
    middleware::AuthUser,
    models::{LoginRequest, ProfileUpdate, RefreshTokenRequest, RegisterRequest, TokenResponse},
    state::AppState,
};

/// Create an account
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    state.accounts.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Successfully Signed Up!!"})),
    ))
}

/// Log in, returning the user document with a fresh token pair
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let user = state.accounts.login(payload).await?;
    Ok(Json(user))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    state.accounts.logout(user.id).await?;
    Ok(Json(json!({"message": "Logged out successfully"})))
}

/// Trade a refresh token for a new token pair
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let tokens = state.accounts.refresh(&payload.refresh_token).await?;

    Ok(Json(TokenResponse {
        token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.access_token_expiry(),
    }))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let profile = state.accounts.profile(user.id).await?;
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(update) = payload?;
    let profile = state.accounts.update_profile(user.id, update).await?;
    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": profile,
    })))
}
