//! Address book handlers

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::ApiResult,
    middleware::AuthUser,
    models::{AddressUpdate, NewAddress},
    state::AppState,
};

pub async fn list_addresses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let addresses = state.addresses.list(user.id).await?;
    Ok(Json(json!({"addresses": addresses})))
}

pub async fn add_address(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewAddress>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let address = state.addresses.add(user.id, payload).await?;
    Ok(Json(json!({
        "message": "Address added successfully",
        "address": address,
    })))
}

pub async fn update_address(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(address_id): Path<String>,
    payload: Result<Json<AddressUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(update) = payload?;
    let address = state
        .addresses
        .update(user.id, &address_id, update)
        .await?;
    Ok(Json(json!({
        "message": "Address updated successfully",
        "address": address,
    })))
}

pub async fn delete_address(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(address_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.addresses.delete(user.id, &address_id).await?;
    Ok(Json(json!({"message": "Address deleted successfully"})))
}
