//! Cart and checkout handlers

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{AddToCartRequest, CheckoutOptions, UpdateQuantityRequest},
    state::AppState,
};

pub async fn get_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let view = state.carts.get_with_total(user.id).await?;
    Ok(Json(view))
}

/// Add a product to the cart; quantity defaults to one
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<AddToCartRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let items = state
        .carts
        .add(user.id, &payload.product_id, payload.quantity.unwrap_or(1))
        .await?;

    Ok(Json(json!({
        "message": "Successfully added to cart",
        "items": items,
    })))
}

pub async fn update_cart_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(item_id): Path<String>,
    payload: Result<Json<UpdateQuantityRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let item = state
        .carts
        .update_quantity(user.id, &item_id, payload.quantity)
        .await?;

    Ok(Json(json!({
        "message": "Cart item updated successfully",
        "item": item,
    })))
}

/// Remove a line by cart item ID or product ID
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let items = state.carts.remove(user.id, &id).await?;
    Ok(Json(json!({
        "message": "Successfully removed from cart",
        "items": items,
    })))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    state.carts.clear(user.id).await?;
    Ok(Json(json!({"message": "Cart cleared successfully"})))
}

/// Check out the whole cart
///
/// The body is optional; an empty body checks out cash on delivery without
/// a delivery address.
pub async fn checkout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let options = if body.iter().all(u8::is_ascii_whitespace) {
        CheckoutOptions::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::Validation(format!("Invalid request body: {e}")))?
    };

    let receipt = state.orders.checkout(user.id, options).await?;
    Ok(Json(receipt))
}
