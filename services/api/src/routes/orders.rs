//! Order history and instant purchase handlers

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{error::ApiResult, middleware::AuthUser, models::InstantBuyRequest, state::AppState};

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let orders = state.orders.list(user.id).await?;
    Ok(Json(json!({"orders": orders})))
}

pub async fn get_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(order_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let order = state.orders.get(user.id, &order_id).await?;
    Ok(Json(json!({"order": order})))
}

/// Buy a single product without touching the cart
pub async fn instant_buy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<InstantBuyRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let order = state
        .orders
        .instant_buy(user.id, &payload.product_id, payload.quantity.unwrap_or(1))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Order placed successfully",
            "order": order,
        })),
    ))
}
