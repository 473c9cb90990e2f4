//! Public product catalog handlers

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::IntoResponse,
};

use crate::{error::ApiResult, models::SearchQuery, state::AppState};

pub async fn list_products(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let products = state.catalog.list_all().await?;
    Ok(Json(products))
}

/// Get a product by catalog ID or product code
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let product = state.catalog.find(&id).await?;
    Ok(Json(product))
}

pub async fn search_products(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let products = state.catalog.search(&query.name).await?;
    Ok(Json(products))
}
