//! API service routes

use axum::{
    Json, Router,
    http::{
        HeaderName, Method, StatusCode,
        header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE},
    },
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    middleware::{TOKEN_HEADER, auth_middleware},
    state::AppState,
};

pub mod accounts;
pub mod addresses;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod payment;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/auth/logout", post(accounts::logout))
        .route(
            "/api/user/profile",
            get(accounts::get_profile).put(accounts::update_profile),
        )
        .route(
            "/api/cart",
            get(cart::get_cart)
                .post(cart::add_to_cart)
                .delete(cart::clear_cart),
        )
        .route("/api/cart/items/:id", put(cart::update_cart_item))
        .route("/api/cart/:id", delete(cart::remove_from_cart))
        .route("/api/checkout", post(cart::checkout))
        .route(
            "/api/address",
            get(addresses::list_addresses).post(addresses::add_address),
        )
        .route(
            "/api/address/:id",
            put(addresses::update_address).delete(addresses::delete_address),
        )
        .route("/api/orders", get(orders::list_orders))
        .route("/api/orders/instant", post(orders::instant_buy))
        .route("/api/orders/:id", get(orders::get_order))
        .route("/api/payment/create-order", post(payment::create_order))
        .route("/api/payment/verify", post(payment::verify))
        .route("/api/payment/:id", get(payment::status))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(accounts::register))
        .route("/api/auth/login", post(accounts::login))
        .route("/api/auth/refresh", post(accounts::refresh))
        .route("/api/products", get(catalog::list_products))
        .route("/api/products/search", get(catalog::search_products))
        .route("/api/products/:id", get(catalog::get_product))
        .merge(protected_routes)
        .fallback(not_found)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            ACCEPT,
            AUTHORIZATION,
            HeaderName::from_static(TOKEN_HEADER),
        ])
        .expose_headers([CONTENT_LENGTH])
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Route not found"})),
    )
}
