//! Mock payment gateway handlers
//!
//! Nothing here talks to a real gateway or persists anything; the responses
//! only have the shape a client-side checkout widget expects.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::payment::{
        CreatePaymentOrderRequest, PaymentOrderResponse, PaymentStatusResponse,
        VerifyPaymentRequest, VerifyPaymentResponse,
    },
    state::AppState,
};

/// Gateway order ID, e.g. `order_1718000000123456789_9f3c2a1b4`
fn gateway_order_id() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("order_{}_{}", nanos, &suffix[..9])
}

/// Amount in minor currency units
fn minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreatePaymentOrderRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    if !payload.amount.is_finite() || payload.amount < 0.0 {
        return Err(ApiError::Validation("Invalid amount".to_string()));
    }

    let response = PaymentOrderResponse {
        order_id: gateway_order_id(),
        amount: minor_units(payload.amount),
        currency: state.payment.currency.clone(),
        razorpay_key: state.payment.public_key.clone(),
    };
    info!(
        "Created mock payment order {} for {} ({} items)",
        response.order_id,
        user.email,
        payload.items.len()
    );
    Ok(Json(response))
}

/// Always reports success
pub async fn verify(
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    debug!(
        "Accepting mock payment {} with a {} byte signature",
        payload.razorpay_payment_id,
        payload.razorpay_signature.len()
    );
    Ok(Json(VerifyPaymentResponse {
        success: true,
        message: "Payment verified successfully".to_string(),
        order_id: payload.razorpay_order_id,
        payment_id: payload.razorpay_payment_id,
    }))
}

pub async fn status(Path(payment_id): Path<String>) -> impl IntoResponse {
    Json(PaymentStatusResponse {
        payment_id,
        status: "completed".to_string(),
        amount: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_convert_to_minor_units() {
        assert_eq!(minor_units(129.0), 12_900);
        assert_eq!(minor_units(0.1 + 0.2), 30);
    }

    #[test]
    fn order_ids_have_gateway_shape() {
        let id = gateway_order_id();
        let parts: Vec<_> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "order");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
    }
}
