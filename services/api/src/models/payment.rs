//! Mock payment gateway payloads

use serde::{Deserialize, Serialize};

/// Request to open a gateway order
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentOrderRequest {
    pub amount: f64,
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}

/// Gateway order handed to the client-side checkout widget
#[derive(Debug, Clone, Serialize)]
pub struct PaymentOrderResponse {
    pub order_id: String,
    /// Amount in minor currency units
    pub amount: i64,
    pub currency: String,
    pub razorpay_key: String,
}

/// Gateway callback payload
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default)]
    pub razorpay_order_id: String,
    #[serde(default)]
    pub razorpay_payment_id: String,
    #[serde(default)]
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    pub order_id: String,
    pub payment_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentStatusResponse {
    pub payment_id: String,
    pub status: String,
    pub amount: i64,
}
