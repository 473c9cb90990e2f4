//! API models for documents and request/response payloads

use serde::{Deserialize, Serialize};

pub mod address;
pub mod cart;
pub mod order;
pub mod payment;
pub mod product;
pub mod user;

pub use address::{Address, AddressUpdate, NewAddress};
pub use cart::CartItem;
pub use order::{CheckoutOptions, CheckoutReceipt, Order, OrderStatus, PaymentMethod};
pub use product::Product;
pub use user::{LoginRequest, ProfileUpdate, RegisterRequest, User};

/// Request to put a product into the cart
#[derive(Debug, Clone, Deserialize)]
pub struct AddToCartRequest {
    /// Catalog ID or product code
    #[serde(alias = "productId")]
    pub product_id: String,
    #[serde(alias = "qty")]
    pub quantity: Option<i64>,
}

/// Request to change a cart line's quantity
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Request for an instant single-product purchase
#[derive(Debug, Clone, Deserialize)]
pub struct InstantBuyRequest {
    /// Catalog ID or product code
    #[serde(alias = "productId")]
    pub product_id: String,
    #[serde(alias = "qty")]
    pub quantity: Option<i64>,
}

/// Cart contents with the derived total
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total: f64,
    pub total_items: usize,
}

impl CartView {
    pub fn new(items: Vec<CartItem>) -> Self {
        Self {
            total: cart::cart_total(&items),
            total_items: items.len(),
            items,
        }
    }
}

/// Query parameters for product search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub name: String,
}

/// Request for token refresh
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Response for token issuance
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
}
