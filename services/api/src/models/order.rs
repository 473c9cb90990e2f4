//! Placed orders

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Address, CartItem, cart::cart_total};

/// How an order is paid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Digital,
    #[default]
    CashOnDelivery,
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created by an instant purchase
    Placed,
    /// Created by checking out the cart
    Completed,
}

/// An order embedded in the user's order history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_list: Vec<CartItem>,
    pub ordered_on: DateTime<Utc>,
    pub total_price: f64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Address>,
}

impl Order {
    /// Build an order from a snapshot of line items, pricing it from those lines
    pub fn from_items(
        items: Vec<CartItem>,
        payment_method: PaymentMethod,
        status: OrderStatus,
        delivery_address: Option<Address>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            total_price: cart_total(&items),
            order_list: items,
            ordered_on: Utc::now(),
            payment_method,
            status,
            delivery_address,
        }
    }
}

/// Checkout receipt returned to the client, not persisted
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub total: f64,
    pub timestamp: DateTime<Utc>,
    pub order_id: Uuid,
    pub items: usize,
}

impl From<&Order> for CheckoutReceipt {
    fn from(order: &Order) -> Self {
        Self {
            total: order.total_price,
            timestamp: order.ordered_on,
            order_id: order.id,
            items: order.order_list.len(),
        }
    }
}

/// Optional checkout parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutOptions {
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub address_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;

    #[test]
    fn payment_method_defaults_to_cash_on_delivery() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::CashOnDelivery);
        let json = serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap();
        assert_eq!(json, "\"cash_on_delivery\"");
    }

    #[test]
    fn receipt_projects_order() {
        let speaker = Product::new("Bluetooth Speaker", 129.0);
        let order = Order::from_items(
            vec![CartItem::snapshot(&speaker, 2)],
            PaymentMethod::Digital,
            OrderStatus::Completed,
            None,
        );
        let receipt = CheckoutReceipt::from(&order);

        assert_eq!(receipt.total, 258.0);
        assert_eq!(receipt.items, 1);
        assert_eq!(receipt.order_id, order.id);
    }
}
