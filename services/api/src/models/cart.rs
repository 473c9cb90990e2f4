//! Cart line items

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Product;

/// A product snapshot held in a user's cart or in a placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Line item ID, used for targeted updates
    pub id: Uuid,
    /// Catalog ID of the product
    pub product_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    pub product_name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    /// Copy the product's current name, price, rating and image into a new line
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id: product.id,
            product_code: product.product_code.clone(),
            product_name: product.product_name.clone(),
            price: product.price,
            rating: product.rating,
            image: product.image.clone(),
            quantity,
        }
    }

    /// Whether this line refers to `product`
    ///
    /// Lines written before catalog IDs were embedded are matched by product code.
    pub fn is_for(&self, product: &Product) -> bool {
        self.product_id == product.id
            || matches!(
                (&self.product_code, &product.product_code),
                (Some(mine), Some(theirs)) if mine == theirs
            )
    }

    /// Price multiplied by quantity
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Sum of price × quantity over all lines; zero for an empty cart
pub fn cart_total(items: &[CartItem]) -> f64 {
    items.iter().map(CartItem::line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_of_empty_cart_is_zero() {
        assert_eq!(cart_total(&[]), 0.0);
    }

    #[test]
    fn total_sums_price_times_quantity() {
        let monitor = Product::new("Gaming Monitor", 449.0);
        let mouse = Product::new("Wireless Mouse", 89.0);
        let items = vec![CartItem::snapshot(&monitor, 2), CartItem::snapshot(&mouse, 3)];

        assert_eq!(cart_total(&items), 449.0 * 2.0 + 89.0 * 3.0);
    }

    #[test]
    fn matches_by_catalog_id_or_code() {
        let mut product = Product::new("USB-C Hub", 79.0);
        product.product_code = Some("product_1_hub".to_string());
        let line = CartItem::snapshot(&product, 1);
        assert!(line.is_for(&product));

        let mut legacy = line.clone();
        legacy.product_id = Uuid::new_v4();
        assert!(legacy.is_for(&product));

        let other = Product::new("Laptop Stand", 49.0);
        assert!(!line.is_for(&other));
    }
}
