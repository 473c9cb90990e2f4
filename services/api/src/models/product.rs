//! Catalog product model

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: Uuid,
    /// Human-readable product code, e.g. `product_1718000000_ab12cd34e`
    pub product_code: Option<String>,
    pub product_name: String,
    pub price: f64,
    pub rating: Option<f64>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub stock: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a new product stamped with the current time
    pub fn new(product_name: impl Into<String>, price: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            product_code: None,
            product_name: product_name.into(),
            price,
            rating: None,
            category: None,
            image: None,
            stock: None,
            created_at: now,
            updated_at: now,
        }
    }
}
