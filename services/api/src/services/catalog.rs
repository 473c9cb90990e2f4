//! Product catalog lookups and demo catalog seeding

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use super::{ShopError, ShopResult, parse_id};
use crate::{models::Product, repositories::ProductStore};

/// Demo catalog: name, price, category, rating, image
const DEMO_PRODUCTS: [(&str, f64, &str, f64, &str); 8] = [
    (
        "Wireless Headphones",
        299.0,
        "Audio",
        4.5,
        "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=400",
    ),
    (
        "Smart Watch",
        199.0,
        "Wearables",
        4.8,
        "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=400",
    ),
    (
        "Gaming Monitor",
        449.0,
        "Electronics",
        4.7,
        "https://images.unsplash.com/photo-1527443224154-c4a3942d3acf?w=400",
    ),
    (
        "Wireless Mouse",
        89.0,
        "Gaming",
        4.6,
        "https://images.unsplash.com/photo-1527864550417-7fd91fc51a46?w=400",
    ),
    (
        "Bluetooth Speaker",
        129.0,
        "Audio",
        4.5,
        "https://images.unsplash.com/photo-1608043152269-423dbba4e7e1?w=400",
    ),
    (
        "Mechanical Keyboard",
        159.0,
        "Gaming",
        4.4,
        "https://images.unsplash.com/photo-1541140532154-b024d705b90a?w=400",
    ),
    (
        "USB-C Hub",
        79.0,
        "Accessories",
        4.3,
        "https://images.unsplash.com/photo-1587825140708-dfaf72ae4b04?w=400",
    ),
    (
        "Laptop Stand",
        49.0,
        "Accessories",
        4.2,
        "https://images.unsplash.com/photo-1527864550417-7fd91fc51a46?w=400",
    ),
];

/// Stable human-readable code of a demo product, e.g. `product_demo_usb_c_hub`
///
/// Codes are unique in the store, so re-inserting the demo catalog is a no-op.
fn demo_code(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("product_demo_{slug}")
}

fn demo_catalog() -> Vec<Product> {
    let now = Utc::now();
    DEMO_PRODUCTS
        .iter()
        .enumerate()
        .map(|(i, &(name, price, category, rating, image))| {
            let mut product = Product::new(name, price);
            product.product_code = Some(demo_code(name));
            product.category = Some(category.to_string());
            product.rating = Some(rating);
            product.image = Some(image.to_string());
            // Keep listing order stable on stores that sort by creation time
            product.created_at = now + Duration::milliseconds(i as i64);
            product.updated_at = product.created_at;
            product
        })
        .collect()
}

/// Read access to the product catalog
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductStore>,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    /// Every product in the catalog
    pub async fn list_all(&self) -> ShopResult<Vec<Product>> {
        Ok(self.products.list_all().await?)
    }

    /// Look a product up by catalog ID, falling back to its product code
    pub async fn find(&self, id: &str) -> ShopResult<Product> {
        if let Some(uuid) = parse_id(id) {
            if let Some(product) = self.products.find_by_id(uuid).await? {
                return Ok(product);
            }
        }

        self.products
            .find_by_code(id.trim())
            .await?
            .ok_or(ShopError::ProductNotFound)
    }

    /// Products whose name contains `name`, ignoring case
    pub async fn search(&self, name: &str) -> ShopResult<Vec<Product>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ShopError::Validation("Invalid Search Index".to_string()));
        }
        Ok(self.products.search_by_name(name).await?)
    }

    /// Load the demo catalog into an empty store; a populated store is left alone
    ///
    /// Returns the number of products inserted.
    pub async fn ensure_seeded(&self) -> ShopResult<u64> {
        let existing = self.products.count().await?;
        if existing > 0 {
            info!("Catalog already holds {} products, skipping seed", existing);
            return Ok(0);
        }

        let inserted = self.products.insert_many(&demo_catalog()).await?;
        info!("Seeded catalog with {} demo products", inserted);
        Ok(inserted)
    }
}
