//! PostgreSQL adapter for the product catalog

use std::time::Duration;

use async_trait::async_trait;
use common::{
    StoreResult,
    timeout::{retry_read, with_timeout},
};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use super::ProductStore;
use crate::models::Product;

const PRODUCT_COLUMNS: &str =
    "id, product_code, product_name, price, rating, category, image, stock, created_at, updated_at";

/// Product repository for database operations
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgProductRepository {
    /// Create a new product repository with a per-call deadline
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn fetch_all(&self) -> StoreResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             ORDER BY created_at, product_name"
        );
        with_timeout(self.timeout, async {
            let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
            rows.iter().map(product_from_row).collect()
        })
        .await
    }

    async fn fetch_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        with_timeout(self.timeout, async {
            let row = sqlx::query(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            row.as_ref().map(product_from_row).transpose()
        })
        .await
    }

    async fn fetch_by_code(&self, code: &str) -> StoreResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE product_code = $1");
        with_timeout(self.timeout, async {
            let row = sqlx::query(&sql)
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;
            row.as_ref().map(product_from_row).transpose()
        })
        .await
    }

    async fn fetch_matching(&self, pattern: &str) -> StoreResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE product_name ILIKE $1 ESCAPE '\\' ORDER BY product_name"
        );
        with_timeout(self.timeout, async {
            let rows = sqlx::query(&sql)
                .bind(pattern)
                .fetch_all(&self.pool)
                .await?;
            rows.iter().map(product_from_row).collect()
        })
        .await
    }

    async fn fetch_count(&self) -> StoreResult<i64> {
        with_timeout(self.timeout, async {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
                .fetch_one(&self.pool)
                .await?;
            Ok(count)
        })
        .await
    }
}

fn product_from_row(row: &PgRow) -> StoreResult<Product> {
    Ok(Product {
        id: row.try_get("id")?,
        product_code: row.try_get("product_code")?,
        product_name: row.try_get("product_name")?,
        price: row.try_get("price")?,
        rating: row.try_get("rating")?,
        category: row.try_get("category")?,
        image: row.try_get("image")?,
        stock: row.try_get("stock")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Build an ILIKE pattern matching `fragment` literally anywhere in the name
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl ProductStore for PgProductRepository {
    async fn list_all(&self) -> StoreResult<Vec<Product>> {
        retry_read("list products", move || self.fetch_all()).await
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        retry_read("find product by id", move || self.fetch_by_id(id)).await
    }

    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Product>> {
        retry_read("find product by code", move || self.fetch_by_code(code)).await
    }

    async fn search_by_name(&self, fragment: &str) -> StoreResult<Vec<Product>> {
        let pattern = contains_pattern(fragment);
        let pattern = pattern.as_str();
        retry_read("search products", move || self.fetch_matching(pattern)).await
    }

    async fn count(&self) -> StoreResult<i64> {
        retry_read("count products", move || self.fetch_count()).await
    }

    async fn insert_many(&self, products: &[Product]) -> StoreResult<u64> {
        with_timeout(self.timeout, async {
            let mut tx = self.pool.begin().await?;
            let mut inserted = 0;
            for product in products {
                let result = sqlx::query(
                    r#"
                    INSERT INTO products (id, product_code, product_name, price, rating,
                                          category, image, stock, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    ON CONFLICT DO NOTHING
                    "#,
                )
                .bind(product.id)
                .bind(&product.product_code)
                .bind(&product.product_name)
                .bind(product.price)
                .bind(product.rating)
                .bind(&product.category)
                .bind(&product.image)
                .bind(product.stock)
                .bind(product.created_at)
                .bind(product.updated_at)
                .execute(&mut *tx)
                .await?;
                inserted += result.rows_affected();
            }
            tx.commit().await?;
            Ok(inserted)
        })
        .await
    }
}
