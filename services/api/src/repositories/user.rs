//! PostgreSQL adapter for user documents

use std::time::Duration;

use async_trait::async_trait;
use common::{
    StoreResult,
    timeout::{retry_read, with_timeout},
};
use sqlx::{PgPool, Row, postgres::PgRow, types::Json};
use uuid::Uuid;

use super::UserStore;
use crate::models::{Address, CartItem, Order, ProfileUpdate, User};

const USER_COLUMNS: &str = "id, first_name, last_name, email, phone, password_hash, token, \
     refresh_token, cart, addresses, orders, version, created_at, updated_at";

/// Column a single-user lookup filters on
#[derive(Debug, Clone, Copy)]
enum UserKey<'a> {
    Id(Uuid),
    Email(&'a str),
    Phone(&'a str),
    RefreshToken(&'a str),
}

impl UserKey<'_> {
    fn column(&self) -> &'static str {
        match self {
            UserKey::Id(_) => "id",
            UserKey::Email(_) => "email",
            UserKey::Phone(_) => "phone",
            UserKey::RefreshToken(_) => "refresh_token",
        }
    }
}

/// User repository for database operations
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgUserRepository {
    /// Create a new user repository with a per-call deadline
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn fetch(&self, key: UserKey<'_>) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {} = $1", key.column());
        let query = sqlx::query(&sql);
        let query = match key {
            UserKey::Id(id) => query.bind(id),
            UserKey::Email(value) | UserKey::Phone(value) | UserKey::RefreshToken(value) => {
                query.bind(value)
            }
        };

        with_timeout(self.timeout, async {
            let row = query.fetch_optional(&self.pool).await?;
            row.as_ref().map(user_from_row).transpose()
        })
        .await
    }
}

fn user_from_row(row: &PgRow) -> StoreResult<User> {
    let Json(cart): Json<Vec<CartItem>> = row.try_get("cart")?;
    let Json(addresses): Json<Vec<Address>> = row.try_get("addresses")?;
    let Json(orders): Json<Vec<Order>> = row.try_get("orders")?;

    Ok(User {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        password_hash: row.try_get("password_hash")?,
        token: row.try_get("token")?,
        refresh_token: row.try_get("refresh_token")?,
        cart,
        addresses,
        orders,
        version: row.try_get("version")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        with_timeout(self.timeout, async {
            sqlx::query(
                r#"
                INSERT INTO users (id, first_name, last_name, email, phone, password_hash,
                                   token, refresh_token, cart, addresses, orders, version,
                                   created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                "#,
            )
            .bind(user.id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.password_hash)
            .bind(&user.token)
            .bind(&user.refresh_token)
            .bind(Json(&user.cart))
            .bind(Json(&user.addresses))
            .bind(Json(&user.orders))
            .bind(user.version)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        retry_read("find user by id", move || self.fetch(UserKey::Id(id))).await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        retry_read("find user by email", move || {
            self.fetch(UserKey::Email(email))
        })
        .await
    }

    async fn find_by_phone(&self, phone: &str) -> StoreResult<Option<User>> {
        retry_read("find user by phone", move || {
            self.fetch(UserKey::Phone(phone))
        })
        .await
    }

    async fn find_by_refresh_token(&self, refresh_token: &str) -> StoreResult<Option<User>> {
        retry_read("find user by refresh token", move || {
            self.fetch(UserKey::RefreshToken(refresh_token))
        })
        .await
    }

    async fn update_tokens(
        &self,
        id: Uuid,
        token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> StoreResult<bool> {
        with_timeout(self.timeout, async {
            let result = sqlx::query(
                r#"
                UPDATE users
                SET token = $2, refresh_token = $3, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(id)
            .bind(token)
            .bind(refresh_token)
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn rotate_tokens(
        &self,
        id: Uuid,
        current_refresh: &str,
        token: &str,
        refresh_token: &str,
    ) -> StoreResult<bool> {
        with_timeout(self.timeout, async {
            let result = sqlx::query(
                r#"
                UPDATE users
                SET token = $3, refresh_token = $4, updated_at = NOW()
                WHERE id = $1 AND refresh_token = $2
                "#,
            )
            .bind(id)
            .bind(current_refresh)
            .bind(token)
            .bind(refresh_token)
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected() == 1)
        })
        .await
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> StoreResult<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        with_timeout(self.timeout, async {
            let row = sqlx::query(&sql)
                .bind(id)
                .bind(&update.first_name)
                .bind(&update.last_name)
                .bind(&update.email)
                .bind(&update.phone)
                .fetch_optional(&self.pool)
                .await?;
            row.as_ref().map(user_from_row).transpose()
        })
        .await
    }

    async fn replace_embedded(&self, user: &User) -> StoreResult<bool> {
        with_timeout(self.timeout, async {
            let result = sqlx::query(
                r#"
                UPDATE users
                SET cart = $2, addresses = $3, orders = $4,
                    version = version + 1, updated_at = NOW()
                WHERE id = $1 AND version = $5
                "#,
            )
            .bind(user.id)
            .bind(Json(&user.cart))
            .bind(Json(&user.addresses))
            .bind(Json(&user.orders))
            .bind(user.version)
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected() == 1)
        })
        .await
    }
}
