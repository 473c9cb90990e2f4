//! Store ports for users and the product catalog
//!
//! Services receive these as trait objects at construction; the PostgreSQL
//! adapters serve production traffic and the in-memory adapter backs tests
//! and database-less runs.

use async_trait::async_trait;
use common::StoreResult;
use uuid::Uuid;

use crate::models::{ProfileUpdate, Product, User};

pub mod memory;
pub mod product;
pub mod user;

pub use memory::MemoryStore;
pub use product::PgProductRepository;
pub use user::PgUserRepository;

/// Persistence port for user documents
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; duplicate email or phone yields `StoreError::Duplicate`
    async fn insert(&self, user: &User) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_phone(&self, phone: &str) -> StoreResult<Option<User>>;

    async fn find_by_refresh_token(&self, refresh_token: &str) -> StoreResult<Option<User>>;

    /// Overwrite the persisted token pair; returns false when the user is absent
    async fn update_tokens(
        &self,
        id: Uuid,
        token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> StoreResult<bool>;

    /// Replace the token pair only while `current_refresh` is still the
    /// persisted refresh token; returns false when it was already rotated
    async fn rotate_tokens(
        &self,
        id: Uuid,
        current_refresh: &str,
        token: &str,
        refresh_token: &str,
    ) -> StoreResult<bool>;

    /// Apply the present fields of `update`, returning the updated user
    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate)
    -> StoreResult<Option<User>>;

    /// Write the cart, address book and order history of `user` if the stored
    /// version still equals `user.version`, bumping the version on success
    ///
    /// Returns false and writes nothing on a version mismatch or a missing user.
    async fn replace_embedded(&self, user: &User) -> StoreResult<bool>;
}

/// Persistence port for catalog products
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list_all(&self) -> StoreResult<Vec<Product>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>>;

    /// Look up a product by its human-readable code
    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Product>>;

    /// Case-insensitive substring match on the product name
    async fn search_by_name(&self, fragment: &str) -> StoreResult<Vec<Product>>;

    async fn count(&self) -> StoreResult<i64>;

    /// Insert products, skipping codes that already exist; returns the number inserted
    async fn insert_many(&self, products: &[Product]) -> StoreResult<u64>;
}
