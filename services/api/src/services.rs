//! Domain services: catalog, cart, orders, address book and accounts
//!
//! Every mutation of a user's embedded documents goes through
//! [`mutate_user`], which re-reads and re-applies the change when another
//! writer bumped the user's version in between.

use auth::AuthError;
use common::StoreError;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::{models::User, repositories::UserStore};

pub mod accounts;
pub mod addresses;
pub mod cart;
pub mod catalog;
pub mod orders;

pub use accounts::AccountService;
pub use addresses::AddressService;
pub use cart::CartService;
pub use catalog::CatalogService;
pub use orders::OrderService;

/// Attempts made for one optimistic write before giving up
pub const MAX_WRITE_ATTEMPTS: u32 = 10;

/// Domain error
#[derive(Debug, Error)]
pub enum ShopError {
    #[error("User not found")]
    UserNotFound,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Cart item not found")]
    ItemNotFound,

    #[error("Address not found")]
    AddressNotFound,

    #[error("Order not found")]
    OrderNotFound,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Not Allowed: at most 2 addresses (home and work) may be saved")]
    AddressLimitExceeded,

    #[error("login or password incorrect")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

/// Type alias for Result with ShopError
pub type ShopResult<T> = Result<T, ShopError>;

/// Load a user, apply `apply` to the in-memory copy and write the embedded
/// documents back under a version check
///
/// An error from `apply` aborts without writing. A lost version check writes
/// nothing, so the whole load/apply/write cycle is repeated on a fresh copy.
pub(crate) async fn mutate_user<T, F>(
    users: &dyn UserStore,
    user_id: Uuid,
    operation: &str,
    mut apply: F,
) -> ShopResult<T>
where
    F: FnMut(&mut User) -> ShopResult<T>,
{
    for attempt in 1..=MAX_WRITE_ATTEMPTS {
        let mut user = users
            .find_by_id(user_id)
            .await?
            .ok_or(ShopError::UserNotFound)?;

        let outcome = apply(&mut user)?;

        if users.replace_embedded(&user).await? {
            return Ok(outcome);
        }
        warn!(
            "{} for user {} lost a concurrent write (attempt {}/{})",
            operation, user_id, attempt, MAX_WRITE_ATTEMPTS
        );
    }

    Err(ShopError::Store(StoreError::Unavailable(format!(
        "{operation} kept conflicting with concurrent writes"
    ))))
}

/// Parse a path identifier, treating anything malformed as absent
pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use super::catalog::CatalogService;
    use crate::{
        models::{Product, User},
        repositories::{MemoryStore, UserStore},
    };

    /// Fresh in-memory store with the demo catalog loaded
    pub async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        CatalogService::new(store.clone())
            .ensure_seeded()
            .await
            .unwrap();
        store
    }

    pub async fn customer(store: &MemoryStore) -> User {
        let user = User::new(
            "Asha".to_string(),
            "Rao".to_string(),
            format!("asha.{}@shop.test", uuid::Uuid::new_v4().simple()),
            format!("98{}", &uuid::Uuid::new_v4().as_u128().to_string()[..8]),
            "not-a-real-hash".to_string(),
        );
        store.insert(&user).await.unwrap();
        user
    }

    pub async fn product_named(store: &MemoryStore, name: &str) -> Product {
        use crate::repositories::ProductStore;
        store
            .search_by_name(name)
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.product_name == name)
            .unwrap()
    }
}
