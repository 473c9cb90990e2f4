//! In-memory store used by tests and database-less runs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use common::{StoreError, StoreResult};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ProductStore, UserStore};
use crate::models::{ProfileUpdate, Product, User};

/// Users and products held behind async read/write locks
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    products: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn ensure_unique<'a>(
    users: impl Iterator<Item = &'a User>,
    except: Option<Uuid>,
    email: Option<&str>,
    phone: Option<&str>,
) -> StoreResult<()> {
    for other in users.filter(|u| Some(u.id) != except) {
        if email.is_some_and(|e| e == other.email) {
            return Err(StoreError::Duplicate {
                field: "email".to_string(),
            });
        }
        if phone.is_some_and(|p| p == other.phone) {
            return Err(StoreError::Duplicate {
                field: "phone".to_string(),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        ensure_unique(
            users.values(),
            None,
            Some(&user.email),
            Some(&user.phone),
        )?;
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.phone == phone).cloned())
    }

    async fn find_by_refresh_token(&self, refresh_token: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.refresh_token.as_deref() == Some(refresh_token))
            .cloned())
    }

    async fn update_tokens(
        &self,
        id: Uuid,
        token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(false);
        };
        user.token = token.map(str::to_string);
        user.refresh_token = refresh_token.map(str::to_string);
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn rotate_tokens(
        &self,
        id: Uuid,
        current_refresh: &str,
        token: &str,
        refresh_token: &str,
    ) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(false);
        };
        if user.refresh_token.as_deref() != Some(current_refresh) {
            return Ok(false);
        }
        user.token = Some(token.to_string());
        user.refresh_token = Some(refresh_token.to_string());
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;
        ensure_unique(
            users.values(),
            Some(id),
            update.email.as_deref(),
            update.phone.as_deref(),
        )?;

        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(first_name) = &update.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if let Some(phone) = &update.phone {
            user.phone = phone.clone();
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn replace_embedded(&self, user: &User) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.id) {
            Some(stored) if stored.version == user.version => {
                stored.cart = user.cart.clone();
                stored.addresses = user.addresses.clone();
                stored.orders = user.orders.clone();
                stored.version += 1;
                stored.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_all(&self) -> StoreResult<Vec<Product>> {
        Ok(self.products.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .find(|p| p.product_code.as_deref() == Some(code))
            .cloned())
    }

    async fn search_by_name(&self, fragment: &str) -> StoreResult<Vec<Product>> {
        let needle = fragment.to_lowercase();
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| p.product_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.products.read().await.len() as i64)
    }

    async fn insert_many(&self, products: &[Product]) -> StoreResult<u64> {
        let mut stored = self.products.write().await;
        let mut inserted = 0;
        for product in products {
            let taken = stored.iter().any(|p| {
                p.id == product.id
                    || (product.product_code.is_some() && p.product_code == product.product_code)
            });
            if !taken {
                stored.push(product.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}
