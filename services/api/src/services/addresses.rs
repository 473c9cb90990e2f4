//! Address book mutations

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::{ShopError, ShopResult, mutate_user, parse_id};
use crate::{
    models::{Address, AddressUpdate, NewAddress, address::MAX_ADDRESSES},
    repositories::UserStore,
};

#[derive(Clone)]
pub struct AddressService {
    users: Arc<dyn UserStore>,
}

impl AddressService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn list(&self, user_id: Uuid) -> ShopResult<Vec<Address>> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ShopError::UserNotFound)?;
        Ok(user.addresses)
    }

    /// Append an address, refusing a third one
    pub async fn add(&self, user_id: Uuid, new: NewAddress) -> ShopResult<Address> {
        let fields = [
            &new.house_name,
            &new.street_name,
            &new.city_name,
            &new.pin_code,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ShopError::Validation(
                "All address fields are required".to_string(),
            ));
        }

        let address = Address::from(new);
        let added = mutate_user(self.users.as_ref(), user_id, "add address", |user| {
            if user.addresses.len() >= MAX_ADDRESSES {
                return Err(ShopError::AddressLimitExceeded);
            }
            user.addresses.push(address.clone());
            Ok(address.clone())
        })
        .await
        .inspect_err(|e| {
            if matches!(e, ShopError::AddressLimitExceeded) {
                warn!("User {} already holds {} addresses", user_id, MAX_ADDRESSES);
            }
        })?;

        info!("Added address {} for user {}", added.id, user_id);
        Ok(added)
    }

    /// Apply the non-empty fields of `update` to one address
    pub async fn update(
        &self,
        user_id: Uuid,
        address_id: &str,
        update: AddressUpdate,
    ) -> ShopResult<Address> {
        let address_id = parse_id(address_id).ok_or(ShopError::AddressNotFound)?;
        if update.is_empty() {
            return Err(ShopError::Validation("No fields to update".to_string()));
        }

        let updated = mutate_user(self.users.as_ref(), user_id, "update address", |user| {
            let address = user
                .addresses
                .iter_mut()
                .find(|a| a.id == address_id)
                .ok_or(ShopError::AddressNotFound)?;
            update.apply_to(address);
            Ok(address.clone())
        })
        .await?;

        info!("Updated address {} for user {}", address_id, user_id);
        Ok(updated)
    }

    /// Remove an address by ID; unknown IDs leave the book unchanged
    pub async fn delete(&self, user_id: Uuid, address_id: &str) -> ShopResult<()> {
        let Some(address_id) = parse_id(address_id) else {
            self.list(user_id).await?;
            return Ok(());
        };

        let removed = mutate_user(self.users.as_ref(), user_id, "delete address", |user| {
            let before = user.addresses.len();
            user.addresses.retain(|a| a.id != address_id);
            Ok(before - user.addresses.len())
        })
        .await?;

        if removed > 0 {
            info!("Deleted address {} for user {}", address_id, user_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repositories::MemoryStore, services::testing::customer};

    fn address(house: &str) -> NewAddress {
        NewAddress {
            house_name: house.to_string(),
            street_name: "Park Street".to_string(),
            city_name: "Kolkata".to_string(),
            pin_code: "700016".to_string(),
        }
    }

    async fn setup() -> (Arc<MemoryStore>, AddressService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), AddressService::new(store))
    }

    #[tokio::test]
    async fn third_address_is_refused() {
        let (store, book) = setup().await;
        let user = customer(&store).await;

        book.add(user.id, address("Home")).await.unwrap();
        book.add(user.id, address("Work")).await.unwrap();
        let err = book.add(user.id, address("Cottage")).await.unwrap_err();
        assert!(matches!(err, ShopError::AddressLimitExceeded));

        assert_eq!(book.list(user.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn incomplete_address_is_rejected() {
        let (store, book) = setup().await;
        let user = customer(&store).await;

        let mut partial = address("Home");
        partial.pin_code = "  ".to_string();
        let err = book.add(user.id, partial).await.unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }

    #[tokio::test]
    async fn update_targets_address_by_id() {
        let (store, book) = setup().await;
        let user = customer(&store).await;
        let home = book.add(user.id, address("Home")).await.unwrap();
        let work = book.add(user.id, address("Work")).await.unwrap();

        let update = AddressUpdate {
            city_name: Some("Howrah".to_string()),
            ..AddressUpdate::default()
        };
        let updated = book
            .update(user.id, &work.id.to_string(), update)
            .await
            .unwrap();
        assert_eq!(updated.city_name, "Howrah");
        assert_eq!(updated.house_name, "Work");

        let list = book.list(user.id).await.unwrap();
        assert_eq!(list[0], home);
        assert_eq!(list[1].city_name, "Howrah");
    }

    #[tokio::test]
    async fn update_of_unknown_address_is_not_found() {
        let (store, book) = setup().await;
        let user = customer(&store).await;

        let update = AddressUpdate {
            city_name: Some("Howrah".to_string()),
            ..AddressUpdate::default()
        };
        let err = book
            .update(user.id, &Uuid::new_v4().to_string(), update)
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::AddressNotFound));
    }

    #[tokio::test]
    async fn delete_frees_a_slot() {
        let (store, book) = setup().await;
        let user = customer(&store).await;
        let home = book.add(user.id, address("Home")).await.unwrap();
        book.add(user.id, address("Work")).await.unwrap();

        book.delete(user.id, &home.id.to_string()).await.unwrap();
        book.add(user.id, address("New Home")).await.unwrap();

        book.delete(user.id, &home.id.to_string()).await.unwrap();
        assert_eq!(book.list(user.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn deleting_unknown_address_is_a_no_op() {
        let (store, book) = setup().await;
        let user = customer(&store).await;
        let home = book.add(user.id, address("Home")).await.unwrap();

        book.delete(user.id, &Uuid::new_v4().to_string()).await.unwrap();
        book.delete(user.id, "not-an-id").await.unwrap();
        assert_eq!(book.list(user.id).await.unwrap(), vec![home]);

        let err = book.delete(Uuid::new_v4(), "not-an-id").await.unwrap_err();
        assert!(matches!(err, ShopError::UserNotFound));
    }
}
