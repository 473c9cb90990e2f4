//! Cart mutations over a user's embedded cart

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{CatalogService, ShopError, ShopResult, mutate_user, parse_id};
use crate::{
    models::{CartItem, CartView},
    repositories::UserStore,
};

/// Convert a requested quantity into a line quantity
pub(crate) fn line_quantity(quantity: i64) -> ShopResult<u32> {
    if quantity < 1 {
        return Err(ShopError::InvalidQuantity);
    }
    u32::try_from(quantity).map_err(|_| ShopError::Validation("Quantity is too large".to_string()))
}

#[derive(Clone)]
pub struct CartService {
    users: Arc<dyn UserStore>,
    catalog: CatalogService,
}

impl CartService {
    pub fn new(users: Arc<dyn UserStore>, catalog: CatalogService) -> Self {
        Self { users, catalog }
    }

    /// Add `quantity` of a product, merging with an existing line for it
    pub async fn add(
        &self,
        user_id: Uuid,
        product_id: &str,
        quantity: i64,
    ) -> ShopResult<Vec<CartItem>> {
        let quantity = line_quantity(quantity)?;
        let product = self.catalog.find(product_id).await?;

        let cart = mutate_user(self.users.as_ref(), user_id, "add to cart", |user| {
            match user.cart.iter_mut().find(|item| item.is_for(&product)) {
                Some(item) => item.quantity = item.quantity.saturating_add(quantity),
                None => user.cart.push(CartItem::snapshot(&product, quantity)),
            }
            Ok(user.cart.clone())
        })
        .await?;

        info!(
            "Added {} x {} to cart of user {}",
            quantity, product.id, user_id
        );
        Ok(cart)
    }

    /// Remove every line whose item ID, catalog ID or product code equals `id`
    pub async fn remove(&self, user_id: Uuid, id: &str) -> ShopResult<Vec<CartItem>> {
        let id = id.trim();
        let uuid = parse_id(id);

        let cart = mutate_user(self.users.as_ref(), user_id, "remove from cart", |user| {
            user.cart.retain(|item| {
                let by_uuid = uuid.is_some_and(|u| item.id == u || item.product_id == u);
                let by_code = item.product_code.as_deref() == Some(id);
                !(by_uuid || by_code)
            });
            Ok(user.cart.clone())
        })
        .await?;

        info!("Removed {} from cart of user {}", id, user_id);
        Ok(cart)
    }

    /// Overwrite the quantity of one cart line
    pub async fn update_quantity(
        &self,
        user_id: Uuid,
        item_id: &str,
        quantity: i64,
    ) -> ShopResult<CartItem> {
        let quantity = line_quantity(quantity)?;
        let item_id = parse_id(item_id).ok_or(ShopError::ItemNotFound)?;

        let item = mutate_user(self.users.as_ref(), user_id, "update cart item", |user| {
            let item = user
                .cart
                .iter_mut()
                .find(|item| item.id == item_id)
                .ok_or(ShopError::ItemNotFound)?;
            item.quantity = quantity;
            Ok(item.clone())
        })
        .await?;

        info!(
            "Set quantity of cart item {} to {} for user {}",
            item_id, quantity, user_id
        );
        Ok(item)
    }

    /// Empty the cart
    pub async fn clear(&self, user_id: Uuid) -> ShopResult<()> {
        mutate_user(self.users.as_ref(), user_id, "clear cart", |user| {
            user.cart.clear();
            Ok(())
        })
        .await?;

        info!("Cleared cart of user {}", user_id);
        Ok(())
    }

    /// Current cart with its derived total
    pub async fn get_with_total(&self, user_id: Uuid) -> ShopResult<CartView> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ShopError::UserNotFound)?;
        Ok(CartView::new(user.cart))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        repositories::MemoryStore,
        services::testing::{customer, product_named, seeded_store},
    };

    async fn setup() -> (Arc<MemoryStore>, CartService) {
        let store = seeded_store().await;
        let carts = CartService::new(store.clone(), CatalogService::new(store.clone()));
        (store, carts)
    }

    #[tokio::test]
    async fn repeated_adds_accumulate_on_one_line() {
        let (store, carts) = setup().await;
        let user = customer(&store).await;
        let hub = product_named(&store, "USB-C Hub").await;
        let stand = product_named(&store, "Laptop Stand").await;

        carts.add(user.id, &hub.id.to_string(), 2).await.unwrap();
        let cart = carts.add(user.id, &hub.id.to_string(), 3).await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 5);

        let cart = carts.add(user.id, &stand.id.to_string(), 1).await.unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart[0].product_id, hub.id);
        assert_eq!(cart[1].product_id, stand.id);
        assert_eq!(cart[1].quantity, 1);
    }

    #[tokio::test]
    async fn adding_by_code_merges_with_adding_by_id() {
        let (store, carts) = setup().await;
        let user = customer(&store).await;
        let mouse = product_named(&store, "Wireless Mouse").await;
        let code = mouse.product_code.clone().unwrap();

        carts.add(user.id, &mouse.id.to_string(), 1).await.unwrap();
        let cart = carts.add(user.id, &code, 1).await.unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 2);
    }

    #[tokio::test]
    async fn add_then_remove_leaves_no_line() {
        let (store, carts) = setup().await;
        let user = customer(&store).await;
        let speaker = product_named(&store, "Bluetooth Speaker").await;

        carts.add(user.id, &speaker.id.to_string(), 7).await.unwrap();
        let cart = carts.remove(user.id, &speaker.id.to_string()).await.unwrap();
        assert!(cart.iter().all(|item| item.product_id != speaker.id));
    }

    #[tokio::test]
    async fn remove_accepts_line_id() {
        let (store, carts) = setup().await;
        let user = customer(&store).await;
        let speaker = product_named(&store, "Bluetooth Speaker").await;

        let cart = carts.add(user.id, &speaker.id.to_string(), 1).await.unwrap();
        let cart = carts.remove(user.id, &cart[0].id.to_string()).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn add_rejects_bad_quantity_and_unknown_product() {
        let (store, carts) = setup().await;
        let user = customer(&store).await;
        let watch = product_named(&store, "Smart Watch").await;

        let err = carts.add(user.id, &watch.id.to_string(), 0).await.unwrap_err();
        assert!(matches!(err, ShopError::InvalidQuantity));

        let err = carts
            .add(user.id, &Uuid::new_v4().to_string(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::ProductNotFound));

        let err = carts
            .add(Uuid::new_v4(), &watch.id.to_string(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::UserNotFound));
    }

    #[tokio::test]
    async fn update_quantity_overwrites_matching_line() {
        let (store, carts) = setup().await;
        let user = customer(&store).await;
        let keyboard = product_named(&store, "Mechanical Keyboard").await;

        let cart = carts.add(user.id, &keyboard.id.to_string(), 1).await.unwrap();
        let line_id = cart[0].id.to_string();

        let item = carts.update_quantity(user.id, &line_id, 4).await.unwrap();
        assert_eq!(item.quantity, 4);

        let err = carts.update_quantity(user.id, &line_id, 0).await.unwrap_err();
        assert!(matches!(err, ShopError::InvalidQuantity));

        let err = carts
            .update_quantity(user.id, &Uuid::new_v4().to_string(), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::ItemNotFound));
    }

    #[tokio::test]
    async fn total_tracks_contents() {
        let (store, carts) = setup().await;
        let user = customer(&store).await;
        assert_eq!(carts.get_with_total(user.id).await.unwrap().total, 0.0);

        let monitor = product_named(&store, "Gaming Monitor").await;
        let mouse = product_named(&store, "Wireless Mouse").await;
        carts.add(user.id, &monitor.id.to_string(), 2).await.unwrap();
        carts.add(user.id, &mouse.id.to_string(), 3).await.unwrap();

        let view = carts.get_with_total(user.id).await.unwrap();
        assert_eq!(view.total, 449.0 * 2.0 + 89.0 * 3.0);
        assert_eq!(view.total_items, 2);

        carts.clear(user.id).await.unwrap();
        let view = carts.get_with_total(user.id).await.unwrap();
        assert!(view.items.is_empty());
        assert_eq!(view.total, 0.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_lose_no_updates() {
        let (store, carts) = setup().await;
        let user = customer(&store).await;
        let names = ["Wireless Headphones", "Smart Watch", "USB-C Hub", "Laptop Stand"];
        let mut ids = Vec::new();
        for name in names {
            ids.push(product_named(&store, name).await.id.to_string());
        }

        let user_id = user.id;
        let mut tasks = Vec::new();
        for id in ids.iter().chain(ids.iter()) {
            let carts = carts.clone();
            let id = id.clone();
            tasks.push(tokio::spawn(async move { carts.add(user_id, &id, 1).await }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let view = carts.get_with_total(user_id).await.unwrap();
        assert_eq!(view.items.len(), 4);
        assert!(view.items.iter().all(|item| item.quantity == 2));
    }
}
