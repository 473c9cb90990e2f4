//! Order materialization: cart checkout and instant purchase

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::{CatalogService, ShopError, ShopResult, cart::line_quantity, mutate_user, parse_id};
use crate::{
    models::{CartItem, CheckoutOptions, CheckoutReceipt, Order, OrderStatus},
    repositories::UserStore,
};

#[derive(Clone)]
pub struct OrderService {
    users: Arc<dyn UserStore>,
    catalog: CatalogService,
}

impl OrderService {
    pub fn new(users: Arc<dyn UserStore>, catalog: CatalogService) -> Self {
        Self { users, catalog }
    }

    /// Turn the whole cart into an order and empty the cart in the same write
    pub async fn checkout(
        &self,
        user_id: Uuid,
        options: CheckoutOptions,
    ) -> ShopResult<CheckoutReceipt> {
        let payment_method = options.payment_method.unwrap_or_default();

        let order = mutate_user(self.users.as_ref(), user_id, "checkout", |user| {
            if user.cart.is_empty() {
                return Err(ShopError::EmptyCart);
            }
            let delivery_address = match options.address_id {
                Some(id) => Some(
                    user.addresses
                        .iter()
                        .find(|a| a.id == id)
                        .cloned()
                        .ok_or(ShopError::AddressNotFound)?,
                ),
                None => None,
            };

            let items = std::mem::take(&mut user.cart);
            let order = Order::from_items(
                items,
                payment_method,
                OrderStatus::Completed,
                delivery_address,
            );
            user.orders.push(order.clone());
            Ok(order)
        })
        .await
        .inspect_err(|e| {
            if matches!(e, ShopError::EmptyCart) {
                warn!("Checkout rejected for user {}: cart is empty", user_id);
            }
        })?;

        info!(
            "User {} checked out order {} ({} lines, total {:.2})",
            user_id,
            order.id,
            order.order_list.len(),
            order.total_price
        );
        Ok(CheckoutReceipt::from(&order))
    }

    /// Buy one product directly, leaving the cart untouched
    pub async fn instant_buy(
        &self,
        user_id: Uuid,
        product_id: &str,
        quantity: i64,
    ) -> ShopResult<Order> {
        let quantity = line_quantity(quantity)?;
        let product = self.catalog.find(product_id).await?;

        let order = mutate_user(self.users.as_ref(), user_id, "instant buy", |user| {
            let order = Order::from_items(
                vec![CartItem::snapshot(&product, quantity)],
                Default::default(),
                OrderStatus::Placed,
                None,
            );
            user.orders.push(order.clone());
            Ok(order)
        })
        .await?;

        info!(
            "User {} instantly bought {} x {} as order {}",
            user_id, quantity, product.id, order.id
        );
        Ok(order)
    }

    /// Order history, oldest first
    pub async fn list(&self, user_id: Uuid) -> ShopResult<Vec<Order>> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ShopError::UserNotFound)?;
        Ok(user.orders)
    }

    pub async fn get(&self, user_id: Uuid, order_id: &str) -> ShopResult<Order> {
        let order_id = parse_id(order_id).ok_or(ShopError::OrderNotFound)?;
        self.list(user_id)
            .await?
            .into_iter()
            .find(|o| o.id == order_id)
            .ok_or(ShopError::OrderNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{NewAddress, PaymentMethod},
        repositories::MemoryStore,
        services::{
            AddressService, CartService,
            testing::{customer, product_named, seeded_store},
        },
    };

    struct Fixture {
        store: Arc<MemoryStore>,
        carts: CartService,
        orders: OrderService,
    }

    async fn setup() -> Fixture {
        let store = seeded_store().await;
        let catalog = CatalogService::new(store.clone());
        Fixture {
            carts: CartService::new(store.clone(), catalog.clone()),
            orders: OrderService::new(store.clone(), catalog),
            store,
        }
    }

    #[tokio::test]
    async fn cart_scenario_ends_in_one_order() {
        let fx = setup().await;
        let user = customer(&fx.store).await;
        let p1 = product_named(&fx.store, "Gaming Monitor").await;
        let p2 = product_named(&fx.store, "Wireless Mouse").await;

        let cart = fx.carts.add(user.id, &p1.id.to_string(), 2).await.unwrap();
        assert_eq!((cart.len(), cart[0].quantity), (1, 2));
        let cart = fx.carts.add(user.id, &p1.id.to_string(), 3).await.unwrap();
        assert_eq!((cart.len(), cart[0].quantity), (1, 5));
        let cart = fx.carts.add(user.id, &p2.id.to_string(), 1).await.unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart[1].quantity, 1);

        let receipt = fx
            .orders
            .checkout(user.id, CheckoutOptions::default())
            .await
            .unwrap();
        assert_eq!(receipt.items, 2);
        assert_eq!(receipt.total, p1.price * 5.0 + p2.price);

        let orders = fx.orders.list(user.id).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_list, cart);
        assert_eq!(orders[0].status, OrderStatus::Completed);
        assert_eq!(orders[0].payment_method, PaymentMethod::CashOnDelivery);
        assert!(fx.carts.get_with_total(user.id).await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn empty_cart_checkout_changes_nothing() {
        let fx = setup().await;
        let user = customer(&fx.store).await;

        let err = fx
            .orders
            .checkout(user.id, CheckoutOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::EmptyCart));

        let stored = UserStore::find_by_id(fx.store.as_ref(), user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.version, user.version);
        assert!(stored.orders.is_empty());
    }

    #[tokio::test]
    async fn checkout_snapshots_chosen_address() {
        let fx = setup().await;
        let user = customer(&fx.store).await;
        let addresses = AddressService::new(fx.store.clone());
        let home = addresses
            .add(
                user.id,
                NewAddress {
                    house_name: "Rose Villa".to_string(),
                    street_name: "MG Road".to_string(),
                    city_name: "Pune".to_string(),
                    pin_code: "411001".to_string(),
                },
            )
            .await
            .unwrap();
        let hub = product_named(&fx.store, "USB-C Hub").await;
        fx.carts.add(user.id, &hub.id.to_string(), 1).await.unwrap();

        let missing = CheckoutOptions {
            address_id: Some(Uuid::new_v4()),
            ..CheckoutOptions::default()
        };
        let err = fx.orders.checkout(user.id, missing).await.unwrap_err();
        assert!(matches!(err, ShopError::AddressNotFound));

        let options = CheckoutOptions {
            payment_method: Some(PaymentMethod::Digital),
            address_id: Some(home.id),
        };
        let receipt = fx.orders.checkout(user.id, options).await.unwrap();

        let order = fx
            .orders
            .get(user.id, &receipt.order_id.to_string())
            .await
            .unwrap();
        assert_eq!(order.delivery_address, Some(home));
        assert_eq!(order.payment_method, PaymentMethod::Digital);
    }

    #[tokio::test]
    async fn instant_buy_leaves_cart_alone() {
        let fx = setup().await;
        let user = customer(&fx.store).await;
        let stand = product_named(&fx.store, "Laptop Stand").await;
        let watch = product_named(&fx.store, "Smart Watch").await;
        fx.carts.add(user.id, &stand.id.to_string(), 1).await.unwrap();

        let order = fx
            .orders
            .instant_buy(user.id, &watch.id.to_string(), 2)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.total_price, 398.0);
        assert_eq!(order.order_list.len(), 1);

        let cart = fx.carts.get_with_total(user.id).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product_id, stand.id);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let fx = setup().await;
        let user = customer(&fx.store).await;

        let err = fx
            .orders
            .get(user.id, &Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::OrderNotFound));
        let err = fx.orders.get(user.id, "garbage").await.unwrap_err();
        assert!(matches!(err, ShopError::OrderNotFound));
    }
}
