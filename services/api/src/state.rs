//! Application state shared across handlers

use std::sync::Arc;

use auth::JwtService;

use crate::{
    config::PaymentSettings,
    repositories::{ProductStore, UserStore},
    services::{AccountService, AddressService, CartService, CatalogService, OrderService},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub accounts: AccountService,
    pub catalog: CatalogService,
    pub carts: CartService,
    pub orders: OrderService,
    pub addresses: AddressService,
    pub payment: Arc<PaymentSettings>,
}

impl AppState {
    /// Wire every service to the given store ports
    pub fn new(
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
        jwt_service: JwtService,
        payment: PaymentSettings,
    ) -> Self {
        let catalog = CatalogService::new(products);
        Self {
            accounts: AccountService::new(users.clone(), jwt_service.clone()),
            carts: CartService::new(users.clone(), catalog.clone()),
            orders: OrderService::new(users.clone(), catalog.clone()),
            addresses: AddressService::new(users),
            catalog,
            jwt_service,
            payment: Arc::new(payment),
        }
    }
}
