//! Registration, login, token refresh and profile management

use std::sync::Arc;

use auth::{
    AuthError, JwtService, TokenPair,
    password::{hash_password, verify_password},
    validation::{validate_email, validate_name, validate_password, validate_phone},
};
use common::StoreError;
use tracing::{info, warn};
use uuid::Uuid;

use super::{ShopError, ShopResult};
use crate::{
    models::{LoginRequest, ProfileUpdate, RegisterRequest, User},
    repositories::UserStore,
};

fn duplicate_to_conflict(err: StoreError) -> ShopError {
    match err {
        StoreError::Duplicate { .. } => {
            ShopError::Conflict("Email or phone is already in use".to_string())
        }
        other => ShopError::Store(other),
    }
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    jwt: JwtService,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    /// Create an account after validating the payload
    pub async fn register(&self, request: RegisterRequest) -> ShopResult<User> {
        let first_name = request.first_name.trim().to_string();
        let last_name = request.last_name.trim().to_string();
        let email = request.email.trim().to_lowercase();
        let phone = request.phone.trim().to_string();

        validate_name("First name", &first_name).map_err(ShopError::Validation)?;
        validate_name("Last name", &last_name).map_err(ShopError::Validation)?;
        validate_email(&email).map_err(ShopError::Validation)?;
        validate_password(&request.password).map_err(ShopError::Validation)?;
        validate_phone(&phone).map_err(ShopError::Validation)?;

        if self.users.find_by_email(&email).await?.is_some() {
            warn!("Registration refused, email {} already registered", email);
            return Err(ShopError::Conflict("User already exists".to_string()));
        }
        if self.users.find_by_phone(&phone).await?.is_some() {
            warn!("Registration refused, phone already in use");
            return Err(ShopError::Conflict("Phone is already in use".to_string()));
        }

        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| ShopError::Internal(format!("password hashing task failed: {e}")))??;

        let mut user = User::new(first_name, last_name, email, phone, password_hash);
        let tokens = self.jwt.issue(&user.identity())?;
        user.token = Some(tokens.access_token);
        user.refresh_token = Some(tokens.refresh_token);

        // A concurrent registration can still win the unique index
        self.users.insert(&user).await.map_err(duplicate_to_conflict)?;

        info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Check credentials, then issue and persist a fresh token pair
    pub async fn login(&self, request: LoginRequest) -> ShopResult<User> {
        let email = request.email.trim().to_lowercase();
        if email.is_empty() || request.password.is_empty() {
            return Err(ShopError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let Some(mut user) = self.users.find_by_email(&email).await? else {
            warn!("Login failed for unknown email {}", email);
            return Err(ShopError::InvalidCredentials);
        };

        let hash = user.password_hash.clone();
        let password = request.password;
        let verified = tokio::task::spawn_blocking(move || verify_password(&hash, &password))
            .await
            .map_err(|e| ShopError::Internal(format!("password check task failed: {e}")))?;
        if !verified {
            warn!("Login failed for user {}: wrong password", user.id);
            return Err(ShopError::InvalidCredentials);
        }

        let tokens = self.persist_new_tokens(&user).await?;
        user.token = Some(tokens.access_token);
        user.refresh_token = Some(tokens.refresh_token);

        info!("User {} logged in", user.id);
        Ok(user)
    }

    /// Forget the persisted token pair
    pub async fn logout(&self, user_id: Uuid) -> ShopResult<()> {
        if !self.users.update_tokens(user_id, None, None).await? {
            return Err(ShopError::UserNotFound);
        }
        info!("User {} logged out", user_id);
        Ok(())
    }

    /// Exchange a valid, still-current refresh token for a new pair
    pub async fn refresh(&self, refresh_token: &str) -> ShopResult<TokenPair> {
        self.jwt.validate_refresh(refresh_token)?;

        let user = self
            .users
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or(ShopError::Auth(AuthError::Invalid))?;

        let tokens = self.jwt.issue(&user.identity())?;
        let rotated = self
            .users
            .rotate_tokens(
                user.id,
                refresh_token,
                &tokens.access_token,
                &tokens.refresh_token,
            )
            .await?;
        if !rotated {
            warn!("Refresh token of user {} was already used", user.id);
            return Err(ShopError::Auth(AuthError::Invalid));
        }

        info!("Refreshed tokens for user {}", user.id);
        Ok(tokens)
    }

    pub async fn profile(&self, user_id: Uuid) -> ShopResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ShopError::UserNotFound)
    }

    /// Apply a partial profile update
    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> ShopResult<User> {
        let update = update.normalized();
        if update.is_empty() {
            return Err(ShopError::Validation("No fields to update".to_string()));
        }
        if let Some(first_name) = &update.first_name {
            validate_name("First name", first_name).map_err(ShopError::Validation)?;
        }
        if let Some(last_name) = &update.last_name {
            validate_name("Last name", last_name).map_err(ShopError::Validation)?;
        }
        if let Some(email) = &update.email {
            validate_email(email).map_err(ShopError::Validation)?;
        }
        if let Some(phone) = &update.phone {
            validate_phone(phone).map_err(ShopError::Validation)?;
        }

        let user = self
            .users
            .update_profile(user_id, &update)
            .await
            .map_err(duplicate_to_conflict)?
            .ok_or(ShopError::UserNotFound)?;

        info!("Updated profile of user {}", user_id);
        Ok(user)
    }

    async fn persist_new_tokens(&self, user: &User) -> ShopResult<TokenPair> {
        let tokens = self.jwt.issue(&user.identity())?;
        let stored = self
            .users
            .update_tokens(
                user.id,
                Some(tokens.access_token.as_str()),
                Some(tokens.refresh_token.as_str()),
            )
            .await?;
        if !stored {
            return Err(ShopError::UserNotFound);
        }
        Ok(tokens)
    }
}
