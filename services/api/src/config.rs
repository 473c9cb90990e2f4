//! Service configuration
//!
//! Built-in defaults are overlaid with `SHOP__`-prefixed environment
//! variables, `__` separating nesting levels, e.g. `SHOP__SERVER__PORT=9000`
//! or `SHOP__STORE__BACKEND=memory`.

use std::time::Duration;

use auth::{JwtConfig, jwt::INSECURE_DEFAULT_SECRET};
use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_secs: u64,
}

impl From<&JwtSettings> for JwtConfig {
    fn from(settings: &JwtSettings) -> Self {
        JwtConfig {
            secret: settings.secret.clone(),
            access_token_expiry: settings.access_token_ttl_secs,
            refresh_token_expiry: settings.refresh_token_ttl_secs,
        }
    }
}

/// Which adapter backs the store ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub timeout_secs: u64,
    /// Load the demo catalog into an empty store at startup
    pub seed_catalog: bool,
}

impl StoreSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Mock payment gateway settings
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSettings {
    pub public_key: String,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub jwt: JwtSettings,
    pub store: StoreSettings,
    pub payment: PaymentSettings,
}

impl AppConfig {
    /// Load defaults overlaid with the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("jwt.secret", INSECURE_DEFAULT_SECRET)?
            .set_default("jwt.access_token_ttl_secs", 24 * 60 * 60)?
            .set_default("jwt.refresh_token_ttl_secs", 7 * 24 * 60 * 60)?
            .set_default("store.backend", "postgres")?
            .set_default("store.timeout_secs", 5)?
            .set_default("store.seed_catalog", true)?
            .set_default("payment.public_key", "rzp_test_key")?
            .set_default("payment.currency", "INR")?
            .add_source(
                Environment::with_prefix("SHOP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: [&str; 4] = [
        "SHOP__SERVER__PORT",
        "SHOP__JWT__SECRET",
        "SHOP__STORE__BACKEND",
        "SHOP__STORE__SEED_CATALOG",
    ];

    fn clear_vars() {
        for var in VARS {
            unsafe {
                env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_without_environment() {
        clear_vars();

        let config = AppConfig::load().unwrap();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.jwt.secret, INSECURE_DEFAULT_SECRET);
        assert_eq!(config.jwt.access_token_ttl_secs, 86_400);
        assert_eq!(config.jwt.refresh_token_ttl_secs, 604_800);
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert_eq!(config.store.timeout(), Duration::from_secs(5));
        assert!(config.store.seed_catalog);
        assert_eq!(config.payment.currency, "INR");
    }

    #[test]
    #[serial]
    fn environment_overrides_defaults() {
        clear_vars();
        unsafe {
            env::set_var("SHOP__SERVER__PORT", "9090");
            env::set_var("SHOP__JWT__SECRET", "a-much-better-secret");
            env::set_var("SHOP__STORE__BACKEND", "memory");
            env::set_var("SHOP__STORE__SEED_CATALOG", "false");
        }

        let config = AppConfig::load().unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.jwt.secret, "a-much-better-secret");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(!config.store.seed_catalog);

        let jwt = JwtConfig::from(&config.jwt);
        assert!(!jwt.uses_default_secret());

        clear_vars();
    }
}
