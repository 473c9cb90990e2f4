//! JWT service for token generation and validation
//!
//! Access tokens carry the caller's identity (email, names, user id) and live
//! for 24 hours by default. Refresh tokens carry only registered claims and
//! live for 7 days. Both are signed with HS256 using one process-wide secret.

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::AuthError;

/// Secret used when none is configured. Only acceptable for local development.
pub const INSECURE_DEFAULT_SECRET: &str = "your-secret-key-here";

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Access token expiration time in seconds (default: 24 hours)
    pub access_token_expiry: u64,
    /// Refresh token expiration time in seconds (default: 7 days)
    pub refresh_token_expiry: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: INSECURE_DEFAULT_SECRET.to_string(),
            access_token_expiry: 24 * 60 * 60,
            refresh_token_expiry: 7 * 24 * 60 * 60,
        }
    }
}

impl JwtConfig {
    /// Whether the signing secret is the built-in fallback
    pub fn uses_default_secret(&self) -> bool {
        self.secret.is_empty() || self.secret == INSECURE_DEFAULT_SECRET
    }
}

/// Identity carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIdentity {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// User ID
    pub uid: Uuid,
}

/// Access token claims
#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    #[serde(flatten)]
    identity: TokenIdentity,
    iat: i64,
    exp: i64,
}

/// Refresh token claims, registered claims only
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Unique token ID
    pub jti: Uuid,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// A freshly issued access/refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        if config.uses_default_secret() {
            warn!("JWT secret not configured, signing with the insecure default secret");
        }

        let secret = if config.secret.is_empty() {
            INSECURE_DEFAULT_SECRET
        } else {
            config.secret.as_str()
        };
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Issue an access and a refresh token for the given identity
    pub fn issue(&self, identity: &TokenIdentity) -> Result<TokenPair, AuthError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token pair as if the current time were `now`
    pub fn issue_at(
        &self,
        identity: &TokenIdentity,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthError> {
        let iat = now.timestamp();

        let access = AccessClaims {
            identity: identity.clone(),
            iat,
            exp: iat + self.config.access_token_expiry as i64,
        };
        let refresh = RefreshClaims {
            jti: Uuid::new_v4(),
            iat,
            exp: iat + self.config.refresh_token_expiry as i64,
        };

        Ok(TokenPair {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
        })
    }

    /// Validate an access token and return the identity it carries
    pub fn validate(&self, token: &str) -> Result<TokenIdentity, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate an access token against the clock value `now`
    ///
    /// Expiry is checked here as well as by the signature library so that
    /// callers can evaluate tokens against any point in time.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenIdentity, AuthError> {
        let claims: AccessClaims = self.decode(token)?;
        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }
        Ok(claims.identity)
    }

    /// Validate a refresh token
    pub fn validate_refresh(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        self.validate_refresh_at(token, Utc::now())
    }

    /// Validate a refresh token against the clock value `now`
    pub fn validate_refresh_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshClaims, AuthError> {
        let claims: RefreshClaims = self.decode(token)?;
        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }

    /// Get the access token expiry time
    pub fn access_token_expiry(&self) -> u64 {
        self.config.access_token_expiry
    }

    /// Get the refresh token expiry time
    pub fn refresh_token_expiry(&self) -> u64 {
        self.config.refresh_token_expiry
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, AuthError> {
        decode::<T>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid,
            })
    }
}
