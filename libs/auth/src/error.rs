//! Error types for token and credential handling

use thiserror::Error;

/// Authentication error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token signature is valid but its expiry has passed
    #[error("token is expired")]
    Expired,

    /// The token is malformed, tampered with or of the wrong kind
    #[error("The Token is invalid")]
    Invalid,

    /// A token could not be signed
    #[error("Failed to sign token: {0}")]
    Signing(String),

    /// A password could not be hashed
    #[error("Failed to hash password: {0}")]
    Hashing(String),
}
