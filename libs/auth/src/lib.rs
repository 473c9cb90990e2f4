//! Session tokens, password hashing and credential input validation

pub mod error;
pub mod jwt;
pub mod password;
pub mod validation;

pub use error::AuthError;
pub use jwt::{JwtConfig, JwtService, TokenIdentity, TokenPair};
