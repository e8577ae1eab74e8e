//! Signing key material and bearer token verification.
//!
//! This module provides:
//!
//! - [`SigningKeyMaterial`], the process-wide verification key
//! - JWT verification in RSA or shared-secret mode
//! - [`TokenClaims`], the verified payload

pub mod jwt;
pub mod keys;

pub use jwt::{TokenClaims, verify, verify_asymmetric, verify_shared_secret};
pub use keys::{KeyError, SigningKeyMaterial};
