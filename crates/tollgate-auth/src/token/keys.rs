//! Signing key material.
//!
//! The key is loaded once at startup, matching the configured
//! [`AuthenticationMode`], and then shared read-only by every request.

use std::fmt;

use jsonwebtoken::DecodingKey;
use rsa::RsaPublicKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;

use crate::AuthorizerResult;
use crate::config::AuthenticationMode;
use crate::token::jwt::{self, TokenClaims};

/// Errors raised while building signing key material.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// The PEM data is not a usable RSA public key.
    #[error("Invalid key: {message}")]
    InvalidKey {
        /// Description of why the key is invalid.
        message: String,
    },

    /// The shared secret is empty.
    #[error("Shared secret is empty")]
    EmptySecret,
}

impl KeyError {
    /// Creates a new `InvalidKey` error.
    #[must_use]
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }
}

/// Key used to verify bearer token signatures.
#[derive(Clone)]
pub enum SigningKeyMaterial {
    /// RSA public key for RS256/RS384/RS512 tokens.
    AsymmetricPublicKey(DecodingKey),
    /// Shared secret for HS256/HS384/HS512 tokens, used as its UTF-8 bytes.
    SharedSecret(String),
}

impl SigningKeyMaterial {
    /// Builds asymmetric key material from a PEM-encoded RSA public key.
    ///
    /// Both SPKI (`BEGIN PUBLIC KEY`) and PKCS#1 (`BEGIN RSA PUBLIC KEY`)
    /// encodings are accepted.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKey` if the PEM is not an RSA public key.
    pub fn from_rsa_public_pem(pem: &str) -> Result<Self, KeyError> {
        let public_key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| KeyError::invalid_key(e.to_string()))?;

        let decoding_key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| KeyError::invalid_key(e.to_string()))?;

        tracing::info!(bits = public_key.size() * 8, "RSA public key loaded");

        Ok(Self::AsymmetricPublicKey(decoding_key))
    }

    /// Builds shared-secret key material.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::EmptySecret` if `secret` is empty.
    pub fn shared_secret(secret: impl Into<String>) -> Result<Self, KeyError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(KeyError::EmptySecret);
        }
        Ok(Self::SharedSecret(secret))
    }

    /// Verifies `token` against this key.
    ///
    /// # Errors
    ///
    /// See [`jwt::verify`].
    pub fn verify(&self, token: &str) -> AuthorizerResult<TokenClaims> {
        jwt::verify(token, self)
    }

    /// Returns the authentication mode this key verifies.
    #[must_use]
    pub fn mode(&self) -> AuthenticationMode {
        match self {
            Self::AsymmetricPublicKey(_) => AuthenticationMode::Rsa,
            Self::SharedSecret(_) => AuthenticationMode::SharedSecret,
        }
    }
}

impl fmt::Debug for SigningKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AsymmetricPublicKey(_) => f.write_str("AsymmetricPublicKey(..)"),
            Self::SharedSecret(_) => f.write_str("SharedSecret(<redacted>)"),
        }
    }
}
