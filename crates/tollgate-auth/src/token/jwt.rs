//! JWT bearer token verification.
//!
//! Two interchangeable verification modes share one contract: take a token
//! and key, return the verified [`TokenClaims`] or a failure.
//!
//! ## Supported Algorithms
//!
//! - **RSA mode**: RS256, RS384, RS512 against an RSA public key
//! - **Shared-secret mode**: HS256, HS384, HS512 against the secret's bytes
//!
//! A token signed with an algorithm from the other family is rejected.
//!
//! ## Failure mapping
//!
//! Only a signature mismatch is reported as
//! [`AuthorizerError::InvalidSignature`]. Every other failure (expired,
//! not yet valid, malformed, wrong algorithm, undecodable claims) is
//! reported as [`AuthorizerError::Expired`].
//!
//! ## Example
//!
//! ```ignore
//! use tollgate_auth::token::{SigningKeyMaterial, verify};
//!
//! let key = SigningKeyMaterial::shared_secret("SECRET-12345")?;
//! let claims = verify(&token, &key)?;
//! println!("scopes: {:?}", claims.scope);
//! ```

use std::collections::HashSet;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Deserializer, Serialize};

use crate::AuthorizerResult;
use crate::error::AuthorizerError;
use crate::request::null_as_default;
use crate::token::keys::SigningKeyMaterial;

const RSA_ALGORITHMS: [Algorithm; 3] = [Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

// ============================================================================
// Token Claims
// ============================================================================

/// Verified bearer token payload.
///
/// Custom claims default to empty when the token omits them or sets them to
/// `null`. Timestamps accept integer or fractional seconds; fractions are
/// truncated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TokenClaims {
    /// Token use (e.g. `access`).
    #[serde(deserialize_with = "null_as_default")]
    pub token_use: String,

    /// Issuer.
    #[serde(deserialize_with = "null_as_default")]
    pub iss: String,

    /// Token schema version.
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,

    /// Token identifier, echoed to the gateway as `jwt_id`.
    #[serde(deserialize_with = "null_as_default")]
    pub jwt_id: String,

    /// Username the token was issued to.
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,

    /// Usage tier.
    #[serde(deserialize_with = "null_as_default")]
    pub tier: String,

    /// API key for the gateway usage plan.
    #[serde(deserialize_with = "null_as_default")]
    pub api_access_key: String,

    /// Granted scopes, in evaluation order.
    #[serde(deserialize_with = "null_as_default")]
    pub scope: Vec<String>,

    /// Subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Registered JWT ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Expiration time (Unix timestamp).
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric_date"
    )]
    pub exp: Option<i64>,

    /// Not before (Unix timestamp).
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric_date"
    )]
    pub nbf: Option<i64>,

    /// Issued at (Unix timestamp).
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric_date"
    )]
    pub iat: Option<i64>,
}

/// JSON number form of a NumericDate.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumericDate {
    Seconds(i64),
    Fractional(f64),
}

fn numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<NumericDate>::deserialize(deserializer)?.map(|date| match date {
            NumericDate::Seconds(secs) => secs,
            NumericDate::Fractional(secs) => secs.trunc() as i64,
        }),
    )
}

// ============================================================================
// Verification
// ============================================================================

/// Verifies `token` against `key`, dispatching on the key's mode.
///
/// # Errors
///
/// Returns `AuthorizerError::InvalidSignature` on a signature mismatch and
/// `AuthorizerError::Expired` for any other verification failure.
pub fn verify(token: &str, key: &SigningKeyMaterial) -> AuthorizerResult<TokenClaims> {
    match key {
        SigningKeyMaterial::AsymmetricPublicKey(public_key) => verify_asymmetric(token, public_key),
        SigningKeyMaterial::SharedSecret(secret) => verify_shared_secret(token, secret),
    }
}

/// Verifies an RS256/RS384/RS512 token against an RSA public key.
///
/// # Errors
///
/// See [`verify`].
pub fn verify_asymmetric(token: &str, public_key: &DecodingKey) -> AuthorizerResult<TokenClaims> {
    tracing::info!(mode = "RSA", "Verifying bearer token");
    decode_claims(token, public_key, &RSA_ALGORITHMS)
}

/// Verifies an HS256/HS384/HS512 token against a shared secret.
///
/// # Errors
///
/// See [`verify`].
pub fn verify_shared_secret(token: &str, secret: &str) -> AuthorizerResult<TokenClaims> {
    tracing::info!(mode = "HS256", "Verifying bearer token");
    let key = DecodingKey::from_secret(secret.as_bytes());
    decode_claims(token, &key, &HMAC_ALGORITHMS)
}

fn decode_claims(
    token: &str,
    key: &DecodingKey,
    algorithms: &[Algorithm],
) -> AuthorizerResult<TokenClaims> {
    decode::<TokenClaims>(token, key, &validation(algorithms))
        .map(|data| data.claims)
        .map_err(map_jwt_error)
}

/// Signature, then `exp` and `nbf` when present, with no leeway.
/// Issuer and audience are not checked and no claim is mandatory.
fn validation(algorithms: &[Algorithm]) -> Validation {
    let mut validation = Validation::new(algorithms[0]);
    validation.algorithms = algorithms.to_vec();
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();
    validation
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthorizerError {
    match err.kind() {
        ErrorKind::InvalidSignature => AuthorizerError::InvalidSignature,
        _ => AuthorizerError::expired(err.to_string()),
    }
}

// ============================================================================
// Tests
// ============================================================================
