//! Shared fixtures for unit tests: RSA key pairs and token minting.

use std::sync::OnceLock;

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use rand::rngs::OsRng;
use rsa::RsaPrivateKey;
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};

use crate::token::TokenClaims;

pub(crate) struct RsaFixture {
    pub encoding_key: EncodingKey,
    pub public_pem: String,
    pub public_pkcs1_pem: String,
}

fn generate_rsa_fixture() -> RsaFixture {
    let private_key = RsaPrivateKey::new(&mut OsRng, 2048).expect("Failed to generate RSA key");
    let public_key = private_key.to_public_key();

    let private_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .expect("Failed to encode private key");
    let public_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .expect("Failed to encode public key");
    let public_pkcs1_pem = public_key
        .to_pkcs1_pem(LineEnding::LF)
        .expect("Failed to encode PKCS#1 public key");

    RsaFixture {
        encoding_key: EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .expect("Failed to create encoding key"),
        public_pem,
        public_pkcs1_pem,
    }
}

/// Key pair whose public half the tests configure as the verification key.
pub(crate) fn rsa_fixture() -> &'static RsaFixture {
    static FIXTURE: OnceLock<RsaFixture> = OnceLock::new();
    FIXTURE.get_or_init(generate_rsa_fixture)
}

/// An unrelated key pair, for signature mismatch cases.
pub(crate) fn other_rsa_fixture() -> &'static RsaFixture {
    static FIXTURE: OnceLock<RsaFixture> = OnceLock::new();
    FIXTURE.get_or_init(generate_rsa_fixture)
}

pub(crate) fn claims_with_scopes(scopes: &[&str]) -> TokenClaims {
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    TokenClaims {
        token_use: "access".to_string(),
        iss: "issuer-01".to_string(),
        version: "1".to_string(),
        jwt_id: "jwt-id-0001".to_string(),
        username: "user-01".to_string(),
        tier: "gold".to_string(),
        api_access_key: "API_ACCESS_KEY_USER_01".to_string(),
        scope: scopes.iter().map(|s| (*s).to_string()).collect(),
        sub: Some("user-01".to_string()),
        jti: None,
        exp: Some(now + 3600),
        nbf: None,
        iat: Some(now),
    }
}

pub(crate) fn mint_rs256(claims: &TokenClaims) -> String {
    encode(
        &Header::new(Algorithm::RS256),
        claims,
        &rsa_fixture().encoding_key,
    )
    .expect("Failed to sign RS256 token")
}

pub(crate) fn mint_hs256(claims: &TokenClaims, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign HS256 token")
}
