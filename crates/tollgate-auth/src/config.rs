//! Authorizer configuration.
//!
//! The authentication mode is chosen once at startup and decides which kind
//! of signing key material the host loads and which verification algorithm
//! family is accepted for every request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Principal reported in every policy response unless configured otherwise.
pub const DEFAULT_PRINCIPAL_ID: &str = "tollgate-apigw-authorization-lambda";

/// Root authorizer configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// authentication_mode = "RSA"
/// principal_id = "tollgate-apigw-authorization-lambda"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthorizerConfig {
    /// How bearer tokens are signed: `"RSA"` or `"HS256"`.
    pub authentication_mode: AuthenticationMode,

    /// Principal identifier placed in every policy response.
    pub principal_id: String,
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self {
            authentication_mode: AuthenticationMode::Rsa,
            principal_id: DEFAULT_PRINCIPAL_ID.to_string(),
        }
    }
}

impl AuthorizerConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the principal id is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.principal_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "principal_id cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

/// Token signing scheme, fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AuthenticationMode {
    /// RS256/RS384/RS512 tokens checked against an RSA public key.
    Rsa,
    /// HS256/HS384/HS512 tokens checked against a shared secret.
    SharedSecret,
}

impl AuthenticationMode {
    /// Returns the configuration spelling of this mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::SharedSecret => "HS256",
        }
    }
}

impl fmt::Display for AuthenticationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthenticationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RSA" => Ok(Self::Rsa),
            "HS256" => Ok(Self::SharedSecret),
            other => Err(ConfigError::InvalidValue(format!(
                "Invalid authentication mode: '{}'. Must be RSA or HS256",
                other
            ))),
        }
    }
}

impl TryFrom<String> for AuthenticationMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AuthenticationMode> for String {
    fn from(mode: AuthenticationMode) -> Self {
        mode.as_str().to_string()
    }
}
