//! Startup loading of the signing key material named by the configuration.

use std::fs;
use std::path::PathBuf;

use tollgate_auth::{AuthenticationMode, KeyError, SigningKeyMaterial};

use crate::config::AppConfig;

/// Failures loading key material. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum KeyLoadError {
    #[error("No key material configured: {0}")]
    Missing(&'static str),

    #[error("Failed to read key file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Loads the key for the configured authentication mode.
pub fn load_signing_key(cfg: &AppConfig) -> Result<SigningKeyMaterial, KeyLoadError> {
    match cfg.auth.authentication_mode {
        AuthenticationMode::Rsa => {
            let path = cfg
                .keys
                .rsa_public_key_path
                .as_deref()
                .filter(|p| !p.is_empty())
                .ok_or(KeyLoadError::Missing("keys.rsa_public_key_path"))?;

            let pem = fs::read_to_string(path).map_err(|source| KeyLoadError::Io {
                path: PathBuf::from(path),
                source,
            })?;

            tracing::info!(path = %path, "Loading RSA public key");
            Ok(SigningKeyMaterial::from_rsa_public_pem(&pem)?)
        }
        AuthenticationMode::SharedSecret => {
            let secret = cfg
                .keys
                .shared_secret
                .as_deref()
                .ok_or(KeyLoadError::Missing("keys.shared_secret"))?;

            tracing::info!("Using shared secret signing key");
            Ok(SigningKeyMaterial::shared_secret(secret)?)
        }
    }
}
