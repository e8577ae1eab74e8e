use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tollgate_auth::{AuthenticationMode, AuthorizerConfig};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub application: ApplicationConfig,
    /// Authentication mode and principal
    #[serde(default)]
    pub auth: AuthorizerConfig,
    /// Signing key material sources
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Server validations
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        if let Some(file) = &self.logging.file {
            if file.file_name().is_none() {
                return Err(format!("logging.file must name a file, got {}", file.display()));
            }
        }
        // Auth validation
        self.auth.validate().map_err(|e| format!("auth: {e}"))?;
        // Key material must match the mode
        match self.auth.authentication_mode {
            AuthenticationMode::Rsa => {
                if self.keys.rsa_public_key_path.as_deref().unwrap_or("").is_empty() {
                    return Err("auth.authentication_mode=RSA requires keys.rsa_public_key_path".into());
                }
            }
            AuthenticationMode::SharedSecret => {
                if self.keys.shared_secret.as_deref().unwrap_or("").is_empty() {
                    return Err("auth.authentication_mode=HS256 requires keys.shared_secret".into());
                }
            }
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        let ip: std::net::IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(std::net::IpAddr::from([0, 0, 0, 0]));
        SocketAddr::from((ip, self.server.port))
    }
}

/// Deployment labels, reported on startup and by `/healthz`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_app_version")]
    pub version: String,
    /// e.g. "dev", "qa", "prod"
    #[serde(default)]
    pub environment: Option<String>,
    /// Cloud account the authorizer is deployed to
    #[serde(default)]
    pub account: Option<String>,
}

fn default_app_name() -> String {
    "tollgate-authorizer".into()
}
fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").into()
}
impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
            environment: None,
            account: None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Default)]
pub struct KeysConfig {
    /// PEM file holding the RSA public key (RSA mode)
    #[serde(default)]
    pub rsa_public_key_path: Option<String>,
    /// HMAC secret (HS256 mode). Prefer TOLLGATE__KEYS__SHARED_SECRET over the file.
    #[serde(default)]
    pub shared_secret: Option<String>,
}

impl fmt::Debug for KeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeysConfig")
            .field("rsa_public_key_path", &self.rsa_public_key_path)
            .field(
                "shared_secret",
                &self.shared_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Also append log lines to this file, in the same format
    #[serde(default)]
    pub file: Option<PathBuf>,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    /// Default config file, looked up in the working directory.
    pub const DEFAULT_CONFIG_FILE: &str = "tollgate.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., TOLLGATE__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("TOLLGATE")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        // Validate
        merged.validate()?;
        Ok(merged)
    }
}
