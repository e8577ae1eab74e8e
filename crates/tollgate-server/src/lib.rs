pub mod config;
pub mod keys;
pub mod local;
pub mod observability;
pub mod server;

pub use config::{AppConfig, LogFormat, LoggingConfig};
pub use keys::{KeyLoadError, load_signing_key};
pub use observability::{LogInitError, init_tracing};
pub use server::{AppState, TollgateServer, build_app};
