use std::env;
use std::path::PathBuf;

use tollgate_auth::Authorizer;
use tollgate_server::config::loader::{DEFAULT_CONFIG_FILE, load_config};
use tollgate_server::local::evaluate_event_file;
use tollgate_server::{AppState, TollgateServer, init_tracing, load_signing_key};

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From TOLLGATE_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (tollgate.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (TOLLGATE_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound) {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    let (config_path, source) = resolve_config_path();

    let cfg = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = init_tracing(&cfg.logging) {
        eprintln!("Logging initialization failed: {e}");
        std::process::exit(2);
    }

    tracing::info!(
        path = %config_path,
        source = %source,
        name = %cfg.application.name,
        version = %cfg.application.version,
        environment = cfg.application.environment.as_deref().unwrap_or(""),
        account = cfg.application.account.as_deref().unwrap_or(""),
        "Configuration loaded"
    );

    let key = match load_signing_key(&cfg) {
        Ok(k) => k,
        Err(e) => {
            eprintln!("Signing key error: {e}");
            std::process::exit(2);
        }
    };

    let authorizer = match Authorizer::new(key, &cfg.auth) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Authorizer initialization failed: {e}");
            std::process::exit(2);
        }
    };

    // Local mode: evaluate one event and exit
    if let Some(event_path) = arg_value("--event") {
        match evaluate_event_file(&authorizer, &PathBuf::from(event_path)) {
            Ok(response) => match serde_json::to_string_pretty(&response) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Failed to render response: {e}");
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Local evaluation failed: {e:#}");
                std::process::exit(1);
            }
        }
        return;
    }

    let server = TollgateServer::new(cfg.addr(), AppState::new(authorizer, &cfg));
    if let Err(err) = server.run().await {
        eprintln!("Server error: {err}");
        std::process::exit(1);
    }
}

/// Resolve the configuration file path.
///
/// Priority order:
/// 1. CLI argument: --config <path>
/// 2. Environment variable: TOLLGATE_CONFIG
/// 3. Default: tollgate.toml
fn resolve_config_path() -> (String, ConfigSource) {
    if let Some(path) = arg_value("--config") {
        return (path, ConfigSource::CliArgument);
    }

    if let Ok(path) = env::var("TOLLGATE_CONFIG") {
        if !path.is_empty() {
            return (path, ConfigSource::EnvironmentVariable);
        }
    }

    (DEFAULT_CONFIG_FILE.to_string(), ConfigSource::Default)
}

/// Value following `flag` on the command line, if any.
fn arg_value(flag: &str) -> Option<String> {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == flag {
            return args.next();
        }
    }
    None
}
