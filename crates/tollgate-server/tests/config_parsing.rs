use std::{env, fs};

use tollgate_auth::AuthenticationMode;
use tollgate_server::LogFormat;
use tollgate_server::config::loader::load_config;

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    // Create a temporary TOML configuration file
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("tollgate.toml");

    let toml_content = r#"
[application]
name = "authorizer-qa"
environment = "qa"
account = "908671954593"

[auth]
authentication_mode = "HS256"
principal_id = "qa-authorizer"

[keys]
shared_secret = "SECRET-12345"

[server]
host = "127.0.0.1"
port = 8081

[logging]
level = "debug"
format = "json"
file = "logs/tollgate.log"
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.application.name, "authorizer-qa");
    assert_eq!(cfg.application.environment.as_deref(), Some("qa"));
    assert_eq!(cfg.auth.authentication_mode, AuthenticationMode::SharedSecret);
    assert_eq!(cfg.auth.principal_id, "qa-authorizer");
    assert_eq!(cfg.keys.shared_secret.as_deref(), Some("SECRET-12345"));
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.logging.format, LogFormat::Json);
    assert_eq!(
        cfg.logging.file.as_deref(),
        Some(std::path::Path::new("logs/tollgate.log"))
    );

    // 2) Env override should win over file
    unsafe {
        env::set_var("TOLLGATE__SERVER__PORT", "9191");
        env::set_var("TOLLGATE__LOGGING__FILE", "/var/log/tollgate/authorizer.log");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.server.port, 9191);
    assert_eq!(
        cfg_env.logging.file.as_deref(),
        Some(std::path::Path::new("/var/log/tollgate/authorizer.log"))
    );
    // cleanup env vars
    unsafe {
        env::remove_var("TOLLGATE__SERVER__PORT");
        env::remove_var("TOLLGATE__LOGGING__FILE");
    }

    // 3) Unknown authentication mode should error
    let invalid_mode = dir.path().join("invalid_mode.toml");
    fs::write(
        &invalid_mode,
        r#"
[auth]
authentication_mode = "ES256"
"#,
    )
    .expect("write invalid toml");
    let err = load_config(invalid_mode.to_str()).expect_err("expected mode error");
    assert!(err.contains("Invalid authentication mode"), "{err}");

    // 4) RSA mode without a key path should error
    let missing_key = dir.path().join("missing_key.toml");
    fs::write(
        &missing_key,
        r#"
[auth]
authentication_mode = "RSA"
"#,
    )
    .expect("write invalid toml");
    let err = load_config(missing_key.to_str()).expect_err("expected validation error");
    assert!(err.contains("keys.rsa_public_key_path"), "{err}");
}
