use std::fs;

use rand::rngs::OsRng;
use rsa::RsaPrivateKey;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use tollgate_auth::{AuthenticationMode, KeyError};
use tollgate_server::{AppConfig, KeyLoadError, load_signing_key};

fn rsa_config(path: &str) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth.authentication_mode = AuthenticationMode::Rsa;
    cfg.keys.rsa_public_key_path = Some(path.to_string());
    cfg
}

#[test]
fn loads_rsa_public_key_from_pem_file() {
    let private_key = RsaPrivateKey::new(&mut OsRng, 2048).expect("generate key");
    let pem = private_key
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .expect("encode public key");

    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("public_key.pem");
    fs::write(&path, pem).expect("write pem");

    let key = load_signing_key(&rsa_config(path.to_str().unwrap())).expect("load key");
    assert_eq!(key.mode(), AuthenticationMode::Rsa);
}

#[test]
fn missing_pem_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("absent.pem");

    let err = load_signing_key(&rsa_config(path.to_str().unwrap())).expect_err("missing file");
    assert!(matches!(err, KeyLoadError::Io { .. }));
}

#[test]
fn garbage_pem_is_rejected() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("garbage.pem");
    fs::write(&path, "not a key").expect("write pem");

    let err = load_signing_key(&rsa_config(path.to_str().unwrap())).expect_err("bad pem");
    assert!(matches!(err, KeyLoadError::Key(KeyError::InvalidKey { .. })));
}

#[test]
fn shared_secret_from_config() {
    let mut cfg = AppConfig::default();
    cfg.auth.authentication_mode = AuthenticationMode::SharedSecret;
    cfg.keys.shared_secret = Some("SECRET-12345".into());
    let key = load_signing_key(&cfg).expect("load secret");
    assert_eq!(key.mode(), AuthenticationMode::SharedSecret);

    cfg.keys.shared_secret = None;
    let err = load_signing_key(&cfg).expect_err("missing secret");
    assert!(matches!(err, KeyLoadError::Missing("keys.shared_secret")));
}
