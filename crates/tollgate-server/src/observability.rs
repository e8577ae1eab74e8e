// Tracing initialization with configurable level, output format and log file.
use std::path::{Path, PathBuf};

use tracing::Subscriber;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::config::{LogFormat, LoggingConfig};

#[derive(Debug, thiserror::Error)]
pub enum LogInitError {
    #[error("log file path has no file name: {}", .0.display())]
    NoFileName(PathBuf),

    #[error("cannot open log file: {0}")]
    Open(#[from] InitError),
}

/// Install the global subscriber. Later calls are no-ops.
///
/// # Errors
///
/// Returns `LogInitError` if `logging.file` is set and cannot be opened.
pub fn init_tracing(logging: &LoggingConfig) -> Result<(), LogInitError> {
    let filter = env_filter(&logging.level);

    let (text, json) = match logging.format {
        LogFormat::Text => (Some(fmt::layer()), None),
        // One JSON object per line, with the current span's fields (request_id) flattened in
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_current_span(true).with_span_list(false)),
        ),
    };

    let file = logging
        .file
        .as_deref()
        .map(|path| file_layer(path, logging.format))
        .transpose()?;

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .with(file)
        .try_init();
    Ok(())
}

/// Layer appending to `path` in `format`, without ANSI colors.
fn file_layer<S>(
    path: &Path,
    format: LogFormat,
) -> Result<Box<dyn Layer<S> + Send + Sync + 'static>, LogInitError>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let layer = fmt::layer()
        .with_writer(open_log_file(path)?)
        .with_ansi(false);

    Ok(match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
    })
}

/// Opens `path` for appending, creating it and its directory if needed.
fn open_log_file(path: &Path) -> Result<RollingFileAppender, LogInitError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LogInitError::NoFileName(path.to_path_buf()))?;
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)?;
    Ok(appender)
}

/// Prefer RUST_LOG from env, otherwise use the configured level.
fn env_filter(level: &str) -> EnvFilter {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_to_file(path: &Path, format: LogFormat) {
        let subscriber = tracing_subscriber::registry().with(file_layer(path, format).unwrap());
        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("authorize", request_id = "request-id-12345");
            let _guard = span.enter();
            tracing::info!(effect = "Allow", "Authorization decided");
        });
    }

    #[test]
    fn test_init_is_idempotent() {
        let logging = LoggingConfig {
            level: "debug".into(),
            format: LogFormat::Json,
            file: None,
        };
        init_tracing(&logging).unwrap();
        init_tracing(&LoggingConfig::default()).unwrap();
        tracing::debug!("still alive");
    }

    #[test]
    fn test_file_layer_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("tollgate.log");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "earlier line\n").unwrap();

        log_to_file(&path, LogFormat::Json);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("earlier line\n"), "{contents}");
        let line: serde_json::Value =
            serde_json::from_str(contents.lines().nth(1).unwrap()).unwrap();
        assert_eq!(line["fields"]["message"], "Authorization decided");
        assert_eq!(line["span"]["request_id"], "request-id-12345");
    }

    #[test]
    fn test_file_layer_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tollgate.log");

        log_to_file(&path, LogFormat::Text);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Authorization decided"), "{contents}");
        assert!(contents.contains("request-id-12345"), "{contents}");
        assert!(!contents.contains('\u{1b}'), "{contents}");
    }

    #[test]
    fn test_file_without_name_rejected() {
        let err = open_log_file(Path::new("/")).unwrap_err();
        assert!(matches!(err, LogInitError::NoFileName(_)));
    }
}
