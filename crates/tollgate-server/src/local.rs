//! One-shot evaluation of a request event read from a JSON file.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tollgate_auth::{Authorizer, AuthorizerRequest, PolicyResponse};

/// Reads the event at `path` and authorizes it.
pub fn evaluate_event_file(authorizer: &Authorizer, path: &Path) -> anyhow::Result<PolicyResponse> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read event file {}", path.display()))?;
    let request: AuthorizerRequest = serde_json::from_str(&raw)
        .with_context(|| format!("invalid request event in {}", path.display()))?;

    tracing::info!(path = %path.display(), method_arn = %request.method_arn, "Evaluating local event");
    Ok(authorizer.authorize(&request))
}
