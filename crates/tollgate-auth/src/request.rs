//! Platform request event and the parsing of its two inputs.
//!
//! The gateway hands the authorizer a request event carrying the method ARN
//! of the call being authorized and the caller's headers. Two pieces are
//! derived from it before any token is verified:
//!
//! - the [`TargetResource`] (HTTP method + resource path) from the ARN
//! - the bearer token from the `Authorization` header
//!
//! ```
//! use tollgate_auth::request::{HttpMethod, TargetResource};
//!
//! let target = TargetResource::from_method_arn(
//!     "arn:aws:execute-api:us-east-2:908671954593:k0ng1bdik7/qa/GET/account/info",
//! )
//! .unwrap();
//! assert_eq!(target.http_method, HttpMethod::Get);
//! assert_eq!(target.resource_path, "account/info");
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::AuthorizerResult;
use crate::error::AuthorizerError;

/// Canonical header name carrying the bearer token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Lowercase spelling some clients and proxies use.
pub const AUTHORIZATION_HEADER_LOWER: &str = "authorization";

// ============================================================================
// Request Event
// ============================================================================

/// Request-type authorizer event as delivered by the gateway.
///
/// Only `method_arn`, `headers` and `request_context.request_id` take part
/// in the decision; the remaining fields are kept for logging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerRequest {
    /// Authorizer type (`REQUEST` or `TOKEN`).
    #[serde(default, rename = "type")]
    pub kind: String,

    /// ARN of the method being invoked.
    #[serde(default)]
    pub method_arn: String,

    /// Resource template of the invoked route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    /// Concrete request path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// HTTP method of the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    /// Request headers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,

    /// Query string parameters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub query_string_parameters: HashMap<String, String>,

    /// Path parameters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub path_parameters: HashMap<String, String>,

    /// Stage variables.
    #[serde(default, deserialize_with = "null_as_default")]
    pub stage_variables: HashMap<String, String>,

    /// Gateway request context.
    #[serde(default)]
    pub request_context: RequestContext,
}

/// Subset of the gateway request context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// Gateway request id, used to correlate log events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// Account that owns the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    /// API identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_id: Option<String>,

    /// Deployment stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl AuthorizerRequest {
    /// Creates a request for `method_arn` with no headers.
    #[must_use]
    pub fn new(method_arn: impl Into<String>) -> Self {
        Self {
            kind: "REQUEST".to_string(),
            method_arn: method_arn.into(),
            ..Default::default()
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the gateway request id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_context.request_id = Some(request_id.into());
        self
    }

    /// Returns the gateway request id, if any.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_context.request_id.as_deref()
    }

    /// Returns the raw authorization header value.
    #[must_use]
    pub fn authorization_header(&self) -> Option<&str> {
        authorization_header(&self.headers)
    }
}

/// Treats an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Target Resource
// ============================================================================

/// HTTP method segment of a method ARN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    /// Catch-all route method; any verb scope on the path grants it.
    Any,
    /// A method with no verb scope mapping (`HEAD`, `OPTIONS`, ...).
    Other(String),
}

impl HttpMethod {
    /// Parses the method segment of an ARN. Matching is case-sensitive.
    #[must_use]
    pub fn from_segment(segment: &str) -> Self {
        match segment {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "ANY" => Self::Any,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the method as it appears in the ARN.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Any => "ANY",
            Self::Other(method) => method,
        }
    }

    /// Returns the verb scope that grants this method, if any.
    #[must_use]
    pub fn required_verb(&self) -> Option<&'static str> {
        match self {
            Self::Get => Some("read"),
            Self::Post | Self::Put => Some("write"),
            Self::Patch => Some("update"),
            Self::Delete => Some("delete"),
            Self::Any | Self::Other(_) => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The method + path a request is trying to reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetResource {
    /// The method ARN exactly as received.
    pub method_arn: String,
    /// Method segment of the ARN.
    pub http_method: HttpMethod,
    /// Everything after the method segment, e.g. `account/info`.
    pub resource_path: String,
}

impl TargetResource {
    /// Parses `arn-prefix/stage/METHOD/path...`.
    ///
    /// # Errors
    ///
    /// Returns `AuthorizerError::ArnMalformed` if the ARN is empty or has
    /// fewer than four `/`-separated parts.
    pub fn from_method_arn(method_arn: &str) -> AuthorizerResult<Self> {
        if method_arn.is_empty() {
            return Err(AuthorizerError::arn_malformed(method_arn));
        }

        let parts: Vec<&str> = method_arn.splitn(4, '/').collect();
        let [_, _, method, path] = parts.as_slice() else {
            return Err(AuthorizerError::arn_malformed(method_arn));
        };

        Ok(Self {
            method_arn: method_arn.to_string(),
            http_method: HttpMethod::from_segment(method),
            resource_path: (*path).to_string(),
        })
    }
}

// ============================================================================
// Bearer Token
// ============================================================================

/// Looks up the authorization header value.
///
/// `Authorization` wins over `authorization`; an empty value counts as
/// absent. Any other capitalisation is accepted only when neither of the two
/// usual spellings carries a value. Among several such spellings the
/// byte-wise smallest name wins.
#[must_use]
pub fn authorization_header(headers: &HashMap<String, String>) -> Option<&str> {
    [AUTHORIZATION_HEADER, AUTHORIZATION_HEADER_LOWER]
        .iter()
        .find_map(|name| headers.get(*name).filter(|v| !v.is_empty()))
        .or_else(|| {
            headers
                .iter()
                .filter(|(name, value)| {
                    name.eq_ignore_ascii_case(AUTHORIZATION_HEADER) && !value.is_empty()
                })
                .min_by(|(a, _), (b, _)| a.cmp(b))
                .map(|(_, value)| value)
        })
        .map(String::as_str)
}

/// Extracts the token from an authorization header value.
///
/// With a scheme prefix (`Bearer <token>`) the last space-separated segment
/// is the token; without one the whole value is.
///
/// # Errors
///
/// Returns `AuthorizerError::BearerTokenMalformed` if the header is absent or
/// the resulting token is empty.
pub fn extract_bearer_token(header_value: Option<&str>) -> AuthorizerResult<&str> {
    let token = header_value
        .unwrap_or_default()
        .rsplit(' ')
        .next()
        .unwrap_or_default();

    if token.is_empty() {
        return Err(AuthorizerError::BearerTokenMalformed);
    }
    Ok(token)
}
