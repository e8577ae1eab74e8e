//! Decision orchestrator.
//!
//! [`Authorizer`] runs one request through four steps, each of which may
//! settle the decision as `Deny`:
//!
//! ```text
//! extract target + token ─► verify token ─► authorize scopes ─► Allow
//!        │                       │                  │
//!   "arn invalid" /        "token validation"  "unauthorized by
//!   "bearer token invalid"                      token validation"
//! ```
//!
//! Whatever the outcome, the decision is rendered through
//! [`synthesize`](crate::policy::synthesize); no failure escapes to the caller.

use crate::AuthorizerResult;
use crate::config::{AuthenticationMode, AuthorizerConfig, ConfigError};
use crate::policy::{AuthorizationDecision, PolicyResponse, synthesize};
use crate::request::{AuthorizerRequest, TargetResource, extract_bearer_token};
use crate::scopes;
use crate::token::{SigningKeyMaterial, TokenClaims};

/// Full result of one evaluation, for hosts that log or inspect more than
/// the rendered response.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Settled effect, message and failure kind.
    pub decision: AuthorizationDecision,
    /// Verified claims; `None` when evaluation stopped before verification
    /// succeeded.
    pub claims: Option<TokenClaims>,
    /// Policy response returned to the gateway.
    pub response: PolicyResponse,
}

/// Authorizes requests against one signing key.
///
/// Immutable after construction, so a single instance can be shared across
/// concurrent requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Authorizer {
    key: SigningKeyMaterial,
    principal_id: String,
}

impl Authorizer {
    /// Creates an authorizer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the configuration is invalid or
    /// the key does not belong to the configured authentication mode.
    pub fn new(key: SigningKeyMaterial, config: &AuthorizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        if key.mode() != config.authentication_mode {
            return Err(ConfigError::InvalidValue(format!(
                "authentication_mode is {} but the signing key is for {}",
                config.authentication_mode,
                key.mode()
            )));
        }

        tracing::info!(
            mode = %config.authentication_mode,
            principal_id = %config.principal_id,
            "Authorizer initialized"
        );

        Ok(Self {
            key,
            principal_id: config.principal_id.clone(),
        })
    }

    /// Authentication mode of the configured signing key.
    #[must_use]
    pub fn mode(&self) -> AuthenticationMode {
        self.key.mode()
    }

    /// Principal id stamped on every response.
    #[must_use]
    pub fn principal_id(&self) -> &str {
        &self.principal_id
    }

    /// Decides `request` and returns the policy response.
    #[must_use]
    pub fn authorize(&self, request: &AuthorizerRequest) -> PolicyResponse {
        self.evaluate(request).response
    }

    /// Decides `request`, keeping the decision and claims alongside the
    /// rendered response.
    #[must_use]
    pub fn evaluate(&self, request: &AuthorizerRequest) -> Evaluation {
        let span = tracing::info_span!(
            "authorize",
            request_id = request.request_id().unwrap_or_default(),
            method_arn = %request.method_arn,
        );
        let _guard = span.enter();

        let mut decision = AuthorizationDecision::new(&self.principal_id, &request.method_arn);

        let claims = match self.verified_claims(request) {
            Ok((target, claims)) => {
                if scopes::authorize(&claims, &target) {
                    decision.allow();
                } else {
                    decision.deny_scope();
                }
                Some(claims)
            }
            Err(err) => {
                if err.is_structure_error() {
                    tracing::warn!(error = %err, "Request structure rejected");
                } else {
                    tracing::warn!(error = %err, failure = %err.kind(), "Token verification failed");
                }
                decision.deny_with(&err);
                None
            }
        };

        tracing::info!(
            effect = %decision.effect,
            message = %decision.message,
            "Authorization decided"
        );

        let response = synthesize(&decision, claims.as_ref());
        Evaluation {
            decision,
            claims,
            response,
        }
    }

    fn verified_claims(
        &self,
        request: &AuthorizerRequest,
    ) -> AuthorizerResult<(TargetResource, TokenClaims)> {
        let target = TargetResource::from_method_arn(&request.method_arn)?;
        let bearer = extract_bearer_token(request.authorization_header())?;
        let claims = self.key.verify(bearer)?;
        Ok((target, claims))
    }
}
