//! Authorization decision.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AuthorizerError, FailureKind};

/// Message of a decision no step has settled yet.
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized";

/// Message of a verified token whose scopes do not cover the target.
pub const SCOPE_DENIED_MESSAGE: &str = "unauthorized by token validation";

/// Message of an allowed request.
pub const AUTHORIZED_MESSAGE: &str = "Authorized";

/// Policy statement effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "Allow"),
            Self::Deny => write!(f, "Deny"),
        }
    }
}

/// Outcome of one evaluation.
///
/// Starts as `Deny` / `"unauthorized"` and is settled exactly once, by
/// [`allow`](Self::allow), [`deny_scope`](Self::deny_scope) or
/// [`deny_with`](Self::deny_with).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationDecision {
    pub effect: Effect,
    pub principal_id: String,
    pub message: String,
    /// The target ARN exactly as received, even when it failed to parse.
    pub method_arn: String,
    /// Why the decision is `Deny`, when a step failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl AuthorizationDecision {
    #[must_use]
    pub fn new(principal_id: impl Into<String>, method_arn: impl Into<String>) -> Self {
        Self {
            effect: Effect::Deny,
            principal_id: principal_id.into(),
            message: UNAUTHORIZED_MESSAGE.to_string(),
            method_arn: method_arn.into(),
            failure: None,
        }
    }

    /// Settles the decision as `Allow`.
    pub fn allow(&mut self) {
        self.effect = Effect::Allow;
        self.message = AUTHORIZED_MESSAGE.to_string();
        self.failure = None;
    }

    /// Settles the decision as `Deny` because no scope granted the target.
    pub fn deny_scope(&mut self) {
        self.effect = Effect::Deny;
        self.message = SCOPE_DENIED_MESSAGE.to_string();
    }

    /// Settles the decision as `Deny` because a step failed.
    pub fn deny_with(&mut self, error: &AuthorizerError) {
        self.effect = Effect::Deny;
        self.message = error.deny_message().to_string();
        self.failure = Some(error.kind());
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.effect == Effect::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_decision_is_deny() {
        let decision = AuthorizationDecision::new("principal", "arn:x/qa/GET/a");
        assert_eq!(decision.effect, Effect::Deny);
        assert_eq!(decision.message, "unauthorized");
        assert!(!decision.is_allowed());
        assert_eq!(decision.failure, None);
    }

    #[test]
    fn test_transitions() {
        let mut decision = AuthorizationDecision::new("principal", "arn:x/qa/GET/a");
        decision.allow();
        assert!(decision.is_allowed());
        assert_eq!(decision.message, "Authorized");

        let mut decision = AuthorizationDecision::new("principal", "arn:x/qa/GET/a");
        decision.deny_scope();
        assert_eq!(decision.message, "unauthorized by token validation");
        assert_eq!(decision.failure, None);

        let mut decision = AuthorizationDecision::new("principal", "");
        decision.deny_with(&AuthorizerError::arn_malformed(""));
        assert_eq!(decision.message, "token validation - arn invalid");
        assert_eq!(decision.failure, Some(FailureKind::ArnMalformed));
    }

    #[test]
    fn test_effect_serialization() {
        assert_eq!(serde_json::to_string(&Effect::Allow).unwrap(), r#""Allow""#);
        assert_eq!(serde_json::to_string(&Effect::Deny).unwrap(), r#""Deny""#);
    }
}
