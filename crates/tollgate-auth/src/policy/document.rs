//! Policy response synthesis.
//!
//! Turns a settled [`AuthorizationDecision`] (plus the verified claims, when
//! verification got that far) into the response shape the gateway expects:
//!
//! ```json
//! {
//!   "principalId": "tollgate-apigw-authorization-lambda",
//!   "policyDocument": {
//!     "Version": "2012-10-17",
//!     "Statement": [{
//!       "Action": ["execute-api:Invoke"],
//!       "Effect": "Allow",
//!       "Resource": ["arn:aws:execute-api:us-east-2:908671954593:k0ng1bdik7/qa/GET/account/info"]
//!     }]
//!   },
//!   "context": { "authMessage": "Authorized", "jwt_id": "...", "tenant_id": "NO-TENANT" },
//!   "usageIdentifierKey": "API_ACCESS_KEY_USER_01"
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::policy::decision::{AuthorizationDecision, Effect};
use crate::token::TokenClaims;

/// Policy language version understood by the gateway.
pub const POLICY_VERSION: &str = "2012-10-17";

/// The only action a statement ever names.
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

/// Usage plan key for tokens that carry none.
pub const DEFAULT_USAGE_IDENTIFIER_KEY: &str = "API_ACCESS_KEY_DEFAULT_001";

/// Tenant placeholder; every response reports it.
pub const NO_TENANT: &str = "NO-TENANT";

pub const CONTEXT_AUTH_MESSAGE: &str = "authMessage";
pub const CONTEXT_TENANT_ID: &str = "tenant_id";
pub const CONTEXT_JWT_ID: &str = "jwt_id";

/// Response returned to the gateway for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    /// Usage plan key; absent when verification failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_identifier_key: Option<String>,
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub action: Vec<String>,
    pub effect: Effect,
    pub resource: Vec<String>,
}

impl PolicyResponse {
    /// Effect of the single statement.
    #[must_use]
    pub fn effect(&self) -> Option<Effect> {
        self.policy_document.statement.first().map(|s| s.effect)
    }

    /// The `authMessage` context entry.
    #[must_use]
    pub fn auth_message(&self) -> Option<&str> {
        self.context.get(CONTEXT_AUTH_MESSAGE).map(String::as_str)
    }
}

/// Renders `decision` as a gateway policy response.
///
/// With `claims` present the response also carries the token id and a usage
/// identifier key, falling back to [`DEFAULT_USAGE_IDENTIFIER_KEY`] when the
/// token has no API access key.
#[must_use]
pub fn synthesize(decision: &AuthorizationDecision, claims: Option<&TokenClaims>) -> PolicyResponse {
    let mut context = BTreeMap::new();
    context.insert(CONTEXT_AUTH_MESSAGE.to_string(), decision.message.clone());
    context.insert(CONTEXT_TENANT_ID.to_string(), NO_TENANT.to_string());

    let mut usage_identifier_key = None;
    if let Some(claims) = claims {
        if !claims.jwt_id.is_empty() {
            context.insert(CONTEXT_JWT_ID.to_string(), claims.jwt_id.clone());
        }

        if claims.api_access_key.is_empty() {
            tracing::warn!(
                usage_identifier_key = DEFAULT_USAGE_IDENTIFIER_KEY,
                "Token has no api_access_key, using default usage identifier key"
            );
            usage_identifier_key = Some(DEFAULT_USAGE_IDENTIFIER_KEY.to_string());
        } else {
            usage_identifier_key = Some(claims.api_access_key.clone());
        }
    }

    PolicyResponse {
        principal_id: decision.principal_id.clone(),
        policy_document: PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statement: vec![PolicyStatement {
                action: vec![INVOKE_ACTION.to_string()],
                effect: decision.effect,
                resource: vec![decision.method_arn.clone()],
            }],
        },
        usage_identifier_key,
        context,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARN: &str = "arn:aws:execute-api:us-east-2:908671954593:k0ng1bdik7/qa/GET/account/info";

    fn allowed() -> AuthorizationDecision {
        let mut decision = AuthorizationDecision::new("principal-01", ARN);
        decision.allow();
        decision
    }

    #[test]
    fn test_without_claims() {
        let decision = AuthorizationDecision::new("principal-01", ARN);
        let response = synthesize(&decision, None);

        assert_eq!(response.principal_id, "principal-01");
        assert_eq!(response.effect(), Some(Effect::Deny));
        assert_eq!(response.usage_identifier_key, None);
        assert_eq!(response.auth_message(), Some("unauthorized"));
        assert_eq!(response.context.get("tenant_id").map(String::as_str), Some("NO-TENANT"));
        assert!(!response.context.contains_key("jwt_id"));
    }

    #[test]
    fn test_with_claims() {
        let claims = TokenClaims {
            jwt_id: "jwt-01".to_string(),
            api_access_key: "KEY-01".to_string(),
            ..Default::default()
        };
        let response = synthesize(&allowed(), Some(&claims));

        assert_eq!(response.effect(), Some(Effect::Allow));
        assert_eq!(response.usage_identifier_key.as_deref(), Some("KEY-01"));
        assert_eq!(response.context.get("jwt_id").map(String::as_str), Some("jwt-01"));
        assert_eq!(response.auth_message(), Some("Authorized"));
    }

    #[test]
    fn test_default_usage_key_and_no_jwt_id() {
        let response = synthesize(&allowed(), Some(&TokenClaims::default()));

        assert_eq!(
            response.usage_identifier_key.as_deref(),
            Some(DEFAULT_USAGE_IDENTIFIER_KEY)
        );
        assert!(!response.context.contains_key("jwt_id"));
    }

    #[test]
    fn test_statement_shape() {
        let response = synthesize(&allowed(), None);
        let statement = &response.policy_document.statement;

        assert_eq!(response.policy_document.version, "2012-10-17");
        assert_eq!(statement.len(), 1);
        assert_eq!(statement[0].action, vec!["execute-api:Invoke"]);
        assert_eq!(statement[0].resource, vec![ARN]);
    }

    #[test]
    fn test_wire_format() {
        let claims = TokenClaims {
            jwt_id: "jwt-01".to_string(),
            api_access_key: "KEY-01".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(synthesize(&allowed(), Some(&claims))).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "principalId": "principal-01",
                "policyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Action": ["execute-api:Invoke"],
                        "Effect": "Allow",
                        "Resource": [ARN]
                    }]
                },
                "usageIdentifierKey": "KEY-01",
                "context": {
                    "authMessage": "Authorized",
                    "jwt_id": "jwt-01",
                    "tenant_id": "NO-TENANT"
                }
            })
        );
    }

    #[test]
    fn test_usage_key_omitted_from_wire_without_claims() {
        let json = serde_json::to_value(synthesize(&allowed(), None)).unwrap();
        assert!(json.get("usageIdentifierKey").is_none());
    }
}
