//! Authorizer error types.
//!
//! These are the failures a single authorization evaluation can run into.
//! None of them leave the [`Authorizer`](crate::Authorizer): each one is
//! turned into a `Deny` decision carrying [`AuthorizerError::deny_message`].

use std::fmt;

/// Failures recovered locally into a `Deny` decision.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizerError {
    /// The method ARN is empty or has fewer than four `/`-separated parts.
    #[error("Unauthorized arn scoped malformed: {arn}")]
    ArnMalformed {
        /// The ARN as received.
        arn: String,
    },

    /// The authorization header is missing or yields an empty token.
    #[error("Unauthorized token not informed")]
    BearerTokenMalformed,

    /// The token signature does not match the signing key.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Any other verification failure: expired, malformed, wrong algorithm.
    ///
    /// Every non-signature verification failure lands here; `reason` keeps
    /// the underlying message for logs.
    #[error("Token expired: {reason}")]
    Expired {
        /// Description of the underlying verification failure.
        reason: String,
    },
}

impl AuthorizerError {
    /// Creates a new `ArnMalformed` error.
    #[must_use]
    pub fn arn_malformed(arn: impl Into<String>) -> Self {
        Self::ArnMalformed { arn: arn.into() }
    }

    /// Creates a new `Expired` error.
    #[must_use]
    pub fn expired(reason: impl Into<String>) -> Self {
        Self::Expired {
            reason: reason.into(),
        }
    }

    /// Returns the kind of this failure without its payload.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ArnMalformed { .. } => FailureKind::ArnMalformed,
            Self::BearerTokenMalformed => FailureKind::BearerTokenMalformed,
            Self::InvalidSignature => FailureKind::InvalidSignature,
            Self::Expired { .. } => FailureKind::Expired,
        }
    }

    /// Returns `true` if the failure happened before the token was verified.
    #[must_use]
    pub fn is_structure_error(&self) -> bool {
        matches!(self, Self::ArnMalformed { .. } | Self::BearerTokenMalformed)
    }

    /// Returns `true` if the token itself was rejected by the verifier.
    #[must_use]
    pub fn is_token_error(&self) -> bool {
        matches!(self, Self::InvalidSignature | Self::Expired { .. })
    }

    /// Returns the `authMessage` reported to the gateway for this failure.
    #[must_use]
    pub fn deny_message(&self) -> &'static str {
        match self {
            Self::ArnMalformed { .. } => "token validation - arn invalid",
            Self::BearerTokenMalformed => "token validation - bearer token invalid",
            Self::InvalidSignature | Self::Expired { .. } => "token validation",
        }
    }
}

/// Payload-free failure kinds, recorded on a denied decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// See [`AuthorizerError::ArnMalformed`].
    ArnMalformed,
    /// See [`AuthorizerError::BearerTokenMalformed`].
    BearerTokenMalformed,
    /// See [`AuthorizerError::InvalidSignature`].
    InvalidSignature,
    /// See [`AuthorizerError::Expired`].
    Expired,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArnMalformed => write!(f, "arn_malformed"),
            Self::BearerTokenMalformed => write!(f, "bearer_token_malformed"),
            Self::InvalidSignature => write!(f, "invalid_signature"),
            Self::Expired => write!(f, "expired"),
        }
    }
}
