//! # tollgate-auth
//!
//! Request-scoped authorization decisions for an API gateway token authorizer.
//!
//! This crate provides:
//! - Bearer token verification (RSA public key or shared HMAC secret)
//! - Scope-based authorization of a method + path target
//! - Rendering of the decision as a gateway access-policy document
//! - The [`Authorizer`] that sequences all of the above for one request
//!
//! ## Overview
//!
//! Every call to [`Authorizer::authorize`] ends in a [`PolicyResponse`].
//! Malformed input, bad signatures, expired tokens and missing scopes all
//! become `Deny` policies; there is no error path out of the authorizer.
//!
//! ## Modules
//!
//! - [`config`] - Authorizer configuration and authentication mode
//! - [`error`] - Failure kinds recovered into `Deny` decisions
//! - [`request`] - Platform request event, ARN and bearer token parsing
//! - [`token`] - Signing key material and JWT verification
//! - [`scopes`] - Scope entries and the scope authorization engine
//! - [`policy`] - Decisions and policy response synthesis
//! - [`authorizer`] - The decision orchestrator

pub mod authorizer;
pub mod config;
pub mod error;
pub mod policy;
pub mod request;
pub mod scopes;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use authorizer::{Authorizer, Evaluation};
pub use config::{AuthenticationMode, AuthorizerConfig, ConfigError};
pub use error::{AuthorizerError, FailureKind};
pub use policy::{AuthorizationDecision, Effect, PolicyDocument, PolicyResponse, PolicyStatement};
pub use request::{AuthorizerRequest, HttpMethod, RequestContext, TargetResource};
pub use scopes::ScopeEntry;
pub use token::{KeyError, SigningKeyMaterial, TokenClaims};

/// Type alias for results of the individual decision steps.
pub type AuthorizerResult<T> = Result<T, AuthorizerError>;
