//! Scope authorization engine.
//!
//! A token's `scope` claim is an ordered list of entries in one of two forms:
//!
//! - a bare capability: `admin`, `info`
//! - a dotted resource/verb pair: `account.read`, `test.write`
//!
//! The entries are checked in order and the first one that grants the
//! target wins. `admin` grants everything. Any other capability grants every
//! path that contains it as a substring. A resource/verb pair grants only a
//! path equal to its resource, and only for a method matching its verb (or
//! `ANY`).
//!
//! | Method | Verb     |
//! |--------|----------|
//! | GET    | `read`   |
//! | POST   | `write`  |
//! | PUT    | `write`  |
//! | PATCH  | `update` |
//! | DELETE | `delete` |

use crate::request::{HttpMethod, TargetResource};
use crate::token::TokenClaims;

/// Capability granting every target.
pub const ADMIN_SCOPE: &str = "admin";

/// Parsed view over one scope string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeEntry<'a> {
    /// Bare capability name.
    Capability(&'a str),
    /// `<resource>.<verb>`; segments past the second are ignored.
    ResourceVerb {
        resource: &'a str,
        verb: &'a str,
    },
}

impl<'a> ScopeEntry<'a> {
    /// Parses a scope string. Never fails: a string without a `.` is a
    /// capability, including the empty string.
    #[must_use]
    pub fn parse(scope: &'a str) -> Self {
        let mut segments = scope.split('.');
        match (segments.next(), segments.next()) {
            (Some(resource), Some(verb)) => Self::ResourceVerb { resource, verb },
            _ => Self::Capability(scope),
        }
    }

    /// Returns `true` if this entry alone grants access to `target`.
    #[must_use]
    pub fn grants(&self, target: &TargetResource) -> bool {
        match *self {
            Self::Capability(ADMIN_SCOPE) => true,
            Self::Capability(name) => target.resource_path.contains(name),
            Self::ResourceVerb { resource, verb } => {
                if resource != target.resource_path {
                    return false;
                }
                match &target.http_method {
                    HttpMethod::Any => true,
                    method => method.required_verb() == Some(verb),
                }
            }
        }
    }
}

/// Decides whether `claims` grant access to `target`.
#[must_use]
pub fn authorize(claims: &TokenClaims, target: &TargetResource) -> bool {
    let granted = claims
        .scope
        .iter()
        .find(|scope| ScopeEntry::parse(scope).grants(target));

    match granted {
        Some(scope) => {
            tracing::debug!(
                scope = %scope,
                method = %target.http_method,
                path = %target.resource_path,
                "Scope grants access"
            );
            true
        }
        None => {
            tracing::debug!(
                scopes = ?claims.scope,
                method = %target.http_method,
                path = %target.resource_path,
                "No scope grants access"
            );
            false
        }
    }
}
