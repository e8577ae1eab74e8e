//! Authorization decisions and their rendering as gateway policies.
//!
//! - [`decision`] - The mutable Allow/Deny record built during evaluation
//! - [`document`] - The policy response returned to the gateway

pub mod decision;
pub mod document;

pub use decision::{AuthorizationDecision, Effect};
pub use document::{PolicyDocument, PolicyResponse, PolicyStatement, synthesize};
