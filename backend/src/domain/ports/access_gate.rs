//! Driving port exposing the access policy to the inbound layer.

use async_trait::async_trait;

use crate::domain::access::{Decision, Identity, Route};

/// Port applying the access control policy to a classified page route.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessGate: Send + Sync {
    /// Decide whether the request proceeds, redirects, or is refused.
    async fn decide(&self, route: &Route, identity: &Identity) -> Decision;
}

/// Fixture gate that allows every request.
///
/// Use in tests where the guard's pass-through wiring, not the policy, is
/// under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccessGate;

#[async_trait]
impl AccessGate for FixtureAccessGate {
    async fn decide(&self, _route: &Route, _identity: &Identity) -> Decision {
        Decision::Allow
    }
}
