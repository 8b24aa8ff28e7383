//! Access control policy for page routes.
//!
//! The policy is a pure function over three explicit inputs: the classified
//! route, the requester's identity, and the requester's entitlement. It
//! holds no state and performs no I/O; [`AccessPolicyService`] resolves the
//! single subscription read lazily and feeds the result in.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::ports::{AccessGate, SubscriptionRepository};
use super::user::UserId;

/// Path of the paid dashboard page.
pub const DASHBOARD_PATH: &str = "/app/dashboard";
/// Path of the always-reachable account page.
pub const ACCOUNT_PATH: &str = "/app/account";

/// App subpath gated by the entitlement check. Only the dashboard is paid;
/// the account page must stay reachable so users can upgrade.
const ENTITLED_SUBPATH: &str = "dashboard";

/// A page route subject to the access policy.
///
/// Modelled as a closed enum so the policy's match arms are exhaustive and
/// statically checkable; paths outside this surface never reach the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The public landing page at `/`.
    Marketing,
    /// An app page under `/app/`, carrying the remaining subpath.
    ProtectedApp(String),
}

impl Route {
    /// Classify a request path into a policy route.
    ///
    /// Returns `None` for paths outside the policy's page surface (API
    /// routes, health probes, docs); those pass through the guard untouched.
    ///
    /// # Examples
    /// ```
    /// use outlay::domain::Route;
    ///
    /// assert_eq!(Route::classify("/"), Some(Route::Marketing));
    /// assert_eq!(
    ///     Route::classify("/app/dashboard"),
    ///     Some(Route::ProtectedApp("dashboard".into()))
    /// );
    /// assert_eq!(Route::classify("/api/v1/expenses"), None);
    /// ```
    pub fn classify(path: &str) -> Option<Self> {
        if path == "/" {
            return Some(Self::Marketing);
        }
        path.strip_prefix("/app/")
            .or_else(|| (path == "/app").then_some(""))
            .map(|subpath| Self::ProtectedApp(subpath.trim_end_matches('/').to_owned()))
    }

    /// Whether this route requires the entitlement check for authenticated
    /// requesters.
    pub fn requires_entitlement(&self) -> bool {
        matches!(self, Self::ProtectedApp(subpath) if subpath == ENTITLED_SUBPATH)
    }
}

/// The requester's identity, resolved from the session before the policy
/// runs. Passing it explicitly keeps the policy pure and testable without a
/// running server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// No valid session.
    Anonymous,
    /// Valid session for the given user.
    Authenticated(UserId),
}

/// Whether the requester's subscription permits paid features.
///
/// Lookup failures degrade to [`Entitlement::NotEntitled`]: the policy fails
/// closed, never open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entitlement {
    Entitled,
    NotEntitled,
}

/// Outcome of the access policy for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Proceed to the handler.
    Allow,
    /// Short-circuit with a redirect to the given path.
    RedirectTo(String),
    /// Refuse; the guard surfaces this as a sign-in challenge.
    Deny,
}

/// Decide the outcome for a request. Rules apply in precedence order; the
/// first match wins.
///
/// 1. Authenticated requesters never see the marketing page; they are sent
///    to the dashboard. This wins over entitlement: an unsubscribed user is
///    still bounced off `/` to the dashboard, which then independently
///    redirects them to the account page (the two-hop redirect is expected).
/// 2. All app subpaths require a session.
/// 3. The dashboard additionally requires an active subscription; without
///    one the requester is sent to the account page to upgrade, not denied.
/// 4. Everything else is allowed.
///
/// # Examples
/// ```
/// use outlay::domain::{decide, Decision, Entitlement, Identity, Route};
///
/// let decision = decide(&Route::Marketing, &Identity::Anonymous, Entitlement::NotEntitled);
/// assert_eq!(decision, Decision::Allow);
/// ```
pub fn decide(route: &Route, identity: &Identity, entitlement: Entitlement) -> Decision {
    match (route, identity) {
        (Route::Marketing, Identity::Authenticated(_)) => {
            Decision::RedirectTo(DASHBOARD_PATH.to_owned())
        }
        (Route::Marketing, Identity::Anonymous) => Decision::Allow,
        (Route::ProtectedApp(_), Identity::Anonymous) => Decision::Deny,
        (route, Identity::Authenticated(_)) => {
            if route.requires_entitlement() && entitlement == Entitlement::NotEntitled {
                Decision::RedirectTo(ACCOUNT_PATH.to_owned())
            } else {
                Decision::Allow
            }
        }
    }
}

/// Policy service resolving entitlement through the subscription port.
///
/// The subscription read happens only when a rule actually needs it, so
/// anonymous requests and non-gated routes never touch the store.
pub struct AccessPolicyService<S> {
    subscriptions: Arc<S>,
}

impl<S> AccessPolicyService<S> {
    /// Create a policy service over the given subscription repository.
    pub fn new(subscriptions: Arc<S>) -> Self {
        Self { subscriptions }
    }
}

impl<S> AccessPolicyService<S>
where
    S: SubscriptionRepository,
{
    async fn entitlement(&self, user_id: &UserId) -> Entitlement {
        match self.subscriptions.find_by_user_id(user_id).await {
            Ok(Some(subscription)) if subscription.is_active() => Entitlement::Entitled,
            Ok(_) => Entitlement::NotEntitled,
            Err(error) => {
                // Fail closed: an unreachable store must not grant access.
                warn!(%user_id, %error, "subscription lookup failed; treating as not entitled");
                Entitlement::NotEntitled
            }
        }
    }
}

#[async_trait]
impl<S> AccessGate for AccessPolicyService<S>
where
    S: SubscriptionRepository,
{
    async fn decide(&self, route: &Route, identity: &Identity) -> Decision {
        let entitlement = match identity {
            Identity::Authenticated(user_id) if route.requires_entitlement() => {
                self.entitlement(user_id).await
            }
            _ => Entitlement::NotEntitled,
        };
        decide(route, identity, entitlement)
    }
}
