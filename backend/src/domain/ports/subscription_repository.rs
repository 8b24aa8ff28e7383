//! Port for reading subscription status.
//!
//! The access control policy is the only consumer. Lookups are read-only;
//! rows are written by the payment provider's checkout flow outside this
//! service.

use async_trait::async_trait;

use crate::domain::{Subscription, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by subscription repository adapters.
    pub enum SubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "subscription repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "subscription repository query failed: {message}",
    }
}

/// Port for subscription status lookups.
///
/// When several rows exist for one user, the earliest by creation time is
/// authoritative and must be the one returned.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Fetch the authoritative subscription for a user, if any.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError>;
}

/// Fixture that reports no subscription for anyone.
///
/// Use in tests where entitlement is not under test; callers exercising the
/// entitled path should use a mock instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubscriptionRepository;

#[async_trait]
impl SubscriptionRepository for FixtureSubscriptionRepository {
    async fn find_by_user_id(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError> {
        Ok(None)
    }
}
