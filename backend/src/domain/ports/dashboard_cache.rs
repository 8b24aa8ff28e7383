//! Port for the per-user cached dashboard rendering.
//!
//! Mutation handlers invalidate the owner's entry after every write so the
//! next dashboard read observes the change.

use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by dashboard cache adapters.
    pub enum DashboardCacheError {
        /// The cache backend failed.
        Backend { message: String } =>
            "dashboard cache failed: {message}",
    }
}

/// Port for caching the rendered dashboard per user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardCache: Send + Sync {
    /// Fetch the cached rendering for a user, if any.
    async fn get(&self, user_id: &UserId) -> Result<Option<String>, DashboardCacheError>;

    /// Store a freshly rendered dashboard for a user.
    async fn put(&self, user_id: &UserId, html: &str) -> Result<(), DashboardCacheError>;

    /// Drop a user's cached rendering.
    async fn invalidate(&self, user_id: &UserId) -> Result<(), DashboardCacheError>;
}

/// Fixture cache that never holds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDashboardCache;

#[async_trait]
impl DashboardCache for FixtureDashboardCache {
    async fn get(&self, _user_id: &UserId) -> Result<Option<String>, DashboardCacheError> {
        Ok(None)
    }

    async fn put(&self, _user_id: &UserId, _html: &str) -> Result<(), DashboardCacheError> {
        Ok(())
    }

    async fn invalidate(&self, _user_id: &UserId) -> Result<(), DashboardCacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_always_misses_and_accepts_writes() {
        let cache = FixtureDashboardCache;
        let user_id = UserId::new("user_2f8a91c3").expect("valid id");

        cache
            .put(&user_id, "<p>dashboard</p>")
            .await
            .expect("put succeeds");
        assert!(
            cache
                .get(&user_id)
                .await
                .expect("get succeeds")
                .is_none()
        );
        cache.invalidate(&user_id).await.expect("invalidate succeeds");
    }
}
