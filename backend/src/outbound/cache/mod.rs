//! In-process dashboard cache adapter.
//!
//! A per-user map behind an async lock. Entries live until the owner's next
//! expense mutation invalidates them; the process restart story is simply an
//! empty cache.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{DashboardCache, DashboardCacheError};
use crate::domain::UserId;

/// In-memory implementation of the `DashboardCache` port.
#[derive(Debug, Default)]
pub struct MemoryDashboardCache {
    entries: RwLock<HashMap<UserId, String>>,
}

impl MemoryDashboardCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DashboardCache for MemoryDashboardCache {
    async fn get(&self, user_id: &UserId) -> Result<Option<String>, DashboardCacheError> {
        Ok(self.entries.read().await.get(user_id).cloned())
    }

    async fn put(&self, user_id: &UserId, html: &str) -> Result<(), DashboardCacheError> {
        self.entries
            .write()
            .await
            .insert(user_id.clone(), html.to_owned());
        Ok(())
    }

    async fn invalidate(&self, user_id: &UserId) -> Result<(), DashboardCacheError> {
        self.entries.write().await.remove(user_id);
        Ok(())
    }
}
