//! PostgreSQL-backed `SubscriptionRepository` implementation using Diesel.
//!
//! Read-only: subscription rows are written by the payment provider's
//! fulfilment flow. When a user has several rows, the earliest by creation
//! time is authoritative.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SubscriptionRepository, SubscriptionRepositoryError};
use crate::domain::{Subscription, UserId};

use super::diesel_error::{classify_diesel_error, classify_pool_error, DbFailure};
use super::models::SubscriptionRow;
use super::pool::{DbPool, PoolError};
use super::schema::subscriptions;

/// Diesel-backed implementation of the `SubscriptionRepository` port.
#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SubscriptionRepositoryError {
    let (DbFailure::Connection(message) | DbFailure::Query(message)) = classify_pool_error(error);
    SubscriptionRepositoryError::connection(message)
}

fn map_diesel_error(error: diesel::result::Error) -> SubscriptionRepositoryError {
    match classify_diesel_error(error) {
        DbFailure::Connection(message) => SubscriptionRepositoryError::connection(message),
        DbFailure::Query(message) => SubscriptionRepositoryError::query(message),
    }
}

fn row_to_subscription(row: SubscriptionRow) -> Result<Subscription, SubscriptionRepositoryError> {
    let user_id = UserId::new(row.user_id)
        .map_err(|err| SubscriptionRepositoryError::query(format!("invalid user id: {err}")))?;
    Ok(Subscription {
        user_id,
        status: row.status,
        created_at: row.created_at,
    })
}

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SubscriptionRow> = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id.as_ref()))
            .select(SubscriptionRow::as_select())
            .order_by(subscriptions::created_at.asc())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_subscription).transpose()
    }
}
