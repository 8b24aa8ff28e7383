//! Expense domain service.
//!
//! Implements the driving ports for expense reads and mutations, enforcing
//! the ownership invariant in one place instead of re-deriving it per call
//! site, and invalidating the owner's cached dashboard after every write.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    DashboardCache, DashboardCacheError, ExpenseRepository, ExpenseRepositoryError,
    ExpensesCommand, ExpensesQuery,
};
use crate::domain::{Error, Expense, ExpenseDraft, ExpenseId, ExpenseUpdate, UserId};

/// Expense service implementing the driving ports.
#[derive(Clone)]
pub struct ExpenseService<R, C> {
    expenses: Arc<R>,
    dashboard_cache: Arc<C>,
}

impl<R, C> ExpenseService<R, C> {
    /// Create a new service over the given adapters.
    pub fn new(expenses: Arc<R>, dashboard_cache: Arc<C>) -> Self {
        Self {
            expenses,
            dashboard_cache,
        }
    }
}

fn map_repository_error(error: ExpenseRepositoryError) -> Error {
    match error {
        ExpenseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("expense repository unavailable: {message}"))
        }
        ExpenseRepositoryError::Query { message } => {
            Error::internal(format!("expense repository error: {message}"))
        }
        // The service checks existence before mutating, so a missing row here
        // means it vanished between the check and the write; surface it as
        // not found all the same.
        ExpenseRepositoryError::MissingRow { id } => {
            Error::not_found(format!("expense {id} does not exist"))
        }
    }
}

fn map_cache_error(error: DashboardCacheError) -> Error {
    let DashboardCacheError::Backend { message } = error;
    Error::internal(format!("dashboard cache invalidation failed: {message}"))
}

impl<R, C> ExpenseService<R, C>
where
    R: ExpenseRepository,
    C: DashboardCache,
{
    /// Fetch the target row and verify the requester owns it.
    ///
    /// Missing rows and foreign rows produce distinct errors (`NotFound` vs
    /// `Forbidden`); expense ids carry no secret, so the existence leak is
    /// acceptable in exchange for honest client errors.
    async fn require_owned(&self, requester: &UserId, id: ExpenseId) -> Result<Expense, Error> {
        let expense = self
            .expenses
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("expense {id} does not exist")))?;
        if &expense.creator_id != requester {
            debug!(%requester, expense_id = %id, "rejected mutation of foreign expense");
            return Err(Error::forbidden("expense belongs to another user"));
        }
        Ok(expense)
    }

    async fn invalidate_dashboard(&self, owner: &UserId) -> Result<(), Error> {
        self.dashboard_cache
            .invalidate(owner)
            .await
            .map_err(map_cache_error)
    }
}

#[async_trait]
impl<R, C> ExpensesQuery for ExpenseService<R, C>
where
    R: ExpenseRepository,
    C: DashboardCache,
{
    async fn list(&self, requester: &UserId) -> Result<Vec<Expense>, Error> {
        self.expenses
            .list_by_creator(requester)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R, C> ExpensesCommand for ExpenseService<R, C>
where
    R: ExpenseRepository,
    C: DashboardCache,
{
    async fn add(&self, requester: &UserId, draft: ExpenseDraft) -> Result<Expense, Error> {
        let expense = self
            .expenses
            .insert(requester, &draft)
            .await
            .map_err(map_repository_error)?;
        self.invalidate_dashboard(requester).await?;
        Ok(expense)
    }

    async fn edit(
        &self,
        requester: &UserId,
        id: ExpenseId,
        update: ExpenseUpdate,
    ) -> Result<Expense, Error> {
        self.require_owned(requester, id).await?;
        let expense = self
            .expenses
            .update(id, &update)
            .await
            .map_err(map_repository_error)?;
        self.invalidate_dashboard(requester).await?;
        Ok(expense)
    }

    async fn delete(&self, requester: &UserId, id: ExpenseId) -> Result<(), Error> {
        self.require_owned(requester, id).await?;
        self.expenses
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        self.invalidate_dashboard(requester).await
    }
}
