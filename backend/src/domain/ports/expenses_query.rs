//! Driving port for expense reads.

use async_trait::async_trait;

use crate::domain::{Error, Expense, UserId};

/// Port for listing a user's own expenses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpensesQuery: Send + Sync {
    /// List the requester's expenses, oldest first.
    async fn list(&self, requester: &UserId) -> Result<Vec<Expense>, Error>;
}

/// Fixture query returning an empty list.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExpensesQuery;

#[async_trait]
impl ExpensesQuery for FixtureExpensesQuery {
    async fn list(&self, _requester: &UserId) -> Result<Vec<Expense>, Error> {
        Ok(Vec::new())
    }
}
