//! Driving port for expense mutations.

use async_trait::async_trait;

use crate::domain::{Error, Expense, ExpenseDraft, ExpenseId, ExpenseUpdate, UserId};

/// Port for the three expense mutations.
///
/// Every method takes the requester explicitly; implementations enforce the
/// ownership invariant before touching the store and invalidate the owner's
/// cached dashboard afterwards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpensesCommand: Send + Sync {
    /// Create an expense stamped with the requester as creator.
    async fn add(&self, requester: &UserId, draft: ExpenseDraft) -> Result<Expense, Error>;

    /// Edit the mutable fields of an expense the requester owns.
    async fn edit(
        &self,
        requester: &UserId,
        id: ExpenseId,
        update: ExpenseUpdate,
    ) -> Result<Expense, Error>;

    /// Delete an expense the requester owns.
    async fn delete(&self, requester: &UserId, id: ExpenseId) -> Result<(), Error>;
}
