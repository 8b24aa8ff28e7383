//! Port for expense persistence.
//!
//! The [`ExpenseRepository`] trait defines the contract for storing,
//! mutating, and listing expense rows. Adapters provide durable storage
//! (PostgreSQL); the fixture keeps rows in memory for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Expense, ExpenseDraft, ExpenseId, ExpenseUpdate, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by expense repository adapters.
    pub enum ExpenseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "expense repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "expense repository query failed: {message}",
        /// The addressed row does not exist.
        MissingRow { id: i64 } =>
            "expense {id} does not exist",
    }
}

/// Port for expense storage.
///
/// All mutations are id-addressed single-row statements; the store's native
/// last-write-wins semantics resolve concurrent writes to the same id. The
/// repository knows nothing about ownership; the expense service enforces
/// that invariant before calling mutating methods.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Insert a new expense stamped with the given creator.
    ///
    /// The store assigns `id` and `date`.
    async fn insert(
        &self,
        creator_id: &UserId,
        draft: &ExpenseDraft,
    ) -> Result<Expense, ExpenseRepositoryError>;

    /// Fetch an expense by id. Returns `None` when the row does not exist.
    async fn find_by_id(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseRepositoryError>;

    /// Overwrite the mutable fields of an existing row.
    async fn update(
        &self,
        id: ExpenseId,
        update: &ExpenseUpdate,
    ) -> Result<Expense, ExpenseRepositoryError>;

    /// Hard-delete a row.
    async fn delete(&self, id: ExpenseId) -> Result<(), ExpenseRepositoryError>;

    /// List all expenses created by a user, oldest first.
    async fn list_by_creator(
        &self,
        creator_id: &UserId,
    ) -> Result<Vec<Expense>, ExpenseRepositoryError>;
}

/// In-memory expense store for tests and local development.
///
/// Ids are assigned sequentially starting at 1. Not intended for production
/// use; the Diesel adapter provides durable storage.
#[derive(Debug, Default)]
pub struct FixtureExpenseRepository {
    rows: Mutex<BTreeMap<i64, Expense>>,
}

impl FixtureExpenseRepository {
    /// Create an empty fixture store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<i64, Expense>> {
        // Mutex poisoning only happens after a panic in another test thread;
        // recover the data rather than cascading the panic.
        match self.rows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl ExpenseRepository for FixtureExpenseRepository {
    async fn insert(
        &self,
        creator_id: &UserId,
        draft: &ExpenseDraft,
    ) -> Result<Expense, ExpenseRepositoryError> {
        let mut rows = self.lock();
        let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
        let expense = Expense {
            id: ExpenseId(id),
            creator_id: creator_id.clone(),
            amount: draft.amount(),
            description: draft.description().to_owned(),
            date: Utc::now(),
        };
        rows.insert(id, expense.clone());
        Ok(expense)
    }

    async fn find_by_id(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseRepositoryError> {
        Ok(self.lock().get(&id.0).cloned())
    }

    async fn update(
        &self,
        id: ExpenseId,
        update: &ExpenseUpdate,
    ) -> Result<Expense, ExpenseRepositoryError> {
        let mut rows = self.lock();
        let row = rows
            .get_mut(&id.0)
            .ok_or_else(|| ExpenseRepositoryError::missing_row(id.0))?;
        row.amount = update.amount();
        row.description = update.description().to_owned();
        Ok(row.clone())
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), ExpenseRepositoryError> {
        let mut rows = self.lock();
        rows.remove(&id.0)
            .map(|_| ())
            .ok_or_else(|| ExpenseRepositoryError::missing_row(id.0))
    }

    async fn list_by_creator(
        &self,
        creator_id: &UserId,
    ) -> Result<Vec<Expense>, ExpenseRepositoryError> {
        Ok(self
            .lock()
            .values()
            .filter(|expense| &expense.creator_id == creator_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExpenseDraft, ExpenseUpdate};

    fn user(id: &str) -> UserId {
        UserId::new(id).expect("valid id")
    }

    #[tokio::test]
    async fn fixture_assigns_sequential_ids_and_lists_by_creator() {
        let repo = FixtureExpenseRepository::new();
        let ada = user("user_ada");
        let grace = user("user_grace");

        let first = repo
            .insert(&ada, &ExpenseDraft::new(42.5, "lunch").expect("valid draft"))
            .await
            .expect("insert succeeds");
        let second = repo
            .insert(&grace, &ExpenseDraft::new(9.0, "coffee").expect("valid draft"))
            .await
            .expect("insert succeeds");
        assert_eq!(first.id, ExpenseId(1));
        assert_eq!(second.id, ExpenseId(2));

        let listed = repo.list_by_creator(&ada).await.expect("list succeeds");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].description, "lunch");
    }

    #[tokio::test]
    async fn fixture_update_round_trips() {
        let repo = FixtureExpenseRepository::new();
        let ada = user("user_ada");
        let created = repo
            .insert(&ada, &ExpenseDraft::new(42.5, "lunch").expect("valid draft"))
            .await
            .expect("insert succeeds");

        let updated = repo
            .update(
                created.id,
                &ExpenseUpdate::new(10.0, "x").expect("valid update"),
            )
            .await
            .expect("update succeeds");
        assert_eq!(updated.amount, 10.0);
        assert_eq!(updated.description, "x");
        assert_eq!(updated.creator_id, created.creator_id);
        assert_eq!(updated.date, created.date);
    }

    #[tokio::test]
    async fn fixture_delete_of_missing_row_errors() {
        let repo = FixtureExpenseRepository::new();
        let err = repo.delete(ExpenseId(404)).await.expect_err("must fail");
        assert_eq!(err, ExpenseRepositoryError::missing_row(404_i64));
    }
}
