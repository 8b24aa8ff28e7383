//! PostgreSQL-backed `ExpenseRepository` implementation using Diesel.
//!
//! A thin translator between Diesel rows and the domain's expense types.
//! Ownership checks live in the expense service; this adapter executes the
//! id-addressed statements it is asked for.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ExpenseRepository, ExpenseRepositoryError};
use crate::domain::{Expense, ExpenseDraft, ExpenseId, ExpenseUpdate, UserId};

use super::diesel_error::{classify_diesel_error, classify_pool_error, DbFailure};
use super::models::{ExpenseChangeset, ExpenseRow, NewExpenseRow};
use super::pool::{DbPool, PoolError};
use super::schema::expenses;

/// Diesel-backed implementation of the `ExpenseRepository` port.
#[derive(Clone)]
pub struct DieselExpenseRepository {
    pool: DbPool,
}

impl DieselExpenseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExpenseRepositoryError {
    let (DbFailure::Connection(message) | DbFailure::Query(message)) = classify_pool_error(error);
    ExpenseRepositoryError::connection(message)
}

fn map_diesel_error(error: diesel::result::Error) -> ExpenseRepositoryError {
    match classify_diesel_error(error) {
        DbFailure::Connection(message) => ExpenseRepositoryError::connection(message),
        DbFailure::Query(message) => ExpenseRepositoryError::query(message),
    }
}

/// Convert a database row to a domain expense.
///
/// A creator id that no longer parses means the row was written outside this
/// service's validation; surface it as a query error rather than panicking.
fn row_to_expense(row: ExpenseRow) -> Result<Expense, ExpenseRepositoryError> {
    let creator_id = UserId::new(row.creator_id)
        .map_err(|err| ExpenseRepositoryError::query(format!("invalid creator id: {err}")))?;
    Ok(Expense {
        id: ExpenseId(row.id),
        creator_id,
        amount: row.amount,
        description: row.description,
        date: row.date,
    })
}

#[async_trait]
impl ExpenseRepository for DieselExpenseRepository {
    async fn insert(
        &self,
        creator_id: &UserId,
        draft: &ExpenseDraft,
    ) -> Result<Expense, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(expenses::table)
            .values(NewExpenseRow {
                creator_id: creator_id.as_ref(),
                amount: draft.amount(),
                description: draft.description(),
            })
            .returning(ExpenseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_expense(row)
    }

    async fn find_by_id(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ExpenseRow> = expenses::table
            .find(id.0)
            .select(ExpenseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_expense).transpose()
    }

    async fn update(
        &self,
        id: ExpenseId,
        update: &ExpenseUpdate,
    ) -> Result<Expense, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ExpenseRow> = diesel::update(expenses::table.find(id.0))
            .set(ExpenseChangeset {
                amount: update.amount(),
                description: update.description(),
            })
            .returning(ExpenseRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_expense)
            .transpose()?
            .ok_or_else(|| ExpenseRepositoryError::missing_row(id.0))
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(expenses::table.find(id.0))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(ExpenseRepositoryError::missing_row(id.0));
        }
        Ok(())
    }

    async fn list_by_creator(
        &self,
        creator_id: &UserId,
    ) -> Result<Vec<Expense>, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ExpenseRow> = expenses::table
            .filter(expenses::creator_id.eq(creator_id.as_ref()))
            .select(ExpenseRow::as_select())
            .order_by((expenses::date.asc(), expenses::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_expense).collect()
    }
}
