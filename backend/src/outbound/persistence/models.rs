//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain; the repositories translate them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{expenses, subscriptions};

/// Row struct for reading from the expenses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExpenseRow {
    pub id: i64,
    pub creator_id: String,
    pub amount: f64,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Insertable struct for creating new expense rows.
///
/// `id` and `date` are assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = expenses)]
pub(crate) struct NewExpenseRow<'a> {
    pub creator_id: &'a str,
    pub amount: f64,
    pub description: &'a str,
}

/// Changeset struct overwriting an expense's mutable fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = expenses)]
pub(crate) struct ExpenseChangeset<'a> {
    pub amount: f64,
    pub description: &'a str,
}

/// Row struct for reading from the subscriptions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubscriptionRow {
    pub user_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
