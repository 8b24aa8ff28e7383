//! PostgreSQL persistence adapters using Diesel.
//!
//! Thin translators between Diesel rows and domain types, backed by
//! `diesel-async` with `bb8` connection pooling. Row structs and schema
//! definitions stay internal to this module; only the repository types and
//! the pool are exported.

mod diesel_error;
mod diesel_expense_repository;
mod diesel_subscription_repository;
mod models;
mod pool;
mod schema;

pub use diesel_expense_repository::DieselExpenseRepository;
pub use diesel_subscription_repository::DieselSubscriptionRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
