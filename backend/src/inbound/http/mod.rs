//! Inbound HTTP adapter: handlers, session plumbing, and error mapping.

pub mod billing;
pub mod error;
pub mod expenses;
pub mod health;
pub mod pages;
pub mod session;
pub mod state;
pub mod users;

#[cfg(test)]
pub mod test_utils;

pub use crate::domain::ApiResult;
