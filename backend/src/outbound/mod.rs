//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories via Diesel and `diesel-async`.
//! - **identity**: reqwest adapter for the external identity provider.
//! - **billing**: reqwest adapter for the hosted checkout provider.
//! - **cache**: in-process dashboard cache.
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations; no business logic lives here.

pub mod billing;
pub mod cache;
pub mod identity;
pub mod persistence;
