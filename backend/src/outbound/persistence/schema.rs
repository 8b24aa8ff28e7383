//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Expense rows, each owned by exactly one user.
    expenses (id) {
        /// Primary key, assigned by the store.
        id -> Int8,
        /// Identity provider token of the owning user.
        #[max_length = 64]
        creator_id -> Varchar,
        /// Signed amount. Negative values record refunds.
        amount -> Float8,
        /// Free-text description (max 200 characters).
        #[max_length = 200]
        description -> Varchar,
        /// Creation timestamp, assigned by the store.
        date -> Timestamptz,
    }
}

diesel::table! {
    /// Subscription rows written by the payment provider's checkout flow.
    ///
    /// This service only ever reads them.
    subscriptions (id) {
        /// Primary key, assigned by the store.
        id -> Int8,
        /// Identity provider token of the subscribed user.
        #[max_length = 64]
        user_id -> Varchar,
        /// Provider-reported status string; only `active` grants entitlement.
        #[max_length = 32]
        status -> Varchar,
        /// Row creation timestamp. The earliest row per user is authoritative.
        created_at -> Timestamptz,
    }
}
