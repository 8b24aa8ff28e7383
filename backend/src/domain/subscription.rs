//! Subscription records read from the store.
//!
//! Subscription lifecycle belongs entirely to the payment provider's
//! checkout flow; this core only reads the current status to answer
//! entitlement questions.

use chrono::{DateTime, Utc};

use super::user::UserId;

/// Status value that grants entitlement. Any other value, including absence
/// of a row, means not entitled.
pub const ACTIVE_STATUS: &str = "active";

/// A subscription row owned by exactly one user.
///
/// `status` is kept as the raw provider string rather than an enum: the
/// provider vocabulary ("incomplete", "past_due", ...) evolves outside this
/// codebase and everything except `"active"` is treated uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    /// Owning user.
    pub user_id: UserId,
    /// Raw provider status string.
    pub status: String,
    /// Row creation timestamp; the earliest row per user is authoritative.
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Whether this subscription grants access to paid features.
    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }
}
