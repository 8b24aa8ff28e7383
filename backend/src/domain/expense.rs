//! Expense aggregate and validated mutation inputs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::UserId;

/// Maximum accepted length for an expense description.
pub const DESCRIPTION_MAX: usize = 200;

/// Validation errors for expense inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseValidationError {
    NonFiniteAmount,
    EmptyDescription,
    DescriptionTooLong { max: usize },
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteAmount => write!(f, "amount must be a finite number"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// Store-assigned expense identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ExpenseId(pub i64);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single expense row owned by exactly one user.
///
/// ## Invariants
/// - `creator_id` is stamped from the session identity at creation and never
///   changes afterwards.
/// - `amount` is finite; `description` is non-empty and bounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Store-assigned identifier, unique within the store.
    pub id: ExpenseId,
    /// Owning user; immutable once set.
    #[schema(value_type = String, example = "user_2f8a91c3")]
    pub creator_id: UserId,
    /// Signed amount. Negative values record refunds.
    #[schema(example = 42.5)]
    pub amount: f64,
    /// Free-text description.
    #[schema(example = "lunch")]
    pub description: String,
    /// Creation timestamp, assigned by the store.
    pub date: DateTime<Utc>,
}

/// Validated payload for creating an expense.
///
/// The creator is deliberately absent: handlers stamp it from the resolved
/// session identity, never from client input.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    amount: f64,
    description: String,
}

fn validate_fields(amount: f64, description: &str) -> Result<(), ExpenseValidationError> {
    if !amount.is_finite() {
        return Err(ExpenseValidationError::NonFiniteAmount);
    }
    if description.trim().is_empty() {
        return Err(ExpenseValidationError::EmptyDescription);
    }
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(ExpenseValidationError::DescriptionTooLong {
            max: DESCRIPTION_MAX,
        });
    }
    Ok(())
}

impl ExpenseDraft {
    /// Validate and construct a draft.
    ///
    /// # Examples
    /// ```
    /// use outlay::domain::ExpenseDraft;
    ///
    /// let draft = ExpenseDraft::new(42.5, "lunch").expect("valid draft");
    /// assert_eq!(draft.amount(), 42.5);
    /// ```
    pub fn new(
        amount: f64,
        description: impl Into<String>,
    ) -> Result<Self, ExpenseValidationError> {
        let description = description.into();
        validate_fields(amount, &description)?;
        Ok(Self {
            amount,
            description,
        })
    }

    /// Signed amount.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Free-text description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}

/// Validated payload for editing an expense's mutable fields.
///
/// Only `amount` and `description` are mutable; identity and ownership are
/// fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseUpdate {
    amount: f64,
    description: String,
}

impl ExpenseUpdate {
    /// Validate and construct an update.
    pub fn new(
        amount: f64,
        description: impl Into<String>,
    ) -> Result<Self, ExpenseValidationError> {
        let description = description.into();
        validate_fields(amount, &description)?;
        Ok(Self {
            amount,
            description,
        })
    }

    /// Signed amount.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Free-text description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}
