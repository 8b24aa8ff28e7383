//! Domain types, the access control policy, and the expense service.
//!
//! Everything here is transport agnostic: no Actix types, no Diesel types,
//! no reqwest types. Adapters on either side of the hexagon translate.

pub mod access;
pub mod error;
pub mod expense;
pub mod expense_service;
pub mod ports;
pub mod subscription;
pub mod user;

pub use self::access::{
    decide, AccessPolicyService, Decision, Entitlement, Identity, Route, ACCOUNT_PATH,
    DASHBOARD_PATH,
};
pub use self::error::{Error, ErrorCode};
pub use self::expense::{
    Expense, ExpenseDraft, ExpenseId, ExpenseUpdate, ExpenseValidationError, DESCRIPTION_MAX,
};
pub use self::expense_service::ExpenseService;
pub use self::subscription::{Subscription, ACTIVE_STATUS};
pub use self::user::{
    LoginCredentials, UserEmail, UserId, UserValidationError, VerifiedUser, USER_ID_MAX,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use outlay::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<u32> {
///     Err(Error::forbidden("nope"))
/// }
/// # let _ = handler();
/// ```
pub type ApiResult<T> = Result<T, Error>;
