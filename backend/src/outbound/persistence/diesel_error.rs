//! Shared error classification for Diesel persistence adapters.

use tracing::debug;

use super::pool::PoolError;

/// Whether a failure should surface as a connection error or a query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    Connection(String),
    Query(String),
}

/// Extract a readable message from a pool error.
pub(crate) fn classify_pool_error(error: PoolError) -> DbFailure {
    let (PoolError::Checkout { message } | PoolError::Build { message }) = error;
    DbFailure::Connection(message)
}

/// Classify a Diesel error and emit debug context.
pub(crate) fn classify_diesel_error(error: diesel::result::Error) -> DbFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => {
            DbFailure::Connection("database connection error".to_owned())
        }
        other => DbFailure::Query(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_are_connection_failures() {
        let failure = classify_pool_error(PoolError::checkout("timed out"));
        assert_eq!(failure, DbFailure::Connection("timed out".to_owned()));
    }

    #[test]
    fn not_found_is_a_query_failure() {
        let failure = classify_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(failure, DbFailure::Query(_)));
    }
}
