//! Shared classification of pool and Diesel failures.
//!
//! Repositories translate the [`StoreFailure`] into their own port error, so
//! the Diesel specifics stay in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Store failure category, carrying a message safe to surface in `details`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// The database could not be reached or dropped the connection.
    Connection(String),
    /// The statement failed for any other reason.
    Query(String),
    /// A `CHECK`, `NOT NULL` or uniqueness constraint rejected the write.
    Constraint(String),
}

impl From<PoolError> for StoreFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<DieselError> for StoreFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(
                    ?kind,
                    message = info.message(),
                    constraint = info.constraint_name(),
                    "diesel operation failed"
                );
            }
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::DatabaseError(
                DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand,
                info,
            ) => Self::Connection(info.message().to_owned()),
            DieselError::DatabaseError(
                DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::UniqueViolation,
                info,
            ) => Self::Constraint(
                info.constraint_name()
                    .map(|name| format!("{}: {name}", info.message()))
                    .unwrap_or_else(|| info.message().to_owned()),
            ),
            DieselError::DatabaseError(_, info) => Self::Query(info.message().to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            _ => Self::Query("database error".to_owned()),
        }
    }
}
