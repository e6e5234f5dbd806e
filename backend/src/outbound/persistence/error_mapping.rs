//! Classification of pool and Diesel failures shared by every repository.
//!
//! Repositories call [`classify`] and translate the resulting
//! [`StoreFailure`] into their own port error, so constraint handling lives in
//! one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use super::pool::PoolError;

/// Database failure reduced to what the domain can act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// The connection was refused, closed, or could not be checked out.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
    /// Any other failure during execution.
    Query(String),
}

impl StoreFailure {
    /// Whether a constraint violation names `constraint`.
    pub(crate) fn violates(&self, constraint: &str) -> bool {
        match self {
            Self::UniqueViolation {
                constraint: Some(name),
            }
            | Self::ForeignKeyViolation {
                constraint: Some(name),
            } => name == constraint,
            _ => false,
        }
    }

    /// Message describing the failure for infrastructure error variants.
    pub(crate) fn message(&self) -> String {
        match self {
            Self::Connection(message) | Self::Query(message) => message.clone(),
            Self::UniqueViolation { constraint } => {
                format!("unique constraint violated: {}", describe(constraint))
            }
            Self::ForeignKeyViolation { constraint } => {
                format!("foreign key constraint violated: {}", describe(constraint))
            }
        }
    }
}

fn describe(constraint: &Option<String>) -> &str {
    constraint.as_deref().unwrap_or("unnamed constraint")
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
        classify(error)
    }
}

/// Classify a Diesel error, logging the raw failure at `debug`.
pub(crate) fn classify(error: DieselError) -> StoreFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StoreFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            StoreFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreFailure::Connection("database connection closed".to_owned())
        }
        DieselError::NotFound => StoreFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => StoreFailure::Query("database query error".to_owned()),
        DieselError::RollbackTransaction => {
            StoreFailure::Query("transaction rolled back".to_owned())
        }
        _ => StoreFailure::Query("database error".to_owned()),
    }
}

/// Log a constraint violation no repository-specific mapping recognised.
pub(crate) fn warn_unrecognised(repository: &'static str, failure: &StoreFailure) {
    warn!(
        repository,
        failure = %failure.message(),
        "unrecognised constraint violation; may need specific error mapping"
    );
}
