//! Error taxonomy for the store.
//!
//! Hard failures only. A write whose key fields are missing is not an error;
//! it is reported as [`crate::WriteOutcome::Skipped`].

use std::fmt;

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Which integrity constraint the database rejected a write with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    NotNull,
    ForeignKey,
    Unique,
    Check,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotNull => "not-null",
            Self::ForeignKey => "foreign key",
            Self::Unique => "unique",
            Self::Check => "check",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// The pool could not be established at startup.
    #[error("failed to create connection pool for {target}: {source}")]
    PoolCreation {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    /// No connection could be checked out (timeout, or the pool was drained).
    #[error("failed to check out a connection: {0}")]
    Checkout(#[source] sqlx::Error),

    /// The database rejected a write on an integrity constraint.
    #[error("{kind} constraint violation{}: {message}", constraint_suffix(.constraint))]
    ConstraintViolation {
        kind: ConstraintKind,
        constraint: Option<String>,
        message: String,
    },

    /// Any other failure inside a transaction.
    #[error("transaction failed: {0}")]
    Transaction(#[source] sqlx::Error),
}

fn constraint_suffix(constraint: &Option<String>) -> String {
    constraint
        .as_deref()
        .map(|name| format!(" on {name}"))
        .unwrap_or_default()
}

impl StoreError {
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }

    /// The violated constraint kind, if this is a constraint violation.
    #[must_use]
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            Self::ConstraintViolation { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let kind = match err.as_database_error().map(|db| db.kind()) {
            Some(ErrorKind::NotNullViolation) => ConstraintKind::NotNull,
            Some(ErrorKind::ForeignKeyViolation) => ConstraintKind::ForeignKey,
            Some(ErrorKind::UniqueViolation) => ConstraintKind::Unique,
            Some(ErrorKind::CheckViolation) => ConstraintKind::Check,
            _ => return Self::Transaction(err),
        };

        let (constraint, message) = match err.as_database_error() {
            Some(db) => (db.constraint().map(str::to_string), db.message().to_string()),
            None => (None, err.to_string()),
        };

        Self::ConstraintViolation {
            kind,
            constraint,
            message,
        }
    }
}
