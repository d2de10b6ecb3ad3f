//! Error types for the attribute store.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by the attribute store.
#[derive(Debug)]
pub enum StoreError {
    /// Migration execution failed.
    MigrationFailed {
        /// Underlying migration error.
        source: sqlx::migrate::MigrateError,
    },
    /// A database operation failed.
    QueryFailed {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying SQL error.
        source: sqlx::Error,
    },
    /// An operation affected an unexpected number of rows.
    RowCountMismatch {
        /// Operation identifier.
        operation: &'static str,
        /// Number of rows the operation should have affected.
        expected: u64,
        /// Number of rows actually affected.
        actual: u64,
    },
}

impl Display for StoreError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MigrationFailed { .. } => formatter.write_str("migration failed"),
            Self::QueryFailed { .. } => formatter.write_str("database operation failed"),
            Self::RowCountMismatch { .. } => {
                formatter.write_str("unexpected affected row count")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MigrationFailed { source } => Some(source),
            Self::QueryFailed { source, .. } => Some(source),
            Self::RowCountMismatch { .. } => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(source: sqlx::Error) -> Self {
        Self::QueryFailed {
            operation: "sqlx operation",
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display_and_source() {
        let migration = StoreError::MigrationFailed {
            source: sqlx::migrate::MigrateError::VersionMissing(1),
        };
        assert_eq!(migration.to_string(), "migration failed");
        assert!(migration.source().is_some());

        let query = StoreError::QueryFailed {
            operation: "list attributes",
            source: sqlx::Error::RowNotFound,
        };
        assert_eq!(query.to_string(), "database operation failed");
        assert!(query.source().is_some());

        let mismatch = StoreError::RowCountMismatch {
            operation: "insert attribute",
            expected: 1,
            actual: 0,
        };
        assert_eq!(mismatch.to_string(), "unexpected affected row count");
        assert!(mismatch.source().is_none());

        let from = StoreError::from(sqlx::Error::RowNotFound);
        assert_eq!(from.to_string(), "database operation failed");
        assert!(from.source().is_some());
    }
}
