//! Node Store Error Types
//!
//! Failures raised while opening the libsql catalog database, creating its
//! tables, or decoding `hierarchy_nodes` and catalog rows. Traversal failures
//! live in the service-layer `HierarchyError`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The database file could not be opened
    #[error("Cannot open catalog database {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        source: libsql::Error,
    },

    /// Creating `hierarchy_nodes`, its index or a catalog table failed
    #[error("Catalog schema setup failed: {0}")]
    InitializationFailed(String),

    #[error("Permission denied for catalog database: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Cannot create database directory: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    #[error("libsql error: {0}")]
    LibsqlError(#[from] libsql::Error),

    /// A statement against the node store or a catalog failed
    #[error("Statement failed: {context}")]
    SqlExecutionError { context: String },

    /// A column held a value the models cannot represent
    #[error("Malformed row: {context}")]
    RowDecodeError { context: String },
}

impl DatabaseError {
    pub fn connection_failed(path: PathBuf, source: libsql::Error) -> Self {
        Self::ConnectionFailed { path, source }
    }

    pub fn initialization_failed(msg: impl Into<String>) -> Self {
        Self::InitializationFailed(msg.into())
    }

    pub fn permission_denied(path: PathBuf) -> Self {
        Self::PermissionDenied { path }
    }

    /// Wrap a failed statement with the SQL or row it concerned
    pub fn sql_execution(context: impl Into<String>) -> Self {
        Self::SqlExecutionError {
            context: context.into(),
        }
    }

    pub fn row_decode(context: impl Into<String>) -> Self {
        Self::RowDecodeError {
            context: context.into(),
        }
    }

    /// Whether the failure happened before any statement ran
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::PermissionDenied { .. }
                | Self::DirectoryCreationFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_failure_classification() {
        assert!(DatabaseError::permission_denied(PathBuf::from("/root/x.db")).is_open_failure());
        assert!(!DatabaseError::sql_execution("SELECT 1").is_open_failure());
        assert!(!DatabaseError::row_decode("state").is_open_failure());
    }

    #[test]
    fn test_messages_carry_context() {
        let err = DatabaseError::row_decode("created_at 'yesterday'");
        assert_eq!(err.to_string(), "Malformed row: created_at 'yesterday'");
    }
}
