//! Repository error types
//!
//! Errors carry the operation that failed, a coarse kind, and optional entity
//! context. Handlers only ever branch on the kind: [`RepositoryError::is_save_failure`]
//! separates recoverable commit failures from infrastructure failures.
//!
//! # Example
//!
//! ```rust
//! use roster_service::repository::{RepositoryError, RepositoryErrorKind};
//!
//! let error = RepositoryError::connection_failed("connection refused");
//! assert!(matches!(error.kind, RepositoryErrorKind::ConnectionFailed));
//! assert!(!error.is_save_failure());
//! ```

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Counting records matching a query
    Count,
    /// Fetching one window of records matching a query
    Fetch,
    /// Looking up a single record by identity
    FindById,
    /// Committing a change set
    Save,
    /// Establishing or migrating the backing store
    Connect,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count => write!(f, "count"),
            Self::Fetch => write!(f, "fetch"),
            Self::FindById => write!(f, "find_by_id"),
            Self::Save => write!(f, "save"),
            Self::Connect => write!(f, "connect"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// A staged update or removal targeted a row that is no longer there
    UpdateConflict,
    /// Database constraint violation (length, foreign key, uniqueness)
    ConstraintViolation,
    /// Failed to connect to the store
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Underlying database error
    DatabaseError,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdateConflict => write!(f, "update_conflict"),
            Self::ConstraintViolation => write!(f, "constraint_violation"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
        }
    }
}

/// Structured repository error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved (e.g., "Student")
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create an update conflict error for a row that disappeared before commit
    ///
    /// ```rust
    /// use roster_service::repository::RepositoryError;
    ///
    /// let error = RepositoryError::update_conflict("Student", "7");
    /// assert!(error.is_save_failure());
    /// ```
    pub fn update_conflict(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::new(
            RepositoryOperation::Save,
            RepositoryErrorKind::UpdateConflict,
            "Expected to affect 1 row but affected 0",
        )
        .with_entity(entity_type, entity_id)
    }

    /// Create a constraint violation error
    pub fn constraint_violation(
        operation: RepositoryOperation,
        message: impl Into<String>,
    ) -> Self {
        Self::new(operation, RepositoryErrorKind::ConstraintViolation, message)
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(
            RepositoryOperation::Connect,
            RepositoryErrorKind::ConnectionFailed,
            message,
        )
    }

    /// Create a timeout error
    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    /// Create a database error
    pub fn database_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DatabaseError, message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Whether the commit of a change set was rejected by the store.
    ///
    /// These are the failures handlers downgrade to a retry prompt instead of
    /// failing the request.
    pub fn is_save_failure(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::UpdateConflict | RepositoryErrorKind::ConstraintViolation
        )
    }

    /// Check if this error is retriable (transient errors that may succeed on retry)
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout
        )
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(ref entity_type), Some(ref entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_operation_display() {
        assert_eq!(format!("{}", RepositoryOperation::Count), "count");
        assert_eq!(format!("{}", RepositoryOperation::Fetch), "fetch");
        assert_eq!(format!("{}", RepositoryOperation::FindById), "find_by_id");
        assert_eq!(format!("{}", RepositoryOperation::Save), "save");
        assert_eq!(format!("{}", RepositoryOperation::Connect), "connect");
    }

    #[test]
    fn test_repository_error_kind_display() {
        assert_eq!(
            format!("{}", RepositoryErrorKind::ConnectionFailed),
            "connection_failed"
        );
        assert_eq!(
            format!("{}", RepositoryErrorKind::UpdateConflict),
            "update_conflict"
        );
        assert_eq!(
            format!("{}", RepositoryErrorKind::ConstraintViolation),
            "constraint_violation"
        );
        assert_eq!(format!("{}", RepositoryErrorKind::Timeout), "timeout");
    }

    #[test]
    fn test_update_conflict_is_save_failure() {
        let error = RepositoryError::update_conflict("Student", "3");
        assert_eq!(error.operation, RepositoryOperation::Save);
        assert!(error.is_save_failure());
        assert!(!error.is_retriable());
    }

    #[test]
    fn test_constraint_violation_is_save_failure() {
        let error =
            RepositoryError::constraint_violation(RepositoryOperation::Save, "value too long");
        assert!(error.is_save_failure());
    }

    #[test]
    fn test_infrastructure_errors_are_not_save_failures() {
        assert!(!RepositoryError::connection_failed("refused").is_save_failure());
        assert!(!RepositoryError::timeout(RepositoryOperation::Save, "slow").is_save_failure());
        assert!(
            !RepositoryError::database_error(RepositoryOperation::Fetch, "syntax")
                .is_save_failure()
        );
    }

    #[test]
    fn test_is_retriable_transient_errors() {
        assert!(RepositoryError::connection_failed("refused").is_retriable());
        assert!(RepositoryError::timeout(RepositoryOperation::Count, "timeout").is_retriable());
    }

    #[test]
    fn test_with_operation() {
        let error = RepositoryError::connection_failed("Connection refused")
            .with_operation(RepositoryOperation::Save);
        assert_eq!(error.operation, RepositoryOperation::Save);
    }

    #[test]
    fn test_display_with_entity() {
        let error = RepositoryError::update_conflict("Student", "99");
        let display = format!("{}", error);
        assert!(display.contains("update_conflict"));
        assert!(display.contains("save"));
        assert!(display.contains("[Student: 99]"));
    }

    #[test]
    fn test_display_without_entity() {
        let error = RepositoryError::database_error(RepositoryOperation::Count, "Query failed");
        let display = format!("{}", error);
        assert!(display.contains("database_error"));
        assert!(display.contains("Query failed"));
        assert!(!display.contains('['));
    }
}
