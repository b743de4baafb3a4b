//! Unified error handling for tabledef core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for tabledef core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TabledefError {
    /// Errors from the domain layer (bad definitions, cycles).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (sources, collaborators).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl TabledefError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in tabledef".into(),
                "Please report this issue at: https://github.com/cosecruz/tabledef/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Cycle => ErrorCategory::Cycle,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// `true` when the error removes only one table from a batch run.
    pub fn is_skippable(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_skippable(),
            Self::Application(e) => e.is_skippable(),
            Self::Configuration { .. } | Self::Internal { .. } => false,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Cycle,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type TabledefResult<T> = Result<T, TabledefError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_category_is_mapped() {
        let err: TabledefError = DomainError::CyclicDependency {
            tables: vec!["a".into(), "b".into(), "a".into()],
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Cycle);
        assert!(!err.is_skippable());
    }

    #[test]
    fn not_found_is_skippable() {
        let err: TabledefError = DomainError::TableNotFound {
            table: "ghost".into(),
            table_type: "table".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.is_skippable());
        assert_eq!(err.to_string(), "Table 'ghost' of type 'table' doesn't exist");
    }

    #[test]
    fn store_lock_aborts_the_batch() {
        let err: TabledefError = ApplicationError::StoreLockError.into();
        assert!(!err.is_skippable());
        assert_eq!(err.category(), ErrorCategory::Internal);
    }
}
