//! Application layer errors.
//!
//! These errors represent failures in orchestration (reading definitions,
//! talking to collaborators), not problems with the definitions themselves.
//! Those are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Reading a definition failed for a reason other than absence.
    #[error("Could not read definition '{table}': {reason}")]
    SourceError { table: String, reason: String },

    /// Listing a definitions directory failed.
    #[error("Could not list definitions in {path}: {reason}")]
    ListingFailed { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Definition store error")]
    StoreLockError,

    /// The schema builder rejected a call.
    #[error("Schema builder failed on '{table}': {reason}")]
    SchemaBuilderFailed { table: String, reason: String },

    /// The seeder rejected a table.
    #[error("Seeding '{table}' failed: {reason}")]
    SeedingFailed { table: String, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SourceError { table, .. } => vec![
                format!("Failed to read the definition of '{table}'"),
                "Check that the file is readable and valid UTF-8".into(),
            ],
            Self::ListingFailed { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check the definitions.path setting".into(),
            ],
            Self::StoreLockError => vec![
                "The definition store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::SchemaBuilderFailed { .. } | Self::SeedingFailed { .. } => {
                vec!["Check the error details above".into()]
            }
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ListingFailed { .. } => ErrorCategory::Configuration,
            Self::SourceError { .. }
            | Self::StoreLockError
            | Self::SchemaBuilderFailed { .. }
            | Self::SeedingFailed { .. } => ErrorCategory::Internal,
        }
    }

    /// Only per-definition read failures leave the rest of a batch intact.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::SourceError { .. })
    }
}
