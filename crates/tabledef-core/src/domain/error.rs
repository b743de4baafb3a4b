// ============================================================================
// domain/error.rs - DEFINITION & GRAPH ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they are collected into batch reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("Table '{table}' of type '{table_type}' doesn't exist")]
    TableNotFound { table: String, table_type: String },

    /// The definition exists but is a template (`[*BASE*]`).
    #[error("Base table '{table}' is not creatable")]
    BaseTable { table: String },

    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Table '{table}' has no COLUMNS section")]
    MissingColumns { table: String },

    #[error("Invalid table type '{0}' (expected table, pivot or base)")]
    InvalidTableType(String),

    #[error("Invalid cycle policy '{0}' (expected reject or break)")]
    InvalidCyclePolicy(String),

    #[error("{kind} table '{table}' declares {count} primary columns")]
    InvalidPrimaryColumns {
        table: String,
        kind: &'static str,
        count: usize,
    },

    // ========================================================================
    // Cycles
    // ========================================================================
    #[error("Cyclic column inheritance: {}", chain.join(" -> "))]
    CyclicInheritance { chain: Vec<String> },

    #[error("Cyclic foreign key dependency: {}", tables.join(" -> "))]
    CyclicDependency { tables: Vec<String> },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TableNotFound { table, table_type } => vec![
                format!("No {table_type} definition named '{table}' was found"),
                "Check the definitions directory (tabledef config get definitions.path)".into(),
            ],
            Self::BaseTable { table } => vec![
                format!("'{table}' is a base table and can only be inherited"),
                format!("Try: tabledef show {table} --type base"),
            ],
            Self::MissingColumns { table } => vec![
                format!("Add a COLUMNS: section to '{table}'"),
            ],
            Self::InvalidPrimaryColumns { kind, .. } => vec![
                format!("A {kind} table needs 2 ([*PRIMARY*]) columns, a morph pivot 3 or 4"),
            ],
            Self::CyclicInheritance { chain } => vec![
                "Column inheritance must not loop back on itself".into(),
                format!("Chain: {}", chain.join(" -> ")),
            ],
            Self::CyclicDependency { tables } => vec![
                format!("These tables reference each other: {}", tables.join(", ")),
                "Make one of the foreign keys nullable and fill it after seeding".into(),
                "Or set ordering.cycle_policy = \"break\" to drop the closing edge".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TableNotFound { .. } => ErrorCategory::NotFound,
            Self::BaseTable { .. }
            | Self::MissingColumns { .. }
            | Self::InvalidTableType(_)
            | Self::InvalidCyclePolicy(_)
            | Self::InvalidPrimaryColumns { .. } => ErrorCategory::Validation,
            Self::CyclicInheritance { .. } | Self::CyclicDependency { .. } => ErrorCategory::Cycle,
        }
    }

    /// `true` for errors that only remove one table from a batch.
    pub fn is_skippable(&self) -> bool {
        !matches!(self, Self::CyclicDependency { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Cycle,
    NotFound,
    Internal,
}
