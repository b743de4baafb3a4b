//! Application layer for tabledef.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ordering, planning, seeding)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer and owns everything
//! that needs I/O or logging. Parsing and graph rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    OrderReport, OrderingService, PlanService, SeedReport, SeedRequest, SeedService, SkippedTable,
    TableParser, define_table,
};

// Re-export port traits (for adapter implementation)
pub use ports::{DefinitionSource, SchemaBuilder, Seeder};

pub use error::ApplicationError;
