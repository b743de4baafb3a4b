//! tabledef Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the tabledef
//! schema scaffolding tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          tabledef-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (OrderingService, PlanService, ...)    │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (DefinitionSource, SchemaBuilder, ...)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   tabledef-adapters (Infrastructure)    │
//! │ (FsDefinitionSource, plan recorders)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (TableDefinition, parser, graph)        │
//! │            No I/O, no logging           │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tabledef_core::prelude::*;
//!
//! # fn run(source: Box<dyn DefinitionSource>) -> TabledefResult<()> {
//! let service = OrderingService::new(source).with_cycle_policy(CyclePolicy::Reject);
//! let report = service.order(&["comments", "posts", "users"])?;
//! assert_eq!(report.names(), vec!["users", "posts", "comments"]);
//! # Ok(())
//! # }
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        OrderReport, OrderingService, PlanService, SeedReport, SeedRequest, SeedService,
        SkippedTable, TableParser, define_table,
        ports::{DefinitionSource, SchemaBuilder, Seeder},
    };
    pub use crate::domain::{
        Column, CyclePolicy, ForeignKey, MethodCall, Param, ParseWarning, Relation, RelationKind,
        TableDefinition, TableKind, TableType,
    };
    pub use crate::error::{TabledefError, TabledefResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
