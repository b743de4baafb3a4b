// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for tabledef.
//!
//! This module contains pure logic with no I/O: the table model, the
//! definition text parser and the foreign-key dependency graph. Reading
//! definition files and applying definitions to a database are handled via
//! ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: No filesystem, network, or external calls
//! - **No logging**: Malformed input is returned as [`ParseWarning`] values
//! - **Immutable entities**: Definitions are built once and never mutated
//! - **Data-driven variants**: ordinary / pivot / morph pivot is a tag, not a
//!   type hierarchy
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod graph;
pub mod naming;
pub mod parser;
pub mod value_objects;

// Re-exports for convenience
pub use entities::{
    Artifact, Column, ForeignKey, Relation, RelationKind, TableDefinition, TableDefinitionBuilder,
};
pub use error::{DomainError, ErrorCategory};
pub use graph::{BrokenEdge, Child, DependencyGraph, Linearized, Node, NodeId};
pub use parser::{ParseWarning, Section, Sections};
pub use value_objects::{CyclePolicy, MethodCall, Param, TableKind, TableType};
