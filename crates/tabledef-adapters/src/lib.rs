//! Infrastructure adapters for tabledef.
//!
//! This crate implements the ports defined in `tabledef_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod recorder;
pub mod source;

// Re-export commonly used adapters
pub use recorder::{MigrationPlan, MigrationPlanRecorder, SeedPlan, SeedPlanRecorder};
pub use source::{FsDefinitionSource, MemoryDefinitionSource};
