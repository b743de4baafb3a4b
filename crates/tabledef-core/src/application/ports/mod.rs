//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `tabledef-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `DefinitionSource`: Definition text storage
//!   - `SchemaBuilder`: Applies a definition to a schema
//!   - `Seeder`: Generates records for a table
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{DefinitionSource, SchemaBuilder, Seeder};

#[cfg(test)]
pub use output::{MockDefinitionSource, MockSchemaBuilder, MockSeeder};
