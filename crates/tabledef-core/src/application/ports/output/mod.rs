//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `tabledef-adapters` crate provides implementations.

use crate::domain::{Column, ForeignKey, TableDefinition, TableType};
use crate::error::TabledefResult;

/// Port for reading definition text.
///
/// Implemented by:
/// - `tabledef_adapters::source::FsDefinitionSource` (definitions directory)
/// - `tabledef_adapters::source::MemoryDefinitionSource` (testing, embedding)
///
/// `Base` definitions are stored alongside ordinary tables, so
/// implementations look them up in the `Table` collection.
#[cfg_attr(test, mockall::automock)]
pub trait DefinitionSource: Send + Sync {
    /// Raw text of a definition, `Ok(None)` when it does not exist.
    fn read(&self, table_type: TableType, name: &str) -> TabledefResult<Option<String>>;

    /// Names of all definitions of a type, sorted.
    fn list(&self, table_type: TableType) -> TabledefResult<Vec<String>>;
}

/// Port for applying a definition to a database schema.
///
/// The calls arrive in the order produced by
/// [`define_table`](crate::application::services::define_table).
#[cfg_attr(test, mockall::automock)]
pub trait SchemaBuilder: Send + Sync {
    fn create_table(&self, table: &TableDefinition) -> TabledefResult<()>;

    fn add_foreign_key(&self, table: &str, key: &ForeignKey) -> TabledefResult<()>;

    fn add_column(&self, table: &str, column: &Column) -> TabledefResult<()>;

    fn add_primary_column(&self, table: &str, column: &Column) -> TabledefResult<()>;

    fn add_timestamps(&self, table: &str) -> TabledefResult<()>;

    /// Composite primary key over the named columns.
    fn set_primary_key(&self, table: &str, columns: &[String]) -> TabledefResult<()>;
}

/// Port for generating records.
#[cfg_attr(test, mockall::automock)]
pub trait Seeder: Send + Sync {
    fn seed(&self, table: &TableDefinition, count: u32) -> TabledefResult<()>;
}
