pub mod column;
pub mod foreign_key;
pub mod relation;
pub mod table;

pub use column::Column;
pub use foreign_key::ForeignKey;
pub use relation::{Relation, RelationKind};
pub use table::{Artifact, TableDefinition, TableDefinitionBuilder};
