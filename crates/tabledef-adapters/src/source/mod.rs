//! Definition source adapters.

mod filesystem;
mod memory;

pub use filesystem::{DEFINITION_EXTENSION, FsDefinitionSource};
pub use memory::MemoryDefinitionSource;
