//! In-memory definition source for testing and embedding.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tabledef_core::{
    application::{ApplicationError, ports::DefinitionSource},
    domain::TableType,
    error::TabledefResult,
};

/// Thread-safe in-memory definition store.
#[derive(Debug, Clone, Default)]
pub struct MemoryDefinitionSource {
    inner: Arc<RwLock<HashMap<(TableType, String), String>>>,
}

impl MemoryDefinitionSource {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a definition.
    ///
    /// `Base` definitions are stored with ordinary tables.
    pub fn insert(
        &self,
        table_type: TableType,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> TabledefResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert((table_type.storage(), name.into()), text.into());
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert) for fixtures.
    pub fn with(self, table_type: TableType, name: &str, text: &str) -> TabledefResult<Self> {
        self.insert(table_type, name, text)?;
        Ok(self)
    }

    pub fn remove(&self, table_type: TableType, name: &str) -> TabledefResult<Option<String>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.remove(&(table_type.storage(), name.to_string())))
    }

    /// Get the number of definitions.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DefinitionSource for MemoryDefinitionSource {
    fn read(&self, table_type: TableType, name: &str) -> TabledefResult<Option<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.get(&(table_type.storage(), name.to_string())).cloned())
    }

    fn list(&self, table_type: TableType) -> TabledefResult<Vec<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let storage = table_type.storage();
        let mut names: Vec<String> = inner
            .keys()
            .filter(|(t, _)| *t == storage)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_read() {
        let source = MemoryDefinitionSource::new();
        source.insert(TableType::Table, "users", "NAME: users").unwrap();

        assert_eq!(
            source.read(TableType::Table, "users").unwrap().as_deref(),
            Some("NAME: users")
        );
        assert_eq!(source.read(TableType::Pivot, "users").unwrap(), None);
    }

    #[test]
    fn base_shares_table_storage() {
        let source = MemoryDefinitionSource::new()
            .with(TableType::Base, "audit", "[*BASE*]")
            .unwrap();
        assert!(source.read(TableType::Table, "audit").unwrap().is_some());
        assert_eq!(source.list(TableType::Table).unwrap(), vec!["audit"]);
    }

    #[test]
    fn list_is_sorted_per_collection() {
        let source = MemoryDefinitionSource::new()
            .with(TableType::Table, "users", "")
            .unwrap()
            .with(TableType::Table, "comments", "")
            .unwrap()
            .with(TableType::Pivot, "role_user", "")
            .unwrap();

        assert_eq!(source.list(TableType::Table).unwrap(), vec!["comments", "users"]);
        assert_eq!(source.list(TableType::Pivot).unwrap(), vec!["role_user"]);
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn clones_share_the_store() {
        let source = MemoryDefinitionSource::new();
        let clone = source.clone();
        clone.insert(TableType::Table, "users", "").unwrap();
        assert!(!source.is_empty());

        source.remove(TableType::Table, "users").unwrap();
        assert!(clone.is_empty());
    }
}
