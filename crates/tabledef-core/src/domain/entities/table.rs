//! The `TableDefinition` aggregate and its builder.
//!
//! A `TableDefinition` is what one definition file parses into. Ordinary
//! tables, pivots and morph pivots are a single struct tagged by
//! [`TableKind`]; behaviour that differs per kind is computed from the
//! common fields.
//!
//! # Domain purity
//!
//! No I/O and no logging here. Malformed input is reported as values by the
//! parser, and the application layer decides what to log.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::{column::Column, foreign_key::ForeignKey, relation::Relation},
    error::DomainError,
    naming,
    value_objects::{TableKind, TableType},
};

// ── Aggregate root ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub table_type: TableType,
    pub kind: TableKind,
    pub model_name: String,
    pub record_count: u32,
    pub has_timestamps: bool,
    pub excludes: Vec<String>,
    pub columns: Vec<Column>,
    pub primary_columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
    pub relations: Vec<Relation>,
}

impl TableDefinition {
    pub fn builder(name: impl Into<String>) -> TableDefinitionBuilder {
        TableDefinitionBuilder::new(name)
    }

    pub fn is_pivot(&self) -> bool {
        self.kind.is_pivot()
    }

    /// Names of the tables this one references, in declaration order.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.foreign_keys.iter().map(|fk| fk.on.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The columns acting as primary key.
    ///
    /// Explicit `[*PRIMARY*]` columns when declared, otherwise the
    /// auto-increment columns of an ordinary table.
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        if !self.primary_columns.is_empty() {
            return self.primary_columns.iter().collect();
        }
        self.columns
            .iter()
            .filter(|c| c.is_auto_increment())
            .collect()
    }

    pub fn fillable(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.fillable)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Generated artifacts this table asks for, after `EXCLUDE:` is applied.
    ///
    /// Excluding `model` leaves only the migration.
    pub fn artifacts(&self) -> Vec<Artifact> {
        let excluded = |token: &str| self.excludes.iter().any(|e| e == token);
        if excluded("model") {
            return vec![Artifact::Migration];
        }
        let mut artifacts = vec![Artifact::Model];
        if !excluded("c") {
            artifacts.push(Artifact::Controller {
                api: !excluded("api"),
            });
        }
        if !excluded("f") {
            artifacts.push(Artifact::Factory);
        }
        if !excluded("m") {
            artifacts.push(Artifact::Migration);
        }
        if !excluded("s") {
            artifacts.push(Artifact::Seeder);
        }
        if !excluded("resource") {
            artifacts.push(Artifact::Resource);
        }
        if !excluded("collection") {
            artifacts.push(Artifact::Collection);
        }
        artifacts
    }

    /// Serialize back to definition text.
    ///
    /// Parsing the result yields an equal definition.
    pub fn to_definition_text(&self) -> String {
        let mut out = String::new();
        if self.table_type == TableType::Base {
            out.push_str("[*BASE*]\n");
        }
        out.push_str(&format!("NAME: {}\n", self.name));
        out.push_str(&format!("MODEL: {}\n", self.model_name));
        out.push_str(&format!("RECORDS: {}\n", self.record_count));
        out.push_str(&format!("HAS_TIMESTAMPS: {}\n", self.has_timestamps));
        if !self.excludes.is_empty() {
            out.push_str(&format!("EXCLUDE: {}\n", self.excludes.join(", ")));
        }
        if !self.foreign_keys.is_empty() {
            let keys: Vec<String> = self
                .foreign_keys
                .iter()
                .map(ForeignKey::to_definition_entry)
                .collect();
            out.push_str(&format!("FOREIGN_KEYS: {}\n", keys.join(",\n    ")));
        }
        if !self.relations.is_empty() {
            let relations: Vec<String> = self
                .relations
                .iter()
                .map(Relation::to_definition_entry)
                .collect();
            out.push_str(&format!("RELATIONS: {}\n", relations.join(", ")));
        }
        out.push_str("COLUMNS:\n");
        for primary in &self.primary_columns {
            out.push_str(&format!("    {};\n", primary.to_primary_line()));
        }
        for column in &self.columns {
            out.push_str(&format!("    {};\n", column.to_definition_line()));
        }
        out
    }
}

impl fmt::Display for TableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.name, self.kind)?;
        if self.table_type == TableType::Base {
            f.write_str(", base")?;
        }
        f.write_str(")")
    }
}

// ── Artifacts ─────────────────────────────────────────────────────────────────

/// A generated file kind a definition can opt out of with `EXCLUDE:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Artifact {
    Model,
    Controller { api: bool },
    Factory,
    Migration,
    Seeder,
    Resource,
    Collection,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model => f.write_str("model"),
            Self::Controller { api: true } => f.write_str("api controller"),
            Self::Controller { api: false } => f.write_str("controller"),
            Self::Factory => f.write_str("factory"),
            Self::Migration => f.write_str("migration"),
            Self::Seeder => f.write_str("seeder"),
            Self::Resource => f.write_str("resource"),
            Self::Collection => f.write_str("collection"),
        }
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Builder for [`TableDefinition`].
///
/// `build()` decides the [`TableKind`] and fills derived defaults (model
/// name). Columns added with [`column`](Self::column) replace an existing
/// column of the same name in place.
#[derive(Debug, Clone)]
pub struct TableDefinitionBuilder {
    name: String,
    table_type: TableType,
    model_name: Option<String>,
    record_count: u32,
    has_timestamps: bool,
    excludes: Vec<String>,
    columns: Vec<Column>,
    primary_columns: Vec<Column>,
    foreign_keys: Vec<ForeignKey>,
    relations: Vec<Relation>,
}

impl TableDefinitionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_type: TableType::Table,
            model_name: None,
            record_count: 0,
            has_timestamps: true,
            excludes: Vec::new(),
            columns: Vec::new(),
            primary_columns: Vec::new(),
            foreign_keys: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn table_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }

    pub fn model_name(mut self, model: impl Into<String>) -> Self {
        self.model_name = Some(model.into());
        self
    }

    pub fn record_count(mut self, count: u32) -> Self {
        self.record_count = count;
        self
    }

    pub fn timestamps(mut self, enabled: bool) -> Self {
        self.has_timestamps = enabled;
        self
    }

    pub fn exclude(mut self, token: impl Into<String>) -> Self {
        self.excludes.push(token.into().to_lowercase());
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        upsert(&mut self.columns, column);
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        for column in columns {
            upsert(&mut self.columns, column);
        }
        self
    }

    pub fn primary(mut self, column: Column) -> Self {
        upsert(&mut self.primary_columns, column);
        self
    }

    pub fn foreign_key(mut self, key: ForeignKey) -> Self {
        self.foreign_keys.push(key);
        self
    }

    pub fn relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn build(self) -> Result<TableDefinition, DomainError> {
        let kind = match self.table_type {
            TableType::Pivot => TableKind::for_pivot(self.primary_columns.len()).ok_or_else(
                || DomainError::InvalidPrimaryColumns {
                    table: self.name.clone(),
                    kind: "pivot",
                    count: self.primary_columns.len(),
                },
            )?,
            TableType::Table | TableType::Base => TableKind::Ordinary,
        };

        let mut excludes = Vec::with_capacity(self.excludes.len());
        let mut seen = BTreeSet::new();
        for token in self.excludes {
            if seen.insert(token.clone()) {
                excludes.push(token);
            }
        }

        Ok(TableDefinition {
            model_name: self
                .model_name
                .unwrap_or_else(|| naming::model_name(&self.name)),
            name: self.name,
            table_type: self.table_type,
            kind,
            record_count: self.record_count,
            has_timestamps: self.has_timestamps,
            excludes,
            columns: self.columns,
            primary_columns: self.primary_columns,
            foreign_keys: self.foreign_keys,
            relations: self.relations,
        })
    }
}

/// Replace the column with the same name in place, or append.
pub(crate) fn upsert(columns: &mut Vec<Column>, column: Column) {
    match columns.iter_mut().find(|c| c.name == column.name) {
        Some(existing) => *existing = column,
        None => columns.push(column),
    }
}
