//! Seeder that records what would be generated for each table.

use std::{
    fmt,
    sync::{Arc, RwLock},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use tabledef_core::{
    application::{ApplicationError, ports::Seeder},
    domain::TableDefinition,
    error::{TabledefError, TabledefResult},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPlan {
    pub entries: Vec<SeedEntry>,
}

/// One seeding call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedEntry {
    pub table: String,
    pub model: String,
    pub count: u32,
    pub fields: Vec<SeedField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedField {
    pub column: String,
    #[serde(flatten)]
    pub source: FieldSource,
}

/// Where a seeded value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum FieldSource {
    /// A value generator call, e.g. `safeEmail()`.
    Faker { call: String },
    /// A key sampled from rows already seeded in another table.
    Reference { table: String, column: String },
}

impl SeedEntry {
    fn from_definition(table: &TableDefinition, count: u32) -> Self {
        let mut fields: Vec<SeedField> = table
            .foreign_keys
            .iter()
            .map(|key| SeedField {
                column: key.foreign.clone(),
                source: FieldSource::Reference {
                    table: key.on.clone(),
                    column: key.references.clone(),
                },
            })
            .collect();

        for column in table.primary_columns.iter().chain(&table.columns) {
            if fields.iter().any(|f| f.column == column.name) {
                continue;
            }
            if let Some(faker) = &column.faker {
                fields.push(SeedField {
                    column: column.name.clone(),
                    source: FieldSource::Faker {
                        call: faker.to_string(),
                    },
                });
            }
        }

        Self {
            table: table.name.clone(),
            model: table.model_name.clone(),
            count,
            fields,
        }
    }
}

impl SeedPlan {
    pub fn entry(&self, table: &str) -> Option<&SeedEntry> {
        self.entries.iter().find(|e| e.table == table)
    }

    pub fn total_records(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.count)).sum()
    }

    pub fn to_json(&self) -> TabledefResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TabledefError::Internal {
            message: format!("failed to serialize seed plan: {e}"),
        })
    }

    pub fn render(&self) -> String {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for SeedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} x{} ({})", self.table, self.count, self.model)?;
        for field in &self.fields {
            match &field.source {
                FieldSource::Faker { call } => writeln!(f, "    {} <- {call}", field.column)?,
                FieldSource::Reference { table, column } => {
                    writeln!(f, "    {} <- {table}.{column}", field.column)?;
                }
            }
        }
        Ok(())
    }
}

/// Thread-safe [`Seeder`] collecting a [`SeedPlan`].
#[derive(Debug, Clone, Default)]
pub struct SeedPlanRecorder {
    inner: Arc<RwLock<SeedPlan>>,
}

impl SeedPlanRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&self) -> TabledefResult<SeedPlan> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.clone())
    }
}

impl Seeder for SeedPlanRecorder {
    fn seed(&self, table: &TableDefinition, count: u32) -> TabledefResult<()> {
        let entry = SeedEntry::from_definition(table, count);
        debug!(table = %entry.table, count, fields = entry.fields.len(), "Recorded seed");
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.entries.push(entry);
        Ok(())
    }
}
