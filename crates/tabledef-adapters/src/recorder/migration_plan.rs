//! Schema builder that records a migration plan.

use std::{
    fmt::{self, Write as _},
    sync::{Arc, RwLock},
};

use serde::{Deserialize, Serialize};
use tracing::trace;

use tabledef_core::{
    application::{ApplicationError, ports::SchemaBuilder},
    domain::{Column, ForeignKey, TableDefinition, TableKind},
    error::{TabledefError, TabledefResult},
};

// ── Plan types ────────────────────────────────────────────────────────────────

/// Every table in creation order with the schema calls it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationPlan {
    pub tables: Vec<TablePlan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePlan {
    pub table: String,
    pub kind: TableKind,
    pub model: String,
    pub steps: Vec<PlanStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum PlanStep {
    ForeignKey {
        column: String,
        references: String,
        on: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        on_update: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        on_delete: Option<String>,
    },
    Column {
        name: String,
        definition: String,
    },
    PrimaryColumn {
        name: String,
        definition: String,
    },
    Timestamps,
    PrimaryKey {
        columns: Vec<String>,
    },
}

impl MigrationPlan {
    pub fn table(&self, name: &str) -> Option<&TablePlan> {
        self.tables.iter().find(|t| t.table == name)
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.table.as_str()).collect()
    }

    pub fn to_json(&self) -> TabledefResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TabledefError::Internal {
            message: format!("failed to serialize migration plan: {e}"),
        })
    }

    /// Render as schema-builder migration code.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, table) in self.tables.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&table.to_string());
        }
        out
    }
}

impl fmt::Display for TablePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "// {} ({}, model {})", self.table, self.kind, self.model)?;
        writeln!(
            f,
            "Schema::create('{}', function (Blueprint $table) {{",
            self.table
        )?;
        for step in &self.steps {
            writeln!(f, "    {step}")?;
        }
        writeln!(f, "}});")
    }
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignKey {
                column,
                references,
                on,
                on_update,
                on_delete,
            } => {
                write!(
                    f,
                    "$table->foreign('{column}')->references('{references}')->on('{on}')"
                )?;
                if let Some(action) = on_update {
                    write!(f, "->onUpdate('{action}')")?;
                }
                if let Some(action) = on_delete {
                    write!(f, "->onDelete('{action}')")?;
                }
                f.write_str(";")
            }
            Self::Column { definition, .. } | Self::PrimaryColumn { definition, .. } => {
                write!(f, "$table->{definition};")
            }
            Self::Timestamps => f.write_str("$table->timestamps();"),
            Self::PrimaryKey { columns } => {
                let quoted: Vec<String> = columns.iter().map(|c| format!("'{c}'")).collect();
                write!(f, "$table->primary([{}]);", quoted.join(", "))
            }
        }
    }
}

/// `type('name', ...)->property()->property()`.
fn column_definition(column: &Column) -> String {
    let mut definition = column.column_type.to_string();
    for property in &column.properties {
        let _ = write!(definition, "->{property}");
    }
    definition
}

// ── Recorder ──────────────────────────────────────────────────────────────────

/// Thread-safe [`SchemaBuilder`] collecting a [`MigrationPlan`].
#[derive(Debug, Clone, Default)]
pub struct MigrationPlanRecorder {
    inner: Arc<RwLock<MigrationPlan>>,
}

impl MigrationPlanRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn plan(&self) -> TabledefResult<MigrationPlan> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.clone())
    }

    fn push_step(&self, table: &str, step: PlanStep) -> TabledefResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let Some(plan) = inner.tables.iter_mut().rev().find(|t| t.table == table) else {
            return Err(ApplicationError::SchemaBuilderFailed {
                table: table.to_string(),
                reason: "table was not created before use".into(),
            }
            .into());
        };
        trace!(table, step = %step, "Recorded step");
        plan.steps.push(step);
        Ok(())
    }
}

impl SchemaBuilder for MigrationPlanRecorder {
    fn create_table(&self, table: &TableDefinition) -> TabledefResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.tables.push(TablePlan {
            table: table.name.clone(),
            kind: table.kind,
            model: table.model_name.clone(),
            steps: Vec::new(),
        });
        Ok(())
    }

    fn add_foreign_key(&self, table: &str, key: &ForeignKey) -> TabledefResult<()> {
        self.push_step(
            table,
            PlanStep::ForeignKey {
                column: key.foreign.clone(),
                references: key.references.clone(),
                on: key.on.clone(),
                on_update: key.on_update.clone(),
                on_delete: key.on_delete.clone(),
            },
        )
    }

    fn add_column(&self, table: &str, column: &Column) -> TabledefResult<()> {
        self.push_step(
            table,
            PlanStep::Column {
                name: column.name.clone(),
                definition: column_definition(column),
            },
        )
    }

    fn add_primary_column(&self, table: &str, column: &Column) -> TabledefResult<()> {
        self.push_step(
            table,
            PlanStep::PrimaryColumn {
                name: column.name.clone(),
                definition: column_definition(column),
            },
        )
    }

    fn add_timestamps(&self, table: &str) -> TabledefResult<()> {
        self.push_step(table, PlanStep::Timestamps)
    }

    fn set_primary_key(&self, table: &str, columns: &[String]) -> TabledefResult<()> {
        self.push_step(
            table,
            PlanStep::PrimaryKey {
                columns: columns.to_vec(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabledef_core::{
        application::define_table,
        domain::{MethodCall, TableType},
    };

    fn users() -> TableDefinition {
        TableDefinition::builder("users")
            .column(Column::new("id", "id"))
            .column(Column::new("email", "string").with_property(MethodCall::bare("unique")))
            .build()
            .unwrap()
    }

    fn role_user() -> TableDefinition {
        TableDefinition::builder("role_user")
            .table_type(TableType::Pivot)
            .timestamps(false)
            .foreign_key(ForeignKey::new("role_id", "id", "roles").on_delete("cascade"))
            .primary(Column::new("role_id", "foreignId"))
            .primary(Column::new("user_id", "foreignId"))
            .build()
            .unwrap()
    }

    #[test]
    fn records_steps_in_call_order() {
        let recorder = MigrationPlanRecorder::new();
        define_table(&role_user(), &recorder).unwrap();

        let plan = recorder.plan().unwrap();
        let table = plan.table("role_user").unwrap();
        assert_eq!(table.kind, TableKind::Pivot);
        assert!(matches!(table.steps[0], PlanStep::ForeignKey { .. }));
        assert_eq!(
            table.steps.last(),
            Some(&PlanStep::PrimaryKey {
                columns: vec!["role_id".into(), "user_id".into()]
            })
        );
    }

    #[test]
    fn renders_blueprint_calls() {
        let recorder = MigrationPlanRecorder::new();
        define_table(&users(), &recorder).unwrap();
        define_table(&role_user(), &recorder).unwrap();

        let text = recorder.plan().unwrap().render();
        assert!(text.contains("Schema::create('users', function (Blueprint $table) {"));
        assert!(text.contains("$table->string('email')->unique();"));
        assert!(text.contains("$table->timestamps();"));
        assert!(text.contains(
            "$table->foreign('role_id')->references('id')->on('roles')->onDelete('cascade');"
        ));
        assert!(text.contains("$table->primary(['role_id', 'user_id']);"));
    }

    #[test]
    fn json_steps_are_tagged() {
        let recorder = MigrationPlanRecorder::new();
        define_table(&users(), &recorder).unwrap();

        let json = serde_json::to_value(recorder.plan().unwrap()).unwrap();
        assert_eq!(json["tables"][0]["steps"][0]["step"], "column");
        assert_eq!(json["tables"][0]["steps"][2]["step"], "timestamps");

        let back: MigrationPlan = serde_json::from_value(json).unwrap();
        assert_eq!(back.table_names(), vec!["users"]);
    }

    #[test]
    fn steps_for_unknown_table_fail() {
        let recorder = MigrationPlanRecorder::new();
        let err = recorder.add_timestamps("ghost").unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
