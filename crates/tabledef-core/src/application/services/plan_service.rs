//! Migration planning: apply ordered definitions to a [`SchemaBuilder`].

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ports::SchemaBuilder,
        services::ordering_service::{OrderReport, OrderingService},
    },
    domain::{TableDefinition, TableType},
    error::TabledefResult,
};

/// Apply one definition to a schema builder.
///
/// Call order: create, foreign keys, columns, timestamps (when enabled),
/// then the primary columns and a composite primary key over them. Ordinary
/// tables without explicit primaries get their key from their
/// auto-increment column and skip the last step.
pub fn define_table(table: &TableDefinition, builder: &dyn SchemaBuilder) -> TabledefResult<()> {
    builder.create_table(table)?;
    for key in &table.foreign_keys {
        builder.add_foreign_key(&table.name, key)?;
    }
    for column in &table.columns {
        builder.add_column(&table.name, column)?;
    }
    if table.has_timestamps {
        builder.add_timestamps(&table.name)?;
    }
    if !table.primary_columns.is_empty() {
        for column in &table.primary_columns {
            builder.add_primary_column(&table.name, column)?;
        }
        let names: Vec<String> = table.primary_columns.iter().map(|c| c.name.clone()).collect();
        builder.set_primary_key(&table.name, &names)?;
    }
    debug!(table = %table.name, kind = %table.kind, "Table defined");
    Ok(())
}

pub struct PlanService {
    ordering: OrderingService,
}

impl PlanService {
    pub fn new(ordering: OrderingService) -> Self {
        Self { ordering }
    }

    /// Order the named tables and apply each to `builder`.
    #[instrument(skip_all, fields(requested = names.len()))]
    pub fn plan<S: AsRef<str>>(
        &self,
        names: &[S],
        builder: &dyn SchemaBuilder,
    ) -> TabledefResult<OrderReport> {
        let report = self.ordering.order(names)?;
        self.apply(&report, builder)?;
        Ok(report)
    }

    /// Plan every table, then every pivot.
    #[instrument(skip_all)]
    pub fn plan_all(&self, excludes: &[String], builder: &dyn SchemaBuilder) -> TabledefResult<OrderReport> {
        let mut report = OrderReport::default();
        for table_type in [TableType::Table, TableType::Pivot] {
            let part = self.ordering.order_all(table_type, excludes)?;
            self.apply(&part, builder)?;
            report.merge(part);
        }
        Ok(report)
    }

    fn apply(&self, report: &OrderReport, builder: &dyn SchemaBuilder) -> TabledefResult<()> {
        for table in &report.tables {
            define_table(table, builder)?;
        }
        info!(tables = report.tables.len(), "Migration plan applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use mockall::Sequence;

    use super::*;
    use crate::application::ports::{MockDefinitionSource, MockSchemaBuilder};
    use crate::domain::{Column, ForeignKey};

    fn pivot() -> TableDefinition {
        TableDefinition::builder("role_user")
            .table_type(TableType::Pivot)
            .timestamps(false)
            .foreign_key(ForeignKey::new("role_id", "id", "roles"))
            .primary(Column::new("role_id", "foreignId"))
            .primary(Column::new("user_id", "foreignId"))
            .build()
            .unwrap()
    }

    #[test]
    fn pivot_gets_primary_columns_then_composite_key() {
        let mut builder = MockSchemaBuilder::new();
        let mut seq = Sequence::new();
        builder
            .expect_create_table()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        builder
            .expect_add_foreign_key()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        builder
            .expect_add_primary_column()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        builder
            .expect_set_primary_key()
            .withf(|table, columns| {
                table == "role_user" && columns == ["role_id".to_string(), "user_id".to_string()]
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        builder.expect_add_timestamps().never();
        builder.expect_add_column().never();

        define_table(&pivot(), &builder).unwrap();
    }

    #[test]
    fn ordinary_table_gets_columns_and_timestamps() {
        let table = TableDefinition::builder("users")
            .column(Column::new("id", "id"))
            .column(Column::new("email", "string"))
            .build()
            .unwrap();

        let mut builder = MockSchemaBuilder::new();
        builder.expect_create_table().times(1).returning(|_| Ok(()));
        builder.expect_add_column().times(2).returning(|_, _| Ok(()));
        builder.expect_add_timestamps().times(1).returning(|_| Ok(()));
        builder.expect_set_primary_key().never();

        define_table(&table, &builder).unwrap();
    }

    #[test]
    fn plan_applies_tables_in_dependency_order() {
        let mut source = MockDefinitionSource::new();
        source.expect_read().returning(|_, name| {
            Ok(match name {
                "users" => Some("COLUMNS: id,null,false,null,id;".to_string()),
                "posts" => Some(
                    "FOREIGN_KEYS: ('user_id','id','users') COLUMNS: id,null,false,null,id;".to_string(),
                ),
                _ => None,
            })
        });

        let created = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&created);
        let mut builder = MockSchemaBuilder::new();
        builder.expect_create_table().returning(move |table| {
            sink.lock().unwrap().push(table.name.clone());
            Ok(())
        });
        builder.expect_add_foreign_key().returning(|_, _| Ok(()));
        builder.expect_add_column().returning(|_, _| Ok(()));
        builder.expect_add_timestamps().returning(|_| Ok(()));

        let service = PlanService::new(OrderingService::new(Box::new(source)));
        let report = service.plan(&["posts", "users"], &builder).unwrap();

        assert_eq!(report.names(), vec!["users", "posts"]);
        assert_eq!(*created.lock().unwrap(), vec!["users", "posts"]);
    }
}
