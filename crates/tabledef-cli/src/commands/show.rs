//! `tabledef show` prints one parsed definition.
//!
//! Unlike the batch commands this fails on the first error, so a base
//! table or a missing definition is reported directly.

use tracing::instrument;

use tabledef_core::{
    application::TableParser,
    domain::{Column, MethodCall, TableDefinition, TableType},
};

use crate::{
    cli::{GlobalArgs, OutputFormat, ShowArgs},
    commands::ordering_service,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

const LABEL_WIDTH: usize = 10;

#[instrument(skip_all, fields(table = %args.name))]
pub fn execute(
    args: ShowArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = ordering_service(&global, &config)?;
    let table = match args.table_type {
        Some(table_type) => service.describe(table_type.into(), &args.name)?,
        None => {
            let mut parser = TableParser::new(service.source());
            let table = parser.parse_any(&args.name)?;
            for warning in parser.warnings() {
                output.warning(&warning.to_string())?;
            }
            table
        }
    };

    if args.definition {
        output.result(table.to_definition_text().trim_end())?;
        return Ok(());
    }

    match output.format() {
        OutputFormat::Json => output.json(&serde_json::json!({
            "definition": table,
            "artifacts": table.artifacts(),
        })),
        _ => print_summary(&table, &output),
    }
}

fn print_summary(table: &TableDefinition, output: &OutputManager) -> CliResult<()> {
    output.header(&table.to_string())?;
    let type_label = if table.table_type == TableType::Base {
        "base (inherit with [*name,base*])".to_string()
    } else {
        table.table_type.to_string()
    };
    output.field("type", &type_label, LABEL_WIDTH)?;
    output.field("model", &table.model_name, LABEL_WIDTH)?;
    output.field("records", &table.record_count.to_string(), LABEL_WIDTH)?;
    output.field("timestamps", &table.has_timestamps.to_string(), LABEL_WIDTH)?;

    let artifacts: Vec<String> = table.artifacts().iter().map(ToString::to_string).collect();
    output.field("artifacts", &artifacts.join(", "), LABEL_WIDTH)?;
    let fillable = table.fillable();
    if !fillable.is_empty() {
        output.field("fillable", &fillable.join(", "), LABEL_WIDTH)?;
    }

    output.result("")?;
    output.result("columns:")?;
    for column in &table.primary_columns {
        output.result(&format!("  * {}", column_line(column)))?;
    }
    let keys: Vec<&str> = table
        .primary_key_columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    for column in &table.columns {
        let marker = if table.primary_columns.is_empty() && keys.contains(&column.name.as_str()) {
            "*"
        } else {
            " "
        };
        output.result(&format!("  {marker} {}", column_line(column)))?;
    }

    if !table.foreign_keys.is_empty() {
        output.result("")?;
        output.result("foreign keys:")?;
        for key in &table.foreign_keys {
            let mut line = format!("    {} -> {}.{}", key.foreign, key.on, key.references);
            if let Some(action) = &key.on_update {
                line.push_str(&format!(" on update {action}"));
            }
            if let Some(action) = &key.on_delete {
                line.push_str(&format!(" on delete {action}"));
            }
            output.result(&line)?;
        }
    }

    if !table.relations.is_empty() {
        output.result("")?;
        output.result("relations:")?;
        for relation in &table.relations {
            let call = MethodCall::new(relation.kind.as_str(), relation.params.clone());
            output.result(&format!("    {call}"))?;
        }
    }
    Ok(())
}

/// `name  type(args)->prop()  [faker]`
fn column_line(column: &Column) -> String {
    let mut line = format!("{}  {}", column.name, column.column_type.render_from(1));
    for property in &column.properties {
        line.push_str(&format!("->{property}"));
    }
    if let Some(faker) = &column.faker {
        line.push_str(&format!("  [{faker}]"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabledef_core::domain::Param;

    #[test]
    fn column_line_hides_the_implicit_name() {
        let column = Column {
            column_type: MethodCall::new(
                "string",
                vec![Param::Str("title".into()), Param::Int(120)],
            ),
            ..Column::new("title", "string")
        }
        .with_property(MethodCall::bare("nullable"))
        .with_faker(MethodCall::bare("sentence"));

        assert_eq!(
            column_line(&column),
            "title  string(120)->nullable()  [sentence()]"
        );
    }
}
