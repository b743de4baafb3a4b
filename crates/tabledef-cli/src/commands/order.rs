//! `tabledef order` prints tables in dependency order.

use tracing::{info, instrument};

use tabledef_core::{
    application::{OrderReport, OrderingService},
    domain::TableType,
};

use crate::{
    cli::{GlobalArgs, OrderArgs, OutputFormat},
    commands::{finish, ordering_service, skipped_json, without_excludes},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(requested = args.tables.len()))]
pub fn execute(
    args: OrderArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let table_type = args.table_type.map(TableType::from);
    if table_type == Some(TableType::Base) {
        return Err(CliError::InvalidInput {
            message: "base tables are only inherited and cannot be ordered".into(),
            source: None,
        });
    }

    let service = ordering_service(&global, &config)?;
    let report = if args.tables.is_empty() {
        order_everything(&service, table_type, &args.exclude)?
    } else {
        let names = without_excludes(&args.tables, &args.exclude);
        service.order_as(&names, table_type)?
    };
    info!(ordered = report.tables.len(), "Order computed");

    match output.format() {
        OutputFormat::Json => print_json(&report, &output)?,
        OutputFormat::Human => print_human(&report, &output)?,
        OutputFormat::Plain | OutputFormat::Auto => {
            for name in report.names() {
                output.result(name)?;
            }
        }
    }

    finish(&report, &output)
}

/// Every table, then every pivot (or one type only).
pub fn order_everything(
    service: &OrderingService,
    table_type: Option<TableType>,
    excludes: &[String],
) -> CliResult<OrderReport> {
    let types = match table_type {
        Some(table_type) => vec![table_type],
        None => vec![TableType::Table, TableType::Pivot],
    };
    let mut report = OrderReport::default();
    for table_type in types {
        report.merge(service.order_all(table_type, excludes)?);
    }
    Ok(report)
}

fn print_human(report: &OrderReport, output: &OutputManager) -> CliResult<()> {
    if report.tables.is_empty() {
        output.info("No tables to order")?;
        return Ok(());
    }
    output.header("Migration order:")?;
    let width = report.tables.len().to_string().len();
    for (i, table) in report.tables.iter().enumerate() {
        let mut line = format!("  {:>width$}. {}", i + 1, table.name);
        if table.is_pivot() {
            line.push_str(&format!(" ({})", table.kind));
        }
        let dependencies: Vec<&str> = table.dependencies().collect();
        if !dependencies.is_empty() {
            line.push_str(&format!("  <- {}", dependencies.join(", ")));
        }
        output.result(&line)?;
    }
    for dangling in &report.dangling {
        output.info(&format!(
            "{} references {}, which is not part of this order",
            dangling.table, dangling.references
        ))?;
    }
    Ok(())
}

fn print_json(report: &OrderReport, output: &OutputManager) -> CliResult<()> {
    let tables: Vec<serde_json::Value> = report
        .tables
        .iter()
        .map(|t| {
            serde_json::json!({
                "name": t.name,
                "kind": t.kind,
                "depends_on": t.dependencies().collect::<Vec<_>>(),
            })
        })
        .collect();
    let dangling: Vec<serde_json::Value> = report
        .dangling
        .iter()
        .map(|d| serde_json::json!({ "table": d.table, "references": d.references }))
        .collect();

    output.json(&serde_json::json!({
        "order": report.names(),
        "tables": tables,
        "skipped": skipped_json(report),
        "warnings": report.warnings,
        "broken_edges": report.broken_edges,
        "dangling": dangling,
    }))
}
