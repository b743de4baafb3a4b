//! `tabledef seed` plans seeding calls in dependency order.

use tracing::{info, instrument};

use tabledef_adapters::SeedPlanRecorder;
use tabledef_core::{
    application::{SeedRequest, SeedService},
    domain::TableType,
};

use crate::{
    cli::{GlobalArgs, OutputFormat, SeedArgs},
    commands::{finish, ordering_service, skipped_json},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(requested = args.tables.len()))]
pub fn execute(
    args: SeedArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let request = build_request(&args, &config)?;
    let service = SeedService::new(ordering_service(&global, &config)?);
    let recorder = SeedPlanRecorder::new();

    let report = service.seed(&request, &recorder)?;
    let plan = recorder.plan()?;
    info!(records = plan.total_records(), "Seed plan recorded");

    match output.format() {
        OutputFormat::Json => output.json(&serde_json::json!({
            "entries": plan.entries,
            "total_records": plan.total_records(),
            "skipped": skipped_json(&report.order),
            "warnings": report.order.warnings,
            "broken_edges": report.order.broken_edges,
        }))?,
        _ if plan.entries.is_empty() => output.info("Nothing to seed")?,
        _ => {
            output.result(plan.render().trim_end())?;
            output.success(&format!(
                "{} records across {} tables",
                plan.total_records(),
                plan.entries.len()
            ))?;
        }
    }

    finish(&report.order, &output)
}

/// Flags win over `seeding.*`; `0` keeps each definition's own count.
fn build_request(args: &SeedArgs, config: &AppConfig) -> CliResult<SeedRequest> {
    let table_type: Option<TableType> = args.table_type.map(Into::into);
    if table_type == Some(TableType::Base) {
        return Err(CliError::InvalidInput {
            message: "base tables are only inherited and cannot be seeded".into(),
            source: None,
        });
    }
    Ok(SeedRequest {
        tables: args.tables.clone(),
        table_type,
        excludes: args.exclude.clone(),
        table_records: args.records.unwrap_or(config.seeding.table_records),
        pivot_records: args.pivot_records.unwrap_or(config.seeding.pivot_records),
    })
}
