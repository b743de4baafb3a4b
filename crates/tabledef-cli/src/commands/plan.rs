//! `tabledef plan` renders the migration calls for tables in dependency order.

use tracing::{info, instrument};

use tabledef_adapters::MigrationPlanRecorder;
use tabledef_core::application::PlanService;

use crate::{
    cli::{GlobalArgs, OutputFormat, PlanArgs},
    commands::{finish, ordering_service, skipped_json, without_excludes},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(requested = args.tables.len()))]
pub fn execute(
    args: PlanArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = PlanService::new(ordering_service(&global, &config)?);
    let recorder = MigrationPlanRecorder::new();

    let report = if args.tables.is_empty() {
        service.plan_all(&args.exclude, &recorder)?
    } else {
        service.plan(&without_excludes(&args.tables, &args.exclude), &recorder)?
    };
    let plan = recorder.plan()?;
    info!(tables = plan.tables.len(), "Migration plan recorded");

    match output.format() {
        OutputFormat::Json => output.json(&serde_json::json!({
            "tables": plan.tables,
            "skipped": skipped_json(&report),
            "warnings": report.warnings,
            "broken_edges": report.broken_edges,
        }))?,
        _ if plan.tables.is_empty() => output.info("Nothing to plan")?,
        _ => output.result(plan.render().trim_end())?,
    }

    finish(&report, &output)
}
