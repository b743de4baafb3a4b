//! Command handlers.
//!
//! Each handler translates CLI arguments into calls on the core services,
//! and displays the results. No ordering or parsing logic lives here.

pub mod completions;
pub mod config;
pub mod init;
pub mod order;
pub mod plan;
pub mod seed;
pub mod show;

use std::path::PathBuf;

use tracing::debug;

use tabledef_adapters::FsDefinitionSource;
use tabledef_core::{
    application::{OrderReport, OrderingService},
    domain::CyclePolicy,
};

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Definitions directory: `--definitions`, else `definitions.path`.
pub fn definitions_dir(global: &GlobalArgs, config: &AppConfig) -> PathBuf {
    global
        .definitions
        .clone()
        .unwrap_or_else(|| config.definitions.path.clone())
}

/// Build an ordering service over the definitions directory.
///
/// Fails with [`CliError::DefinitionsNotFound`] when the directory is
/// missing, so a typo in the path is not reported table by table.
pub fn ordering_service(global: &GlobalArgs, config: &AppConfig) -> CliResult<OrderingService> {
    let dir = definitions_dir(global, config);
    if !dir.is_dir() {
        return Err(CliError::DefinitionsNotFound { path: dir });
    }
    let policy: CyclePolicy = global
        .cycle_policy
        .map_or(config.ordering.cycle_policy, Into::into);
    debug!(dir = %dir.display(), %policy, "Using definitions directory");

    Ok(OrderingService::new(Box::new(FsDefinitionSource::new(dir))).with_cycle_policy(policy))
}

/// Requested names minus excludes.
pub fn without_excludes(tables: &[String], excludes: &[String]) -> Vec<String> {
    tables
        .iter()
        .filter(|name| !excludes.contains(name))
        .cloned()
        .collect()
}

/// Report what the batch left out, after its results were printed.
///
/// Parse warnings and broken cycle edges are shown as warnings; skipped
/// tables turn into [`CliError::TablesSkipped`].
pub fn finish(report: &OrderReport, output: &OutputManager) -> CliResult<()> {
    if !output.is_json() {
        for warning in &report.warnings {
            output.warning(&warning.to_string())?;
        }
        for edge in &report.broken_edges {
            output.warning(&format!(
                "foreign key {} -> {} dropped to break a cycle",
                edge.from, edge.to
            ))?;
        }
        for skipped in &report.skipped {
            output.warning(&format!("{}: {}", skipped.name, skipped.error))?;
        }
    }

    if report.skipped.is_empty() {
        return Ok(());
    }
    Err(CliError::TablesSkipped {
        tables: report.skipped.iter().map(|s| s.name.clone()).collect(),
    })
}

/// `{ name, error }` list for JSON output.
pub fn skipped_json(report: &OrderReport) -> Vec<serde_json::Value> {
    report
        .skipped
        .iter()
        .map(|s| serde_json::json!({ "name": s.name, "error": s.error.to_string() }))
        .collect()
}
