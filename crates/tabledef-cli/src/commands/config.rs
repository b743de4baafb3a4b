//! `tabledef config` reads and writes configuration values.

use std::path::Path;

use tracing::info;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::{AppConfig, KNOWN_KEYS},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key).ok_or_else(|| unknown_key(&key))?;
            output.result(&value)?;
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::target_path(global.config.as_deref());
            set_value(&path, &key, &value)?;
            output.success(&format!("{key} = {value} ({})", path.display()))?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
            } else {
                for key in KNOWN_KEYS {
                    let value = config.get(key).unwrap_or_default();
                    output.result(&format!("{key} = {value}"))?;
                }
            }
        }

        ConfigCommands::Path => {
            let path = AppConfig::target_path(global.config.as_deref());
            output.result(&path.display().to_string())?;
        }
    }

    Ok(())
}

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!(
            "Unknown config key: '{key}' (known keys: {})",
            KNOWN_KEYS.join(", ")
        ),
        source: None,
    }
}

/// Update one key in the file at `path`, creating the file if needed.
///
/// Other keys and tables in the file are kept. The result must still load
/// as an [`AppConfig`] or nothing is written.
fn set_value(path: &Path, key: &str, raw: &str) -> CliResult<()> {
    if !KNOWN_KEYS.contains(&key) {
        return Err(unknown_key(key));
    }
    let Some((section, field)) = key.split_once('.') else {
        return Err(unknown_key(key));
    };

    let mut document: toml::Table = if path.exists() {
        let text = std::fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read config '{}'", path.display()))?;
        text.parse().map_err(|e: toml::de::Error| CliError::ConfigError {
            message: format!("Config '{}' is not valid TOML", path.display()),
            source: Some(Box::new(e)),
        })?
    } else {
        toml::Table::new()
    };

    let table = document
        .entry(section)
        .or_insert(toml::Value::Table(toml::Table::new()));
    let toml::Value::Table(table) = table else {
        return Err(CliError::ConfigError {
            message: format!("'{section}' in '{}' is not a table", path.display()),
            source: None,
        });
    };
    table.insert(field.to_string(), typed_value(key, raw)?);

    toml::Value::Table(document.clone())
        .try_into::<AppConfig>()
        .map_err(|e| CliError::ConfigError {
            message: format!("Invalid value '{raw}' for {key}"),
            source: Some(Box::new(e)),
        })?;

    let text = toml::to_string_pretty(&document)
        .with_cli_context(|| "Failed to serialise configuration")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(path, text)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))?;
    info!(key, path = %path.display(), "Configuration updated");
    Ok(())
}

fn typed_value(key: &str, raw: &str) -> CliResult<toml::Value> {
    let invalid = |expected: &str| CliError::ConfigError {
        message: format!("{key} expects {expected}, got '{raw}'"),
        source: None,
    };
    match key {
        "seeding.table_records" | "seeding.pivot_records" => raw
            .parse::<u32>()
            .map(|n| toml::Value::Integer(i64::from(n)))
            .map_err(|_| invalid("a non-negative number")),
        "output.no_color" => raw
            .parse::<bool>()
            .map(toml::Value::Boolean)
            .map_err(|_| invalid("true or false")),
        _ => Ok(toml::Value::String(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabledef_core::domain::CyclePolicy;
    use tempfile::TempDir;

    #[test]
    fn set_creates_file_and_keeps_other_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        set_value(&path, "seeding.table_records", "8").unwrap();
        set_value(&path, "ordering.cycle_policy", "break").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.seeding.table_records, 8);
        assert_eq!(cfg.ordering.cycle_policy, CyclePolicy::Break);
    }

    #[test]
    fn set_rejects_bad_values_without_writing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        assert!(set_value(&path, "ordering.cycle_policy", "sometimes").is_err());
        assert!(set_value(&path, "seeding.pivot_records", "-1").is_err());
        assert!(set_value(&path, "output.no_color", "maybe").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn set_rejects_unknown_key() {
        let temp = TempDir::new().unwrap();
        let err = set_value(&temp.path().join("c.toml"), "defaults.lang", "rust").unwrap_err();
        assert!(matches!(err, CliError::ConfigError { .. }));
        assert_eq!(err.exit_code(), 4);
    }
}
