//! `tabledef init` creates a configuration file and the definitions layout.

use std::path::{Path, PathBuf};

use tracing::info;

use tabledef_adapters::FsDefinitionSource;
use tabledef_core::domain::TableType;

use crate::{
    cli::{GlobalArgs, InitArgs},
    commands::definitions_dir,
    config::{AppConfig, LOCAL_CONFIG_FILE},
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Written by `init --example`.
pub const EXAMPLE_USERS: &str = "\
/* Sample definition: one ordinary table with an auto-increment key. */
NAME: users
MODEL: User
RECORDS: 10
HAS_TIMESTAMPS: true
EXCLUDE: api
RELATIONS: hasMany('posts')
COLUMNS:
    id, null, false, null, id;
    name, name, true, name, string(120);
    email, email, true, safeEmail, string, unique;
    password, null, true, password, string;
";

pub fn execute(
    args: InitArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let config_path = init_target(&args, global.config.as_deref());

    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
    } else {
        write_config(&config_path, &config)?;
        output.success(&format!(
            "Configuration created at {}",
            config_path.display()
        ))?;
    }

    let dir = definitions_dir(&global, &config);
    let source = FsDefinitionSource::new(&dir);
    source.ensure_layout()?;
    output.success(&format!("Definitions directory ready at {}", dir.display()))?;

    if args.example {
        let path = source.definition_path(TableType::Table, "users");
        if path.exists() && !args.force {
            output.warning(&format!("{} already exists, left untouched", path.display()))?;
        } else {
            let path = source.write(TableType::Table, "users", EXAMPLE_USERS)?;
            output.success(&format!("Sample definition written to {}", path.display()))?;
        }
    }

    Ok(())
}

/// `--config`, else `.tabledef.toml` with `--local`, else the user config.
fn init_target(args: &InitArgs, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None if args.local => PathBuf::from(LOCAL_CONFIG_FILE),
        None => AppConfig::config_path(),
    }
}

/// The loaded configuration is written, so flags and environment
/// overrides given to `init` end up in the file.
fn write_config(path: &Path, config: &AppConfig) -> CliResult<()> {
    let text = toml::to_string_pretty(config)
        .with_cli_context(|| "Failed to serialise configuration")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(path, text)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))?;
    info!(path = %path.display(), "Configuration written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(local: bool) -> InitArgs {
        InitArgs {
            local,
            force: false,
            example: false,
        }
    }

    #[test]
    fn target_prefers_explicit_path() {
        let explicit = PathBuf::from("custom.toml");
        assert_eq!(init_target(&args(true), Some(&explicit)), explicit);
        assert_eq!(
            init_target(&args(true), None),
            PathBuf::from(LOCAL_CONFIG_FILE)
        );
        assert_eq!(init_target(&args(false), None), AppConfig::config_path());
    }

    #[test]
    fn written_config_loads_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.seeding.table_records = 4;

        write_config(&path, &config).unwrap();
        assert_eq!(AppConfig::load(Some(&path)).unwrap().seeding.table_records, 4);
    }
}
