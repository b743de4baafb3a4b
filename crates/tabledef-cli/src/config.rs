//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `TABLEDEF_SEEDING__PIVOT_RECORDS=10`
//! 3. Config file (`--config`, else `.tabledef.toml` in the working
//!    directory, else the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use tabledef_core::{application::services::DEFAULT_PIVOT_RECORDS, domain::CyclePolicy};

/// File name used by `init --local`.
pub const LOCAL_CONFIG_FILE: &str = ".tabledef.toml";

/// Every key `config get` and `config set` accept.
pub const KNOWN_KEYS: &[&str] = &[
    "definitions.path",
    "ordering.cycle_policy",
    "seeding.table_records",
    "seeding.pivot_records",
    "output.no_color",
    "output.format",
];

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub definitions: DefinitionsConfig,
    pub ordering: OrderingConfig,
    pub seeding: SeedingConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefinitionsConfig {
    /// Directory holding `tables/` and `pivots/`.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingConfig {
    pub cycle_policy: CyclePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedingConfig {
    /// `0` uses each definition's `RECORDS:`.
    pub table_records: u32,
    pub pivot_records: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for DefinitionsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("definitions"),
        }
    }
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            table_records: 0,
            pivot_records: DEFAULT_PIVOT_RECORDS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the file, then the environment.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::target_path(None), false),
        };
        debug!(path = %path.display(), required, "Loading configuration");

        let defaults = Self::default();
        let settings = Config::builder()
            .set_default(
                "definitions.path",
                defaults.definitions.path.to_string_lossy().into_owned(),
            )?
            .set_default("ordering.cycle_policy", defaults.ordering.cycle_policy.to_string())?
            .set_default("seeding.table_records", i64::from(defaults.seeding.table_records))?
            .set_default("seeding.pivot_records", i64::from(defaults.seeding.pivot_records))?
            .set_default("output.no_color", defaults.output.no_color)?
            .set_default("output.format", defaults.output.format)?
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix("TABLEDEF")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("reading configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.tabledef.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "tabledef", "tabledef")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The file in effect: `explicit`, else a local `.tabledef.toml` when
    /// one exists, else [`Self::config_path`].
    pub fn target_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() { local } else { Self::config_path() }
    }

    /// Value of one dotted key as it would appear in the file.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "definitions.path" => self.definitions.path.display().to_string(),
            "ordering.cycle_policy" => self.ordering.cycle_policy.to_string(),
            "seeding.table_records" => self.seeding.table_records.to_string(),
            "seeding.pivot_records" => self.seeding.pivot_records.to_string(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.definitions.path, PathBuf::from("definitions"));
        assert_eq!(cfg.ordering.cycle_policy, CyclePolicy::Reject);
        assert_eq!(cfg.seeding.pivot_records, 30);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn file_values_override_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[ordering]\ncycle_policy = \"break\"\n\n[seeding]\ntable_records = 12\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.ordering.cycle_policy, CyclePolicy::Break);
        assert_eq!(cfg.seeding.table_records, 12);
        assert_eq!(cfg.seeding.pivot_records, 30);
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[ordering]\ncycle_policy = \"sometimes\"\n").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn get_known_and_unknown_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("seeding.pivot_records").as_deref(), Some("30"));
        assert_eq!(cfg.get("ordering.cycle_policy").as_deref(), Some("reject"));
        assert_eq!(cfg.get("does.not.exist"), None);
        for key in KNOWN_KEYS {
            assert!(cfg.get(key).is_some(), "{key}");
        }
    }

    #[test]
    fn round_trips_through_toml() {
        let cfg = AppConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
