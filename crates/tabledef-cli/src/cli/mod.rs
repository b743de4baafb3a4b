//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

use tabledef_core::domain::{CyclePolicy, TableType};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "tabledef",
    bin_name = "tabledef",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Dependency-ordered migrations and seeding from table definitions",
    long_about = "tabledef reads table definition files, orders them so every \
                  table comes after the tables its foreign keys reference, and \
                  plans migrations and seeding in that order.",
    after_help = "EXAMPLES:\n\
        \x20 tabledef order comments posts users\n\
        \x20 tabledef show posts --definition\n\
        \x20 tabledef plan --exclude password_resets\n\
        \x20 tabledef seed --records 50\n\
        \x20 tabledef completions bash > /usr/share/bash-completion/completions/tabledef",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print tables in dependency order.
    #[command(
        visible_alias = "o",
        about = "Print tables in dependency order",
        after_help = "EXAMPLES:\n\
            \x20 tabledef order                        # every table, then every pivot\n\
            \x20 tabledef order comments posts users\n\
            \x20 tabledef order --type pivot"
    )]
    Order(OrderArgs),

    /// Show one parsed definition.
    #[command(
        about = "Show a parsed table definition",
        after_help = "EXAMPLES:\n\
            \x20 tabledef show users\n\
            \x20 tabledef show role_user --type pivot\n\
            \x20 tabledef show timestamps --type base --definition"
    )]
    Show(ShowArgs),

    /// Plan migrations in dependency order.
    #[command(
        visible_alias = "migrate",
        about = "Plan migrations in dependency order",
        after_help = "EXAMPLES:\n\
            \x20 tabledef plan\n\
            \x20 tabledef plan users posts --output-format json"
    )]
    Plan(PlanArgs),

    /// Plan seeding in dependency order.
    #[command(
        about = "Plan seeding in dependency order",
        after_help = "EXAMPLES:\n\
            \x20 tabledef seed\n\
            \x20 tabledef seed users posts --records 100\n\
            \x20 tabledef seed --type pivot --pivot-records 10"
    )]
    Seed(SeedArgs),

    /// Initialise a tabledef configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 tabledef init           # default location\n\
            \x20 tabledef init --local   # .tabledef.toml in CWD\n\
            \x20 tabledef init --example # also write a sample definition"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 tabledef completions bash > ~/.local/share/bash-completion/completions/tabledef\n\
            \x20 tabledef completions zsh  > ~/.zfunc/_tabledef\n\
            \x20 tabledef completions fish > ~/.config/fish/completions/tabledef.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the tabledef configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 tabledef config get definitions.path\n\
            \x20 tabledef config set ordering.cycle_policy break\n\
            \x20 tabledef config list"
    )]
    Config(ConfigCommands),
}

// ── order ─────────────────────────────────────────────────────────────────────

/// Arguments for `tabledef order`.
#[derive(Debug, Args)]
pub struct OrderArgs {
    /// Tables to order; every listed definition when empty.
    #[arg(value_name = "TABLE", help = "Tables to order (default: all)")]
    pub tables: Vec<String>,

    /// Only look tables up as this type.
    #[arg(short = 't', long = "type", value_enum, help = "Definition type")]
    pub table_type: Option<TypeArg>,

    /// Tables to leave out.
    #[arg(
        short = 'e',
        long = "exclude",
        value_name = "TABLE",
        value_delimiter = ',',
        help = "Tables to leave out (comma separated)"
    )]
    pub exclude: Vec<String>,
}

// ── show ──────────────────────────────────────────────────────────────────────

/// Arguments for `tabledef show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Table name.
    #[arg(value_name = "TABLE")]
    pub name: String,

    /// Definition type; a table is tried before a pivot when omitted.
    #[arg(short = 't', long = "type", value_enum, help = "Definition type")]
    pub table_type: Option<TypeArg>,

    /// Print the normalized definition text instead of a summary.
    #[arg(long = "definition", help = "Print normalized definition text")]
    pub definition: bool,
}

// ── plan ──────────────────────────────────────────────────────────────────────

/// Arguments for `tabledef plan`.
#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Tables to plan; every table then every pivot when empty.
    #[arg(value_name = "TABLE", help = "Tables to plan (default: all)")]
    pub tables: Vec<String>,

    /// Tables to leave out.
    #[arg(
        short = 'e',
        long = "exclude",
        value_name = "TABLE",
        value_delimiter = ',',
        help = "Tables to leave out (comma separated)"
    )]
    pub exclude: Vec<String>,
}

// ── seed ──────────────────────────────────────────────────────────────────────

/// Arguments for `tabledef seed`.
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Tables to seed; every listed definition when empty.
    #[arg(value_name = "TABLE", help = "Tables to seed (default: all)")]
    pub tables: Vec<String>,

    /// Only seed this type.
    #[arg(short = 't', long = "type", value_enum, help = "Definition type")]
    pub table_type: Option<TypeArg>,

    /// Tables to leave out.
    #[arg(
        short = 'e',
        long = "exclude",
        value_name = "TABLE",
        value_delimiter = ',',
        help = "Tables to leave out (comma separated)"
    )]
    pub exclude: Vec<String>,

    /// Records per ordinary table (0 uses each definition's RECORDS).
    #[arg(
        short = 'r',
        long = "records",
        value_name = "N",
        help = "Records per table (overrides seeding.table_records)"
    )]
    pub records: Option<u32>,

    /// Records per pivot table.
    #[arg(
        long = "pivot-records",
        value_name = "N",
        help = "Records per pivot (overrides seeding.pivot_records)"
    )]
    pub pivot_records: Option<u32>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `tabledef init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.tabledef.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,

    /// Also write a sample `users` definition.
    #[arg(long = "example", help = "Write a sample users definition")]
    pub example: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `tabledef completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `tabledef config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `seeding.pivot_records`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Definition type as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum TypeArg {
    Table,
    Pivot,
    Base,
}

impl From<TypeArg> for TableType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Table => TableType::Table,
            TypeArg::Pivot => TableType::Pivot,
            TypeArg::Base => TableType::Base,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum CyclePolicyArg {
    Reject,
    Break,
}

impl From<CyclePolicyArg> for CyclePolicy {
    fn from(arg: CyclePolicyArg) -> Self {
        match arg {
            CyclePolicyArg::Reject => CyclePolicy::Reject,
            CyclePolicyArg::Break => CyclePolicy::Break,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_order_command() {
        let cli = Cli::parse_from(["tabledef", "order", "comments", "posts", "users"]);
        let Commands::Order(args) = cli.command else {
            panic!("expected Order command");
        };
        assert_eq!(args.tables, vec!["comments", "posts", "users"]);
        assert!(args.table_type.is_none());
    }

    #[test]
    fn excludes_are_comma_separated() {
        let cli = Cli::parse_from(["tabledef", "plan", "--exclude", "a,b", "-e", "c"]);
        let Commands::Plan(args) = cli.command else {
            panic!("expected Plan command");
        };
        assert_eq!(args.exclude, vec!["a", "b", "c"]);
    }

    #[test]
    fn seed_counts_and_type() {
        let cli = Cli::parse_from([
            "tabledef",
            "seed",
            "--type",
            "pivot",
            "--pivot-records",
            "5",
        ]);
        let Commands::Seed(args) = cli.command else {
            panic!("expected Seed command");
        };
        assert_eq!(args.table_type, Some(TypeArg::Pivot));
        assert_eq!(args.pivot_records, Some(5));
        assert_eq!(args.records, None);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "tabledef",
            "order",
            "--cycle-policy",
            "break",
            "--definitions",
            "defs",
        ]);
        assert_eq!(cli.global.cycle_policy, Some(CyclePolicyArg::Break));
        assert_eq!(cli.global.definitions.as_deref(), Some(std::path::Path::new("defs")));
    }

    #[test]
    fn migrate_is_an_alias_for_plan() {
        let cli = Cli::parse_from(["tabledef", "migrate", "users"]);
        assert!(matches!(cli.command, Commands::Plan(_)));
    }

    #[test]
    fn type_arg_maps_to_table_type() {
        assert_eq!(TableType::from(TypeArg::Base), TableType::Base);
        assert_eq!(CyclePolicy::from(CyclePolicyArg::Reject), CyclePolicy::Reject);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["tabledef", "--quiet", "--verbose", "order"]);
        assert!(result.is_err());
    }
}
