//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Args, Parser, Subcommand, ValueEnum};
use intake_schemas::ConfigOverrides;
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Intake CLI - validate and normalize records against data set definitions
///
/// Loads a data set definition (a schema plus validator overrides) and runs
/// JSON or YAML data through it, printing the normalized records or the
/// per-field errors.
#[derive(Parser, Debug)]
#[command(
    name = "intake",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "INTAKE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: from configuration, else human]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a data file against a data set definition
    Validate(ValidateArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the data file (JSON or YAML)
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Path to the data set definition or bare schema (JSON or YAML)
    #[arg(short, long, value_name = "DEFINITION")]
    pub schema: PathBuf,

    /// How the data file is read
    #[arg(short, long, value_enum, default_value = "object")]
    pub mode: ValidationMode,

    /// Escape markup in string values of the accepted records
    #[arg(long)]
    pub sanitise: bool,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Validator switches that take precedence over the definition file.
///
/// Each flag is tri-state: absent leaves the definition alone, a bare flag
/// means `true`, and `--flag=false` switches it off.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideArgs {
    /// Keep fields the schema does not declare
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub allow_unknown: Option<bool>,

    /// Accept null values without checking them
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub ignore_none_values: Option<bool>,

    /// Drop read-only fields instead of rejecting them
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub purge_readonly: Option<bool>,

    /// Drop undeclared fields
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub purge_unknown: Option<bool>,

    /// Require every field without its own `required` flag
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub require_all: Option<bool>,
}

impl OverrideArgs {
    pub fn to_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            allow_unknown: self.allow_unknown,
            ignore_none_values: self.ignore_none_values,
            purge_readonly: self.purge_readonly,
            purge_unknown: self.purge_unknown,
            require_all: self.require_all,
        }
    }
}

/// Shape of the data file
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ValidationMode {
    /// A single record
    Object,
    /// A list of records
    Objects,
    /// An envelope; only the first item of `data` is validated
    One,
    /// An envelope; every item of `data` is validated
    Many,
}

impl ValidationMode {
    pub fn name(self) -> &'static str {
        match self {
            ValidationMode::Object => "object",
            ValidationMode::Objects => "objects",
            ValidationMode::One => "one",
            ValidationMode::Many => "many",
        }
    }
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a configuration file with default values
    Init(ConfigInitArgs),

    /// Show the configuration in effect
    Show(ConfigShowArgs),
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file
    #[arg(value_name = "PATH", default_value = ".intake.yaml")]
    pub path: PathBuf,

    /// Force overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable formatted output
    #[default]
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
