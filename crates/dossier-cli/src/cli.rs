//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use dossier_domain::DocumentType;
use std::path::PathBuf;

/// Dossier CLI - Turn client notes into structured profiles.
#[derive(Debug, Parser)]
#[command(name = "dossier")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.dossier/config.toml)
    #[arg(short, long, global = true, env = "DOSSIER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (client name and confidence only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a client-notes document
    Parse(ParseArgs),

    /// Validate a profile stored as JSON
    Validate(ValidateArgs),

    /// Show or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the parse command.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// Text file to parse, or "-" for stdin
    pub file: String,

    /// Client category for validation (detected from content when omitted)
    #[arg(short = 't', long)]
    pub client_type: Option<String>,

    /// Give up after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Skip the fallback heuristics
    #[arg(long)]
    pub no_fallback: bool,
}

/// Arguments for the validate command.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// JSON file holding a client profile, or "-" for stdin
    pub file: String,

    /// Client category whose rules apply
    #[arg(short = 't', long)]
    pub client_type: Option<String>,

    /// Layout the profile was extracted from
    #[arg(short, long, value_enum, default_value = "structured")]
    pub document_type: DocumentTypeArg,
}

/// Arguments for config management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config management actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration as TOML
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Document type argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum DocumentTypeArg {
    /// Mostly labeled lines and headed sections
    Structured,
    /// Some labels, bullets or headers
    SemiStructured,
    /// Free prose
    Narrative,
    /// Short labeled brief
    Brief,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<DocumentTypeArg> for DocumentType {
    fn from(arg: DocumentTypeArg) -> Self {
        match arg {
            DocumentTypeArg::Structured => DocumentType::Structured,
            DocumentTypeArg::SemiStructured => DocumentType::SemiStructured,
            DocumentTypeArg::Narrative => DocumentType::Narrative,
            DocumentTypeArg::Brief => DocumentType::Brief,
        }
    }
}
