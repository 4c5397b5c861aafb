//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vantage CLI - Run open-source intelligence investigations.
#[derive(Debug, Parser)]
#[command(name = "vantage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "VANTAGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Investigate an email, username, phone number, domain or IP address
    Investigate(InvestigateArgs),

    /// List loaded providers
    Providers,

    /// List entity types that can be investigated
    Types,

    /// List saved investigations, newest first
    History(HistoryArgs),

    /// Show a saved investigation
    Show(ShowArgs),

    /// Export a saved investigation as a JSON report
    Export(ExportArgs),

    /// Delete a saved investigation
    Delete(DeleteArgs),
}

/// Arguments for the investigate command.
#[derive(Debug, Parser)]
pub struct InvestigateArgs {
    /// Value to investigate
    pub query: String,

    /// Entity type (e.g. email, phone); detected when omitted
    #[arg(short = 't', long = "type")]
    pub entity_type: Option<String>,

    /// Only run these providers (repeatable)
    #[arg(short, long = "provider")]
    pub providers: Vec<String>,

    /// Do not save the investigation
    #[arg(long)]
    pub no_save: bool,
}

/// Arguments for the history command.
#[derive(Debug, Parser)]
pub struct HistoryArgs {
    /// Maximum number of investigations
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Investigation ID
    pub id: String,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Investigation ID
    pub id: String,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the delete command.
#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// Investigation ID
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
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
