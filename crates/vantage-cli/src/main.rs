//! Vantage CLI - Command-line interface for Vantage investigations.

use anyhow::Context;
use clap::Parser;
use std::fs;
use vantage_cli::{commands, init_logging, Cli, Command, Config, Formatter};
use vantage_engine::{Engine, ProviderRegistry};
use vantage_store::SqliteStore;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config.settings.log_level);

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);
    let engine = Engine::new(ProviderRegistry::builtin(&config.providers));

    match cli.command {
        Command::Providers => commands::execute_providers(&engine, &formatter)?,
        Command::Types => commands::execute_types(&engine, &formatter)?,
        Command::Investigate(args) => {
            if args.no_save {
                commands::execute_investigate::<SqliteStore>(args, &engine, None, &formatter)?;
            } else {
                let mut store = open_store(&config)?;
                commands::execute_investigate(args, &engine, Some(&mut store), &formatter)?;
            }
        }
        Command::History(args) => {
            commands::execute_history(args, &open_store(&config)?, &formatter)?;
        }
        Command::Show(args) => commands::execute_show(args, &open_store(&config)?, &formatter)?,
        Command::Export(args) => {
            commands::execute_export(args, &open_store(&config)?, &formatter)?
        }
        Command::Delete(args) => {
            commands::execute_delete(args, &mut open_store(&config)?, &formatter)?
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> anyhow::Result<SqliteStore> {
    let path = config.store_path()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tracing::debug!("Opening store at {}", path.display());
    SqliteStore::new(&path).with_context(|| format!("Failed to open store at {}", path.display()))
}
