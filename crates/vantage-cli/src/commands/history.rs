//! Saved investigation commands: history, show, export, delete.

use super::parse_id;
use crate::cli::{DeleteArgs, ExportArgs, HistoryArgs, ShowArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::fs;
use std::io::{self, Write};
use vantage_domain::{InvestigationListing, InvestigationStore};

/// Execute the history command.
pub fn execute_history<S>(
    args: HistoryArgs,
    store: &S,
    formatter: &Formatter,
) -> Result<Vec<InvestigationListing>>
where
    S: InvestigationStore,
    CliError: From<S::Error>,
{
    let listings = store.list(args.limit)?;
    println!("{}", formatter.format_history(&listings)?);
    Ok(listings)
}

/// Execute the show command.
pub fn execute_show<S>(args: ShowArgs, store: &S, formatter: &Formatter) -> Result<()>
where
    S: InvestigationStore,
    CliError: From<S::Error>,
{
    let investigation = store.load(parse_id(&args.id)?)?;
    println!("{}", formatter.format_investigation(&investigation)?);
    Ok(())
}

/// Execute the export command.
pub fn execute_export<S>(args: ExportArgs, store: &S, formatter: &Formatter) -> Result<()>
where
    S: InvestigationStore,
    CliError: From<S::Error>,
{
    let investigation = store.load(parse_id(&args.id)?)?;
    let report = formatter.format_report(&investigation)?;

    match args.output {
        Some(path) => {
            fs::write(&path, report)?;
            println!(
                "{}",
                formatter.success(&format!("Exported to {}", path.display()))
            );
        }
        None => println!("{}", report),
    }

    Ok(())
}

/// Execute the delete command.
pub fn execute_delete<S>(args: DeleteArgs, store: &mut S, formatter: &Formatter) -> Result<()>
where
    S: InvestigationStore,
    CliError: From<S::Error>,
{
    let id = parse_id(&args.id)?;

    // Confirm deletion unless --yes is specified
    if !args.yes {
        print!("Delete investigation {}? [y/N] ", id);
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !response.trim().eq_ignore_ascii_case("y") {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    store.delete(id)?;
    println!("{}", formatter.success(&format!("Deleted investigation {}", id)));
    Ok(())
}
