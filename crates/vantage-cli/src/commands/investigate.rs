//! Investigate command implementation.

use crate::cli::InvestigateArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use vantage_domain::{Investigation, InvestigationStore};
use vantage_engine::Engine;

/// Execute the investigate command.
///
/// The investigation is saved unless `store` is `None` (`--no-save`).
pub fn execute_investigate<S>(
    args: InvestigateArgs,
    engine: &Engine,
    store: Option<&mut S>,
    formatter: &Formatter,
) -> Result<Investigation>
where
    S: InvestigationStore,
    CliError: From<S::Error>,
{
    let investigation = engine.investigate(
        &args.query,
        args.entity_type.as_deref(),
        Some(args.providers.as_slice()),
    )?;

    println!("{}", formatter.format_investigation(&investigation)?);

    if let Some(store) = store {
        store.save(&investigation)?;
        eprintln!(
            "{}",
            formatter.info(&format!("Saved investigation {}", investigation.id()))
        );
    }

    Ok(investigation)
}
