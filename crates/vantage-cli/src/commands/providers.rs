//! Provider and type listing commands.

use crate::error::Result;
use crate::output::Formatter;
use vantage_engine::Engine;

/// Execute the providers command.
pub fn execute_providers(engine: &Engine, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_providers(&engine.list_providers())?);
    Ok(())
}

/// Execute the types command.
pub fn execute_types(engine: &Engine, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_types(&engine.supported_types())?);
    Ok(())
}
