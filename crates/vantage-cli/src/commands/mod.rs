//! Command implementations.

pub mod history;
pub mod investigate;
pub mod providers;

pub use self::history::{execute_delete, execute_export, execute_history, execute_show};
pub use self::investigate::execute_investigate;
pub use self::providers::{execute_providers, execute_types};

use crate::error::{CliError, Result};
use vantage_domain::Id;

/// Parse a user-supplied investigation id.
pub(crate) fn parse_id(raw: &str) -> Result<Id> {
    Id::parse(raw.trim())
        .map_err(|e| CliError::InvalidInput(format!("Invalid ID '{}': {}", raw, e)))
}
