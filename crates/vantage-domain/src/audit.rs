//! Provider execution audit trail

use serde::{Deserialize, Serialize};

/// Suffix appended to a provider's name in the audit trail when it failed
pub const FAILED_MARKER: &str = " (FAILED)";

/// What happened when one provider ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProviderOutcome {
    /// `execute` returned normally
    Succeeded {
        /// Number of entities the provider reported as discovered
        discovered: usize,
    },
    /// `execute` returned an error or panicked
    Failed {
        /// Error message
        reason: String,
    },
}

/// One entry of an investigation's audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRun {
    /// Provider name
    pub provider: String,

    /// Result of the run
    #[serde(flatten)]
    pub outcome: ProviderOutcome,

    /// Wall-clock duration of the call in milliseconds
    #[serde(default)]
    pub elapsed_ms: u64,
}

impl ProviderRun {
    /// Record a successful run
    pub fn succeeded(provider: impl Into<String>, discovered: usize, elapsed_ms: u64) -> Self {
        Self {
            provider: provider.into(),
            outcome: ProviderOutcome::Succeeded { discovered },
            elapsed_ms,
        }
    }

    /// Record a failed run
    pub fn failed(provider: impl Into<String>, reason: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            provider: provider.into(),
            outcome: ProviderOutcome::Failed {
                reason: reason.into(),
            },
            elapsed_ms,
        }
    }

    /// Whether the run failed
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, ProviderOutcome::Failed { .. })
    }

    /// Audit string: the provider name, suffixed with `" (FAILED)"` on failure
    pub fn audit_label(&self) -> String {
        if self.is_failure() {
            format!("{}{}", self.provider, FAILED_MARKER)
        } else {
            self.provider.clone()
        }
    }
}
