//! Built-in lookup providers
//!
//! All built-in providers work offline. Network-backed sources implement the
//! same [`Provider`] trait and are registered the same way.

mod email;
mod ip;
mod phone;

pub use email::EmailEnrichment;
pub use ip::IpClassification;
pub use phone::PhoneAnalysis;

use crate::config::ProvidersConfig;
use vantage_domain::{Provider, ProviderError};

/// Constructor for one provider. Fails when required configuration is missing.
pub type ProviderFactory = fn(&ProvidersConfig) -> Result<Box<dyn Provider>, ProviderError>;

/// The fixed, ordered list of providers the default registry tries to load
pub const BUILTIN_PROVIDERS: &[(&str, ProviderFactory)] = &[
    (EmailEnrichment::NAME, EmailEnrichment::boxed),
    (PhoneAnalysis::NAME, PhoneAnalysis::boxed),
    (IpClassification::NAME, IpClassification::boxed),
];
