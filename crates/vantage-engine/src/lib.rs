//! Vantage Engine
//!
//! Application layer for investigations: detects and normalizes the query
//! type, loads the provider registry, runs providers against a seeded
//! investigation, and projects the result for display.
//!
//! ```
//! use vantage_engine::{Engine, ProviderRegistry, ProvidersConfig};
//!
//! let engine = Engine::new(ProviderRegistry::builtin(&ProvidersConfig::default()));
//! let investigation = engine.investigate("8.8.8.8", None, None).unwrap();
//! assert_eq!(investigation.providers_run(), vec!["IP Address Classification"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod error;
pub mod providers;
pub mod registry;
pub mod report;
pub mod validator;

pub use config::{ConfigError, EngineConfig, ProvidersConfig};
pub use engine::Engine;
pub use error::{EngineError, ValidationError};
pub use providers::{ProviderFactory, BUILTIN_PROVIDERS};
pub use registry::ProviderRegistry;
pub use report::InvestigationReport;
pub use validator::TypeValidator;
