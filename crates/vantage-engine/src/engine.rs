//! Investigation orchestrator.
//!
//! Resolves and validates the query, seeds a new investigation, then runs
//! each matching provider in registry order. Provider failures, panics
//! included, are recorded in the audit trail and never abort the run.

use crate::error::{EngineError, ValidationError};
use crate::registry::ProviderRegistry;
use crate::validator::TypeValidator;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{error, info, warn};
use vantage_domain::{
    Entity, EntityType, Investigation, Provider, ProviderError, ProviderMetadata, ProviderRun,
    USER_INPUT_SOURCE,
};

/// Runs investigations against a provider registry
#[derive(Debug)]
pub struct Engine {
    registry: ProviderRegistry,
    validator: TypeValidator,
}

impl Engine {
    /// Create an engine over a loaded registry
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            validator: TypeValidator::new(),
        }
    }

    /// The underlying registry
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Run a full investigation.
    ///
    /// Fails only before the investigation exists: an unknown explicit type,
    /// an undetectable query, or a value that does not match its type. After
    /// that the returned investigation is always terminal.
    ///
    /// `provider_filter` keeps only providers with those names; `None` or an
    /// empty list runs every provider for the type.
    pub fn investigate(
        &self,
        query: &str,
        explicit_type: Option<&str>,
        provider_filter: Option<&[String]>,
    ) -> Result<Investigation, EngineError> {
        let entity_type = self.resolve_type(query, explicit_type)?;
        let value = self.validator.validate_and_normalize(query, entity_type)?;

        info!(query = %value, entity_type = %entity_type, "Starting investigation");

        let mut investigation = Investigation::new(value.clone(), entity_type);
        investigation.start()?;
        let seed_id = investigation
            .add_entity(Entity::new(entity_type, value, USER_INPUT_SOURCE).with_confidence(1.0))
            .id;

        let provider_filter = provider_filter.filter(|names| !names.is_empty());
        let selected: Vec<&dyn Provider> = self
            .registry
            .providers_for(entity_type)
            .into_iter()
            .filter(|p| provider_filter.is_none_or(|names| names.iter().any(|n| n == p.name())))
            .collect();

        if selected.is_empty() {
            warn!("No providers selected for type {}", entity_type);
        }

        for provider in selected {
            // Earlier providers may have annotated the seed
            let Some(seed) = investigation.entity_by_id(seed_id).cloned() else {
                break;
            };
            let run = run_provider(provider, &seed, &mut investigation);
            investigation.record_run(run);
        }

        investigation.complete()?;
        info!(
            entities = investigation.entities().len(),
            relationships = investigation.relationships().len(),
            "Investigation completed"
        );

        Ok(investigation)
    }

    /// Metadata for every loaded provider
    pub fn list_providers(&self) -> Vec<ProviderMetadata> {
        self.registry.list_providers()
    }

    /// Names of every type some provider accepts
    pub fn supported_types(&self) -> Vec<String> {
        self.registry
            .supported_types()
            .into_iter()
            .map(|t| t.as_str().to_string())
            .collect()
    }

    fn resolve_type(
        &self,
        query: &str,
        explicit_type: Option<&str>,
    ) -> Result<EntityType, ValidationError> {
        match explicit_type {
            Some(name) => name
                .parse()
                .map_err(|_| ValidationError::UnknownType(name.to_string())),
            None => self
                .validator
                .detect_type(query)
                .ok_or_else(|| ValidationError::UndetectedType(query.to_string())),
        }
    }
}

fn run_provider(provider: &dyn Provider, seed: &Entity, graph: &mut Investigation) -> ProviderRun {
    let name = provider.name();
    info!(provider = name, "Running provider");

    let started = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| provider.execute(seed, graph)))
        .unwrap_or_else(|payload| Err(ProviderError::Panicked(panic_message(payload.as_ref()))));
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok(found) => {
            info!(provider = name, discovered = found.len(), elapsed_ms, "Provider finished");
            ProviderRun::succeeded(name, found.len(), elapsed_ms)
        }
        Err(e) => {
            error!(provider = name, elapsed_ms, "Provider failed: {}", e);
            ProviderRun::failed(name, e.to_string(), elapsed_ms)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvidersConfig;
    use vantage_domain::InvestigationStatus;

    fn engine() -> Engine {
        Engine::new(ProviderRegistry::builtin(&ProvidersConfig::default()))
    }

    #[test]
    fn test_email_investigation() {
        let inv = engine().investigate("Alice@Example.com", None, None).unwrap();

        assert_eq!(inv.status(), InvestigationStatus::Completed);
        assert_eq!(inv.initial_query(), "alice@example.com");
        assert_eq!(inv.initial_type(), EntityType::Email);
        assert_eq!(inv.providers_run(), vec!["Email Enrichment"]);
        // seed, username, domain
        assert_eq!(inv.entities().len(), 3);
        assert_eq!(inv.entities()[0].source_provider, USER_INPUT_SOURCE);
        assert_eq!(inv.relationships().len(), 2);
    }

    #[test]
    fn test_explicit_type() {
        let inv = engine()
            .investigate("+353 87 123 4567", Some("phone"), None)
            .unwrap();
        assert_eq!(inv.initial_query(), "+353871234567");
        assert_eq!(inv.providers_run(), vec!["Phone Number Analysis"]);
        assert!(inv.find_entity(EntityType::CarrierInfo, "Vodafone Ireland").is_some());
    }

    #[test]
    fn test_unknown_explicit_type() {
        let err = engine().investigate("bob", Some("gizmo"), None).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::UnknownType(ref t)) if t == "gizmo"
        ));
    }

    #[test]
    fn test_invalid_value_for_explicit_type() {
        let err = engine().investigate("bob", Some("email"), None).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_supported_types() {
        assert_eq!(engine().supported_types(), vec!["email", "ip_address", "phone"]);
        assert_eq!(engine().list_providers().len(), 3);
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
        let boxed: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }
}
