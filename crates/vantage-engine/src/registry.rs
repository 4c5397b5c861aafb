//! Provider registry.
//!
//! Built once at startup from the fixed factory table. A provider whose
//! constructor fails is logged and left out; the rest stay usable.

use crate::config::ProvidersConfig;
use crate::providers::{ProviderFactory, BUILTIN_PROVIDERS};
use tracing::{error, info};
use vantage_domain::{EntityType, Provider, ProviderMetadata};

/// Ordered set of loaded providers
pub struct ProviderRegistry {
    providers: Vec<Box<dyn Provider>>,
}

impl ProviderRegistry {
    /// Load every built-in provider
    pub fn builtin(config: &ProvidersConfig) -> Self {
        Self::from_factories(BUILTIN_PROVIDERS, config)
    }

    /// Load providers from a factory table, skipping disabled names and
    /// constructors that fail
    pub fn from_factories(factories: &[(&str, ProviderFactory)], config: &ProvidersConfig) -> Self {
        let mut providers = Vec::with_capacity(factories.len());

        for (name, factory) in factories {
            if config.is_disabled(name) {
                info!("Provider disabled by configuration: {}", name);
                continue;
            }
            match factory(config) {
                Ok(provider) => {
                    info!("Loaded provider: {}", provider.name());
                    providers.push(provider);
                }
                Err(e) => error!("Failed to load provider {}: {}", name, e),
            }
        }

        info!("Provider registry ready: {} loaded", providers.len());
        Self { providers }
    }

    /// Wrap already constructed providers, keeping their order
    pub fn from_providers(providers: Vec<Box<dyn Provider>>) -> Self {
        Self { providers }
    }

    /// Providers that accept `entity_type`, in registration order
    pub fn providers_for(&self, entity_type: EntityType) -> Vec<&dyn Provider> {
        self.providers
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| p.supports(entity_type))
            .collect()
    }

    /// Look up a provider by exact name
    pub fn get(&self, name: &str) -> Option<&dyn Provider> {
        self.providers
            .iter()
            .map(|p| p.as_ref())
            .find(|p| p.name() == name)
    }

    /// Metadata for every loaded provider
    pub fn list_providers(&self) -> Vec<ProviderMetadata> {
        self.providers.iter().map(|p| p.metadata()).collect()
    }

    /// Union of supported types, sorted by name, without duplicates
    pub fn supported_types(&self) -> Vec<EntityType> {
        let mut types: Vec<EntityType> = self
            .providers
            .iter()
            .flat_map(|p| p.supported_types().iter().copied())
            .collect();
        types.sort_by_key(|t| t.as_str());
        types.dedup();
        types
    }

    /// Number of loaded providers
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ProviderRegistry")
            .field("providers", &names)
            .finish()
    }
}
