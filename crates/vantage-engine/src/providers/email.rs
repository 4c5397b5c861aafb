//! Email address enrichment

use crate::config::ProvidersConfig;
use tracing::debug;
use vantage_domain::{Entity, EntityType, Investigation, Metadata, Provider, ProviderError};

/// Mail hosts recognised from the address domain
const KNOWN_MAIL_HOSTS: &[(&str, &str)] = &[
    ("gmail.com", "Google (Gmail)"),
    ("googlemail.com", "Google (Gmail)"),
    ("outlook.com", "Microsoft (Outlook)"),
    ("hotmail.com", "Microsoft (Hotmail)"),
    ("live.com", "Microsoft (Live)"),
    ("yahoo.com", "Yahoo"),
    ("protonmail.com", "ProtonMail"),
    ("proton.me", "ProtonMail"),
    ("icloud.com", "Apple (iCloud)"),
    ("me.com", "Apple"),
    ("aol.com", "AOL"),
    ("zoho.com", "Zoho"),
];

const UNKNOWN_MAIL_HOST: &str = "Custom/Unknown";

/// Disposable / temporary mail domains
const DISPOSABLE_DOMAINS: &[&str] = &[
    "tempmail.com",
    "guerrillamail.com",
    "mailinator.com",
    "throwaway.email",
    "temp-mail.org",
    "fakeinbox.com",
    "sharklasers.com",
    "guerrillamailblock.com",
    "grr.la",
    "dispostable.com",
    "yopmail.com",
    "trashmail.com",
    "maildrop.cc",
    "10minutemail.com",
    "tempail.com",
    "burnermail.io",
    "mailnesia.com",
    "tempr.email",
];

/// Splits an address into the username and domain it implies and tags the
/// seed with mail-host facts.
///
/// Seed metadata keys: `local_part`, `domain`, `email_provider`, `is_disposable`.
#[derive(Debug, Default)]
pub struct EmailEnrichment;

impl EmailEnrichment {
    /// Registry name
    pub const NAME: &'static str = "Email Enrichment";

    /// Construct from configuration
    pub fn from_config(_config: &ProvidersConfig) -> Result<Self, ProviderError> {
        Ok(Self)
    }

    pub(crate) fn boxed(config: &ProvidersConfig) -> Result<Box<dyn Provider>, ProviderError> {
        Ok(Box::new(Self::from_config(config)?))
    }
}

fn mail_host(domain: &str) -> &'static str {
    KNOWN_MAIL_HOSTS
        .iter()
        .find(|(d, _)| *d == domain)
        .map(|(_, host)| *host)
        .unwrap_or(UNKNOWN_MAIL_HOST)
}

fn is_disposable(domain: &str) -> bool {
    DISPOSABLE_DOMAINS.contains(&domain)
}

impl Provider for EmailEnrichment {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Analyze email: extract username and domain, detect mail host, flag disposable domains"
    }

    fn supported_types(&self) -> &[EntityType] {
        &[EntityType::Email]
    }

    fn icon(&self) -> &str {
        "mail"
    }

    fn execute(
        &self,
        seed: &Entity,
        graph: &mut Investigation,
    ) -> Result<Vec<Entity>, ProviderError> {
        let email = seed.value.trim().to_lowercase();
        let (local_part, domain) = email
            .split_once('@')
            .filter(|(local, domain)| !local.is_empty() && !domain.is_empty())
            .ok_or_else(|| ProviderError::InvalidSeed {
                value: seed.value.clone(),
                reason: "expected local@domain".to_string(),
            })?;

        debug!(email = %email, "Enriching email");
        let mut discovered = Vec::new();

        let username = Entity::new(EntityType::Username, local_part, Self::NAME)
            .with_confidence(0.7)
            .with_metadata("derived_from", email.as_str())
            .with_metadata("note", "Username extracted from email local part");
        let added = graph.add_entity(username).clone();
        graph.add_relationship(seed.id, added.id, "email_contains_username", 0.7, Metadata::new());
        discovered.push(added);

        let host = Entity::new(EntityType::Domain, domain, Self::NAME)
            .with_metadata("derived_from", email.as_str());
        let added = graph.add_entity(host).clone();
        graph.add_relationship(seed.id, added.id, "email_hosted_on", 1.0, Metadata::new());
        discovered.push(added);

        let mut annotations = Metadata::new();
        annotations.insert("local_part".into(), local_part.into());
        annotations.insert("domain".into(), domain.into());
        annotations.insert("email_provider".into(), mail_host(domain).into());
        annotations.insert("is_disposable".into(), is_disposable(domain).into());
        graph.merge_metadata(seed.id, annotations);

        Ok(discovered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(value: &str) -> (Investigation, Entity) {
        let mut inv = Investigation::new(value, EntityType::Email);
        let seed = inv
            .add_entity(Entity::new(EntityType::Email, value, "user_input"))
            .clone();
        (inv, seed)
    }

    #[test]
    fn test_extracts_username_and_domain() {
        let (mut inv, seed) = seeded("alice.smith@gmail.com");
        let found = EmailEnrichment.execute(&seed, &mut inv).unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].entity_type, EntityType::Username);
        assert_eq!(found[0].value, "alice.smith");
        assert_eq!(found[0].confidence, 0.7);
        assert_eq!(found[1].entity_type, EntityType::Domain);
        assert_eq!(found[1].value, "gmail.com");

        let types: Vec<_> = inv
            .relationships()
            .iter()
            .map(|r| r.relationship_type.as_str())
            .collect();
        assert_eq!(types, vec!["email_contains_username", "email_hosted_on"]);
        assert!(inv.relationships().iter().all(|r| r.source_entity_id == seed.id));
    }

    #[test]
    fn test_annotates_seed() {
        let (mut inv, seed) = seeded("bob@mailinator.com");
        EmailEnrichment.execute(&seed, &mut inv).unwrap();

        let meta = &inv.entity_by_id(seed.id).unwrap().metadata;
        assert_eq!(meta["local_part"].as_str(), Some("bob"));
        assert_eq!(meta["domain"].as_str(), Some("mailinator.com"));
        assert_eq!(meta["email_provider"].as_str(), Some(UNKNOWN_MAIL_HOST));
        assert_eq!(meta["is_disposable"].as_bool(), Some(true));
    }

    #[test]
    fn test_known_host() {
        assert_eq!(mail_host("proton.me"), "ProtonMail");
        assert_eq!(mail_host("example.ie"), UNKNOWN_MAIL_HOST);
        assert!(!is_disposable("gmail.com"));
    }

    #[test]
    fn test_rejects_seed_without_at() {
        let (mut inv, seed) = seeded("not-an-email");
        let err = EmailEnrichment.execute(&seed, &mut inv).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidSeed { .. }));
        assert_eq!(inv.entities().len(), 1);
    }
}
