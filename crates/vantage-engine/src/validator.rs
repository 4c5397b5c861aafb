//! Query type detection and normalization

use crate::error::ValidationError;
use regex::Regex;
use std::net::Ipv6Addr;
use std::sync::LazyLock;
use vantage_domain::EntityType;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@?[a-zA-Z0-9._\-]{1,64}$").expect("valid username regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{7,15}$").expect("valid phone regex"));

// Decimal octets, leading zeros allowed
static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:25[0-5]|2[0-4]\d|[01]?\d\d?)\.){3}(?:25[0-5]|2[0-4]\d|[01]?\d\d?)$")
        .expect("valid ipv4 regex")
});

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-z0-9](?:[a-z0-9\-]{0,61}[a-z0-9])?\.)+[a-z]{2,}$")
        .expect("valid domain regex")
});

/// Phone formatting characters removed before validation, besides whitespace
const PHONE_PUNCTUATION: [char; 3] = ['-', '(', ')'];

/// Minimum digit count for an unprefixed number to be detected as a phone
const MIN_DETECTED_PHONE_DIGITS: usize = 10;

/// Decides what kind of thing a raw query is and produces its canonical form
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeValidator;

impl TypeValidator {
    /// Create a validator
    pub fn new() -> Self {
        Self
    }

    /// Detect the type of a raw query.
    ///
    /// Formats overlap, so they are tried in a fixed order: email, IP
    /// literal, phone (leading `+` or at least ten digits), domain, and
    /// finally the permissive username pattern.
    pub fn detect_type(&self, raw: &str) -> Option<EntityType> {
        let value = raw.trim();
        if is_email(value) {
            return Some(EntityType::Email);
        }
        if is_ip(value) {
            return Some(EntityType::IpAddress);
        }
        if is_phone(value) && (value.starts_with('+') || digit_count(value) >= MIN_DETECTED_PHONE_DIGITS)
        {
            return Some(EntityType::Phone);
        }
        if is_domain(value) {
            return Some(EntityType::Domain);
        }
        if is_username(value) {
            return Some(EntityType::Username);
        }
        None
    }

    /// Check `raw` against the format of `entity_type` and return its
    /// normalized form. Types without a format rule only need to be non-empty.
    pub fn validate_and_normalize(
        &self,
        raw: &str,
        entity_type: EntityType,
    ) -> Result<String, ValidationError> {
        let value = raw.trim();
        let valid = match entity_type {
            EntityType::Email => is_email(value),
            EntityType::Username => is_username(value),
            EntityType::Phone => is_phone(value),
            EntityType::Domain => is_domain(value),
            EntityType::IpAddress => is_ip(value),
            _ => !value.is_empty(),
        };

        if !valid {
            return Err(ValidationError::InvalidValue {
                entity_type,
                value: raw.to_string(),
            });
        }

        Ok(normalize(value, entity_type))
    }
}

fn normalize(value: &str, entity_type: EntityType) -> String {
    match entity_type {
        EntityType::Email => value.to_lowercase(),
        EntityType::Domain => canonical_domain(value),
        EntityType::Phone => strip_phone_punctuation(value),
        EntityType::Username => value.trim_start_matches('@').to_string(),
        _ => value.to_string(),
    }
}

fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

fn is_username(value: &str) -> bool {
    USERNAME_RE.is_match(value)
}

fn is_phone(value: &str) -> bool {
    PHONE_RE.is_match(&strip_phone_punctuation(value))
}

fn is_domain(value: &str) -> bool {
    DOMAIN_RE.is_match(&canonical_domain(value))
}

fn is_ip(value: &str) -> bool {
    IPV4_RE.is_match(value) || value.parse::<Ipv6Addr>().is_ok()
}

fn canonical_domain(value: &str) -> String {
    value.to_lowercase().trim_end_matches('.').to_string()
}

fn strip_phone_punctuation(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && !PHONE_PUNCTUATION.contains(c))
        .collect()
}

fn digit_count(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}
