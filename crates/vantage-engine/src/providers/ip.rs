//! IP address classification

use crate::config::ProvidersConfig;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::debug;
use vantage_domain::{Entity, EntityType, Investigation, Metadata, Provider, ProviderError};

/// Tags an IP seed with its version and address class. Adds no entities.
///
/// Seed metadata keys: `ip_version` (4 or 6) and `ip_type`.
#[derive(Debug, Default)]
pub struct IpClassification;

impl IpClassification {
    /// Registry name
    pub const NAME: &'static str = "IP Address Classification";

    /// Construct from configuration
    pub fn from_config(_config: &ProvidersConfig) -> Result<Self, ProviderError> {
        Ok(Self)
    }

    pub(crate) fn boxed(config: &ProvidersConfig) -> Result<Box<dyn Provider>, ProviderError> {
        Ok(Box::new(Self::from_config(config)?))
    }
}

fn classify_v4(ip: Ipv4Addr) -> &'static str {
    if ip.is_unspecified() {
        "unspecified"
    } else if ip.is_loopback() {
        "loopback"
    } else if ip.is_private() {
        "private"
    } else if ip.is_link_local() {
        "link-local"
    } else if ip.is_multicast() {
        "multicast"
    } else if ip.is_documentation() {
        "documentation"
    } else {
        "public"
    }
}

fn classify_v6(ip: Ipv6Addr) -> &'static str {
    let first = ip.segments()[0];
    if ip.is_unspecified() {
        "unspecified"
    } else if ip.is_loopback() {
        "loopback"
    } else if first & 0xfe00 == 0xfc00 {
        "private"
    } else if first & 0xffc0 == 0xfe80 {
        "link-local"
    } else if ip.is_multicast() {
        "multicast"
    } else if first == 0x2001 && ip.segments()[1] == 0x0db8 {
        "documentation"
    } else {
        "public"
    }
}

/// Parse an address, also reading dotted-quad octets with leading zeros as decimal
fn parse_address(raw: &str) -> Result<IpAddr, std::net::AddrParseError> {
    raw.parse().or_else(|err: std::net::AddrParseError| {
        let octets: Vec<u8> = raw
            .split('.')
            .map(str::parse::<u8>)
            .collect::<Result<_, _>>()
            .map_err(|_| err.clone())?;
        match octets[..] {
            [a, b, c, d] => Ok(IpAddr::V4(Ipv4Addr::new(a, b, c, d))),
            _ => Err(err),
        }
    })
}

fn classify(ip: IpAddr) -> (u8, &'static str) {
    match ip {
        IpAddr::V4(v4) => (4, classify_v4(v4)),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => (6, classify_v4(v4)),
            None => (6, classify_v6(v6)),
        },
    }
}

impl Provider for IpClassification {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Classify IP addresses: version, private/public/reserved ranges"
    }

    fn supported_types(&self) -> &[EntityType] {
        &[EntityType::IpAddress]
    }

    fn icon(&self) -> &str {
        "globe"
    }

    fn execute(
        &self,
        seed: &Entity,
        graph: &mut Investigation,
    ) -> Result<Vec<Entity>, ProviderError> {
        let ip = parse_address(seed.value.trim()).map_err(|e| ProviderError::InvalidSeed {
            value: seed.value.clone(),
            reason: e.to_string(),
        })?;

        let (version, ip_type) = classify(ip);
        debug!(ip = %ip, ip_type, "Classified IP address");

        let mut annotations = Metadata::new();
        annotations.insert("ip_version".into(), f64::from(version).into());
        annotations.insert("ip_type".into(), ip_type.into());
        graph.merge_metadata(seed.id, annotations);

        Ok(Vec::new())
    }
}
