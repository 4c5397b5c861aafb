//! Entity type module - the closed set of things an investigation can discover

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic kind of an entity.
///
/// Providers declare which kinds they accept as a seed and which kinds they
/// may emit. Adding a kind means extending this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Email address
    Email,
    /// Handle on some platform
    Username,
    /// Phone number
    Phone,
    /// IPv4 or IPv6 address
    IpAddress,
    /// DNS domain name
    Domain,
    /// Registered company
    Company,
    /// Natural person
    Person,
    /// Profile on a social platform
    SocialProfile,
    /// URL
    Url,
    /// Hash digest
    Hash,
    /// Data breach the subject appears in
    Breach,
    /// DNS record
    DnsRecord,
    /// WHOIS registration data
    WhoisInfo,
    /// Geographic location
    GeoLocation,
    /// Telephone carrier
    CarrierInfo,
}

impl EntityType {
    /// Every entity type, in declaration order
    pub const ALL: [EntityType; 15] = [
        EntityType::Email,
        EntityType::Username,
        EntityType::Phone,
        EntityType::IpAddress,
        EntityType::Domain,
        EntityType::Company,
        EntityType::Person,
        EntityType::SocialProfile,
        EntityType::Url,
        EntityType::Hash,
        EntityType::Breach,
        EntityType::DnsRecord,
        EntityType::WhoisInfo,
        EntityType::GeoLocation,
        EntityType::CarrierInfo,
    ];

    /// Wire name of the type (e.g. `"ip_address"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Email => "email",
            EntityType::Username => "username",
            EntityType::Phone => "phone",
            EntityType::IpAddress => "ip_address",
            EntityType::Domain => "domain",
            EntityType::Company => "company",
            EntityType::Person => "person",
            EntityType::SocialProfile => "social_profile",
            EntityType::Url => "url",
            EntityType::Hash => "hash",
            EntityType::Breach => "breach",
            EntityType::DnsRecord => "dns_record",
            EntityType::WhoisInfo => "whois_info",
            EntityType::GeoLocation => "geo_location",
            EntityType::CarrierInfo => "carrier_info",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = GraphError;

    /// Parse a wire name. Matching is exact; `"IP_ADDRESS"` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| GraphError::UnknownEntityType(s.to_string()))
    }
}
