//! Phone number analysis: E.164 canonical form, country, Irish carrier and range

use crate::config::ProvidersConfig;
use tracing::debug;
use vantage_domain::{
    Entity, EntityType, Investigation, Metadata, MetadataValue, Provider, ProviderError,
};

/// Calling code, country, ISO code, local name
const COUNTRY_CODES: &[(&str, &str, &str, &str)] = &[
    ("353", "Ireland", "IE", "Éire"),
    ("44", "United Kingdom", "GB", "UK"),
    ("1", "United States/Canada", "US/CA", "North America"),
    ("33", "France", "FR", "France"),
    ("49", "Germany", "DE", "Germany"),
    ("34", "Spain", "ES", "Spain"),
    ("39", "Italy", "IT", "Italy"),
    ("31", "Netherlands", "NL", "Netherlands"),
    ("32", "Belgium", "BE", "Belgium"),
    ("48", "Poland", "PL", "Poland"),
    ("351", "Portugal", "PT", "Portugal"),
    ("45", "Denmark", "DK", "Denmark"),
    ("46", "Sweden", "SE", "Sweden"),
    ("47", "Norway", "NO", "Norway"),
    ("358", "Finland", "FI", "Finland"),
    ("91", "India", "IN", "India"),
    ("86", "China", "CN", "China"),
    ("81", "Japan", "JP", "Japan"),
    ("55", "Brazil", "BR", "Brazil"),
    ("61", "Australia", "AU", "Australia"),
];

/// Irish mobile prefixes (national format)
const IRISH_CARRIERS: &[(&str, &str)] = &[
    ("083", "Three Ireland"),
    ("085", "Three Ireland"),
    ("086", "Vodafone Ireland"),
    ("087", "Vodafone Ireland"),
    ("088", "Tesco Mobile / Three MVNO"),
    ("089", "Three Ireland"),
];

const IRELAND: &str = "+353";

/// Irish number ranges by leading digits after the country code; first match wins
const IRISH_RANGES: &[(&[&str], &str)] = &[
    (&["1800"], "toll-free"),
    (&["1850", "1890"], "shared-cost"),
    (&["1"], "landline (Dublin)"),
    (&["21", "22", "23", "24", "25", "26", "27", "28", "29"], "landline (Munster)"),
    (&["41", "42", "43", "44", "45", "46", "47", "49"], "landline (Leinster/Ulster)"),
    (&["51", "52", "53", "54", "56", "57", "58", "59"], "landline (South-East)"),
    (&["61", "62", "63", "64", "65", "66", "67", "68", "69"], "landline (Mid-West/Kerry)"),
    (
        &["71", "74", "76", "90", "91", "93", "94", "95", "96", "97", "98", "99"],
        "landline (West/North-West)",
    ),
    (&["83", "85", "86", "87", "89"], "mobile"),
];

/// Canonicalizes a phone number and derives its country, carrier and range.
///
/// Seed metadata keys: `original`, `e164_format`, `is_valid_format`,
/// `number_type`, `country`, and for Irish numbers `carrier` and `irish_analysis`.
#[derive(Debug)]
pub struct PhoneAnalysis {
    default_country_code: String,
}

impl PhoneAnalysis {
    /// Registry name
    pub const NAME: &'static str = "Phone Number Analysis";

    /// Construct from configuration
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, ProviderError> {
        let code = config.phone_default_country_code.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ProviderError::Failed(format!(
                "invalid default country code '{}'",
                code
            )));
        }
        Ok(Self {
            default_country_code: code.to_string(),
        })
    }

    pub(crate) fn boxed(config: &ProvidersConfig) -> Result<Box<dyn Provider>, ProviderError> {
        Ok(Box::new(Self::from_config(config)?))
    }

    /// E.164 form: punctuation removed, national `0` prefix replaced by the
    /// default calling code, `+` added when missing
    fn to_e164(&self, raw: &str) -> String {
        let cleaned: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
            .collect();

        if cleaned.starts_with('+') {
            cleaned
        } else if let Some(national) = cleaned.strip_prefix('0') {
            format!("+{}{}", self.default_country_code, national)
        } else {
            format!("+{}", cleaned)
        }
    }
}

/// Longest calling-code prefix match (3, then 2, then 1 digits)
fn detect_country(e164: &str) -> Option<(&'static str, &'static str, &'static str, &'static str)> {
    let digits = e164.trim_start_matches('+');
    (1..=3).rev().find_map(|len| {
        let prefix = digits.get(..len)?;
        COUNTRY_CODES.iter().copied().find(|(code, ..)| *code == prefix)
    })
}

fn irish_carrier(e164: &str) -> Option<(&'static str, &'static str)> {
    let national = format!("0{}", e164.strip_prefix(IRELAND)?);
    let prefix = national.get(..3)?;
    IRISH_CARRIERS.iter().copied().find(|(p, _)| *p == prefix)
}

fn classify_number(e164: &str) -> &'static str {
    let Some(local) = e164.strip_prefix(IRELAND) else {
        return "unknown";
    };
    IRISH_RANGES
        .iter()
        .find(|(prefixes, _)| prefixes.iter().any(|p| local.starts_with(p)))
        .map(|(_, kind)| *kind)
        .unwrap_or("unknown")
}

fn is_valid_e164(e164: &str) -> bool {
    match e164.strip_prefix('+') {
        Some(digits) => {
            (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

fn irish_analysis(e164: &str) -> Metadata {
    let local = e164.strip_prefix(IRELAND).unwrap_or(e164);
    let mut analysis = Metadata::new();
    analysis.insert("is_irish".into(), true.into());
    analysis.insert("local_number".into(), format!("0{}", local).into());
    analysis.insert("international_format".into(), e164.into());

    if local.starts_with("15") {
        analysis.insert("warning".into(), "Premium rate number".into());
        analysis.insert("risk_level".into(), "high".into());
    }
    if local.starts_with("76") {
        analysis.insert(
            "note".into(),
            "VoIP number range, may be harder to trace".into(),
        );
        analysis.insert("is_voip".into(), true.into());
    }
    analysis
}

impl Provider for PhoneAnalysis {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Validate phone numbers, detect carrier (Irish focus), identify country and number type"
    }

    fn supported_types(&self) -> &[EntityType] {
        &[EntityType::Phone]
    }

    fn icon(&self) -> &str {
        "phone"
    }

    fn execute(
        &self,
        seed: &Entity,
        graph: &mut Investigation,
    ) -> Result<Vec<Entity>, ProviderError> {
        let e164 = self.to_e164(&seed.value);
        debug!(phone = %e164, "Analyzing phone number");
        let mut discovered = Vec::new();

        let mut annotations = Metadata::new();
        annotations.insert("original".into(), seed.value.as_str().into());
        annotations.insert("e164_format".into(), e164.as_str().into());
        annotations.insert("is_valid_format".into(), is_valid_e164(&e164).into());
        annotations.insert("number_type".into(), classify_number(&e164).into());

        if let Some((code, country, iso, local_name)) = detect_country(&e164) {
            let mut info = Metadata::new();
            info.insert("calling_code".into(), code.into());
            info.insert("country".into(), country.into());
            info.insert("iso".into(), iso.into());
            info.insert("name".into(), local_name.into());
            annotations.insert("country".into(), MetadataValue::Map(info.clone()));

            let geo = Entity::new(EntityType::GeoLocation, country, Self::NAME)
                .with_confidence(0.9)
                .with_metadata_map(info);
            let added = graph.add_entity(geo).clone();
            graph.add_relationship(seed.id, added.id, "phone_registered_in", 0.9, Metadata::new());
            discovered.push(added);

            if iso == "IE" {
                annotations.insert("irish_analysis".into(), irish_analysis(&e164).into());
            }
        }

        if let Some((prefix, carrier)) = irish_carrier(&e164) {
            let mut info = Metadata::new();
            info.insert("carrier".into(), carrier.into());
            info.insert("prefix".into(), prefix.into());
            info.insert("type".into(), "mobile".into());
            info.insert("country".into(), "Ireland".into());
            annotations.insert("carrier".into(), MetadataValue::Map(info.clone()));

            let entity = Entity::new(EntityType::CarrierInfo, carrier, Self::NAME)
                .with_confidence(0.8)
                .with_metadata_map(info);
            let added = graph.add_entity(entity).clone();
            graph.add_relationship(seed.id, added.id, "phone_carrier_is", 0.8, Metadata::new());
            discovered.push(added);
        }

        graph.merge_metadata(seed.id, annotations);
        Ok(discovered)
    }
}
