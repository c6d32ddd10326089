//! Blocked-country classification for SIRW destinations.
//!
//! Two categories per SIRW Policy V3 Appendix A: countries under UN/EU
//! sanctions, and countries where the company has no legal entity. Lookups
//! accept either the full country name or the ISO 3166-1 alpha-2 code,
//! case-insensitively. An unrecognized country resolves as not blocked; that
//! open-world default is deliberate and awaiting product confirmation.

use serde::{Deserialize, Serialize};

/// Why a destination is off-limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    Sanctions,
    NoEntity,
}

impl BlockReason {
    pub const fn token(self) -> &'static str {
        match self {
            BlockReason::Sanctions => "sanctions",
            BlockReason::NoEntity => "no_entity",
        }
    }
}

/// Reporting region used when presenting the blocked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "Asia Pacific")]
    AsiaPacific,
    #[serde(rename = "Europe")]
    Europe,
    #[serde(rename = "IMEA")]
    Imea,
    #[serde(rename = "North America")]
    NorthAmerica,
    #[serde(rename = "Latin America")]
    LatinAmerica,
}

/// One entry of the blocked-country table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockedCountry {
    pub name: &'static str,
    /// ISO 3166-1 alpha-2.
    pub code: &'static str,
    pub reason: BlockReason,
    pub region: Region,
}

const fn sanctioned(name: &'static str, code: &'static str, region: Region) -> BlockedCountry {
    BlockedCountry {
        name,
        code,
        reason: BlockReason::Sanctions,
        region,
    }
}

const fn no_entity(name: &'static str, code: &'static str, region: Region) -> BlockedCountry {
    BlockedCountry {
        name,
        code,
        reason: BlockReason::NoEntity,
        region,
    }
}

/// Countries under UN/EU sanctions.
pub const SANCTIONED_COUNTRIES: &[BlockedCountry] = &[
    sanctioned("Afghanistan", "AF", Region::AsiaPacific),
    sanctioned("North Korea", "KP", Region::AsiaPacific),
    sanctioned("Iran", "IR", Region::AsiaPacific),
    sanctioned("Iraq", "IQ", Region::AsiaPacific),
    sanctioned("Myanmar", "MM", Region::AsiaPacific),
    sanctioned("Bosnia and Herzegovina", "BA", Region::Europe),
    sanctioned("Russia", "RU", Region::Europe),
    sanctioned("Turkey", "TR", Region::Europe),
    sanctioned("Ukraine", "UA", Region::Europe),
    sanctioned("Central African Republic", "CF", Region::Imea),
    sanctioned("Congo (DRC)", "CD", Region::Imea),
    sanctioned("Guinea", "GN", Region::Imea),
    sanctioned("Libya", "LY", Region::Imea),
    sanctioned("Somalia", "SO", Region::Imea),
    sanctioned("South Sudan", "SS", Region::Imea),
    sanctioned("Sudan", "SD", Region::Imea),
    sanctioned("Syria", "SY", Region::Imea),
    sanctioned("Yemen", "YE", Region::Imea),
    sanctioned("Zimbabwe", "ZW", Region::Imea),
    sanctioned("Haiti", "HT", Region::NorthAmerica),
    sanctioned("Nicaragua", "NI", Region::NorthAmerica),
    sanctioned("Venezuela", "VE", Region::LatinAmerica),
];

/// Countries where the company has no legal entity.
pub const NO_ENTITY_COUNTRIES: &[BlockedCountry] = &[
    no_entity("Brunei", "BN", Region::AsiaPacific),
    no_entity("Bhutan", "BT", Region::AsiaPacific),
    no_entity("Fiji", "FJ", Region::AsiaPacific),
    no_entity("Kiribati", "KI", Region::AsiaPacific),
    no_entity("Laos", "LA", Region::AsiaPacific),
    no_entity("Maldives", "MV", Region::AsiaPacific),
    no_entity("Marshall Islands", "MH", Region::AsiaPacific),
    no_entity("Micronesia", "FM", Region::AsiaPacific),
    no_entity("Mongolia", "MN", Region::AsiaPacific),
    no_entity("Nauru", "NR", Region::AsiaPacific),
    no_entity("Nepal", "NP", Region::AsiaPacific),
    no_entity("Palau", "PW", Region::AsiaPacific),
    no_entity("Papua New Guinea", "PG", Region::AsiaPacific),
    no_entity("Samoa", "WS", Region::AsiaPacific),
    no_entity("Solomon Islands", "SB", Region::AsiaPacific),
    no_entity("Timor-Leste", "TL", Region::AsiaPacific),
    no_entity("Tonga", "TO", Region::AsiaPacific),
    no_entity("Turkmenistan", "TM", Region::AsiaPacific),
    no_entity("Tuvalu", "TV", Region::AsiaPacific),
    no_entity("Uzbekistan", "UZ", Region::AsiaPacific),
    no_entity("Vanuatu", "VU", Region::AsiaPacific),
    no_entity("Albania", "AL", Region::Europe),
    no_entity("Andorra", "AD", Region::Europe),
    no_entity("Armenia", "AM", Region::Europe),
    no_entity("Azerbaijan", "AZ", Region::Europe),
    no_entity("Cyprus", "CY", Region::Europe),
    no_entity("Iceland", "IS", Region::Europe),
    no_entity("Liechtenstein", "LI", Region::Europe),
    no_entity("Luxembourg", "LU", Region::Europe),
    no_entity("Malta", "MT", Region::Europe),
    no_entity("Monaco", "MC", Region::Europe),
    no_entity("Montenegro", "ME", Region::Europe),
    no_entity("North Macedonia", "MK", Region::Europe),
    no_entity("Moldova", "MD", Region::Europe),
    no_entity("San Marino", "SM", Region::Europe),
    no_entity("Burundi", "BI", Region::Imea),
    no_entity("Chad", "TD", Region::Imea),
    no_entity("Comoros", "KM", Region::Imea),
    no_entity("Equatorial Guinea", "GQ", Region::Imea),
    no_entity("Eritrea", "ER", Region::Imea),
    no_entity("Guinea-Bissau", "GW", Region::Imea),
    no_entity("Kazakhstan", "KZ", Region::Imea),
    no_entity("Kyrgyzstan", "KG", Region::Imea),
    no_entity("Sao Tome and Principe", "ST", Region::Imea),
    no_entity("Seychelles", "SC", Region::Imea),
    no_entity("Tajikistan", "TJ", Region::Imea),
    no_entity("Antigua and Barbuda", "AG", Region::NorthAmerica),
    no_entity("Bahamas", "BS", Region::NorthAmerica),
    no_entity("Barbados", "BB", Region::NorthAmerica),
    no_entity("Cuba", "CU", Region::NorthAmerica),
    no_entity("Dominica", "DM", Region::NorthAmerica),
    no_entity("Grenada", "GD", Region::NorthAmerica),
    no_entity("Jamaica", "JM", Region::NorthAmerica),
    no_entity("Saint Kitts and Nevis", "KN", Region::NorthAmerica),
    no_entity("Saint Lucia", "LC", Region::NorthAmerica),
    no_entity("Saint Vincent and the Grenadines", "VC", Region::NorthAmerica),
    no_entity("Belize", "BZ", Region::LatinAmerica),
    no_entity("Guyana", "GY", Region::LatinAmerica),
    no_entity("Suriname", "SR", Region::LatinAmerica),
];

/// Classification returned for any destination string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryClassification {
    pub blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<BlockReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CountryClassification {
    const fn clear() -> Self {
        Self {
            blocked: false,
            reason: None,
            message: None,
        }
    }
}

/// Find the canonical table entry for a name or alpha-2 code.
///
/// Sanctioned entries are scanned first so the sanctions explanation wins if
/// a country ever appears in both sets.
pub fn lookup(country: &str) -> Option<&'static BlockedCountry> {
    let needle = country.trim();
    if needle.is_empty() {
        return None;
    }
    SANCTIONED_COUNTRIES
        .iter()
        .chain(NO_ENTITY_COUNTRIES.iter())
        .find(|entry| {
            entry.name.eq_ignore_ascii_case(needle) || entry.code.eq_ignore_ascii_case(needle)
        })
}

pub fn is_blocked(country: &str) -> bool {
    lookup(country).is_some()
}

/// Classify a destination, producing the user-facing explanation when blocked.
///
/// Messages interpolate the canonical table name, not the caller's spelling,
/// so user-facing casing stays consistent.
pub fn classify(country: &str) -> CountryClassification {
    let Some(entry) = lookup(country) else {
        return CountryClassification::clear();
    };

    let message = match entry.reason {
        BlockReason::Sanctions => format!(
            "SIRW to {} is not permitted. This country is currently subject to UN/EU \
             sanctions, and remote work from this location would expose both the company \
             and the employee to significant legal and compliance risks.",
            entry.name
        ),
        BlockReason::NoEntity => format!(
            "SIRW to {} is not permitted. The company does not have a legal entity in \
             this country, which means compliance with local tax, immigration, and \
             employment regulations cannot be ensured.",
            entry.name
        ),
    };

    CountryClassification {
        blocked: true,
        reason: Some(entry.reason),
        message: Some(message),
    }
}

/// All blocked entries, sanctioned first, for list endpoints and docs.
pub fn all_blocked() -> impl Iterator<Item = &'static BlockedCountry> {
    SANCTIONED_COUNTRIES.iter().chain(NO_ENTITY_COUNTRIES.iter())
}
