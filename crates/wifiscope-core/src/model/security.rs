// ── Security classification ──

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::Display;

/// Coarse security class of a BSS, derived from the advertised
/// descriptor and authentication suites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum SecurityType {
    Open,
    #[serde(rename = "WEP")]
    #[strum(serialize = "WEP")]
    Wep,
    #[serde(rename = "WPA")]
    #[strum(serialize = "WPA")]
    Wpa,
    #[serde(rename = "WPA2")]
    #[strum(serialize = "WPA2")]
    Wpa2,
    #[serde(rename = "WPA3")]
    #[strum(serialize = "WPA3")]
    Wpa3,
    #[serde(rename = "WPA2/WPA3")]
    #[strum(serialize = "WPA2/WPA3")]
    Wpa2Wpa3,
    #[serde(rename = "WPA2-Enterprise")]
    #[strum(serialize = "WPA2-Enterprise")]
    Wpa2Enterprise,
    #[serde(rename = "WPA3-Enterprise")]
    #[strum(serialize = "WPA3-Enterprise")]
    Wpa3Enterprise,
    #[serde(rename = "OWE")]
    #[strum(serialize = "OWE")]
    Owe,
    #[default]
    Unknown,
}

impl SecurityType {
    /// Classify a free-form security descriptor (e.g. `"WPA2-PSK"`,
    /// `"WPA2 WPA3"`, `"RSN"`) together with the advertised auth suites
    /// (e.g. `["PSK", "SAE"]`).
    pub fn classify(descriptor: &str, auth_methods: &[String]) -> Self {
        let desc = descriptor.to_ascii_lowercase();
        let has_auth = |needle: &str| {
            auth_methods
                .iter()
                .any(|m| m.to_ascii_uppercase().contains(needle))
        };

        if desc.contains("owe") || has_auth("OWE") {
            return Self::Owe;
        }

        let enterprise = desc.contains("enterprise")
            || desc.contains("802.1x")
            || desc.contains("eap")
            || has_auth("EAP")
            || has_auth("802.1X");
        let wpa3 = desc.contains("wpa3") || desc.contains("sae") || has_auth("SAE");
        let wpa2 = desc.contains("wpa2") || desc.contains("rsn");

        match (enterprise, wpa3, wpa2) {
            (true, true, _) => Self::Wpa3Enterprise,
            (true, false, _) => Self::Wpa2Enterprise,
            (false, true, true) => Self::Wpa2Wpa3,
            (false, true, false) => Self::Wpa3,
            (false, false, true) => Self::Wpa2,
            (false, false, false) => {
                if desc.contains("wpa") || has_auth("PSK") {
                    Self::Wpa
                } else if desc.contains("wep") {
                    Self::Wep
                } else if desc.trim() == "open" || desc.trim() == "none" {
                    Self::Open
                } else {
                    Self::Unknown
                }
            }
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

/// Security of a logical network: either every member AP agrees, or the
/// network is `mixed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkSecurity {
    Uniform(SecurityType),
    Mixed,
}

impl fmt::Display for NetworkSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform(security) => write!(f, "{security}"),
            Self::Mixed => f.write_str("mixed"),
        }
    }
}

impl Serialize for NetworkSecurity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
