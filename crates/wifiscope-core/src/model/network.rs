// ── Logical network (SSID) domain types ──

use serde::{Serialize, Serializer};

use super::access_point::AccessPoint;
use super::security::NetworkSecurity;

/// Primary channel of a network, or `multiple` when member APs disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkChannel {
    Single(u32),
    Multiple,
}

impl NetworkChannel {
    pub fn as_single(self) -> Option<u32> {
        match self {
            Self::Single(ch) => Some(ch),
            Self::Multiple => None,
        }
    }
}

impl std::fmt::Display for NetworkChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(ch) => write!(f, "{ch}"),
            Self::Multiple => f.write_str("multiple"),
        }
    }
}

impl Serialize for NetworkChannel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Single(ch) => serializer.serialize_u32(*ch),
            Self::Multiple => serializer.serialize_str("multiple"),
        }
    }
}

/// APs sharing an SSID, grouped into one logical network.
///
/// Members are ordered by descending signal, then ascending BSSID, so
/// `access_points[0]` is always the best-signal AP.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub ssid: String,
    pub access_points: Vec<AccessPoint>,
    pub best_signal: i32,
    #[serde(rename = "bestSignalAP")]
    pub best_signal_ap: String,
    pub channel: NetworkChannel,
    pub security: NetworkSecurity,
    pub ap_count: usize,
    pub has_issues: bool,
    pub issue_messages: Vec<String>,
}

impl Network {
    pub fn is_hidden(&self) -> bool {
        self.ssid.is_empty()
    }
}
