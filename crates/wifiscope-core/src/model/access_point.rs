// ── Access point domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::radio::{self, Band};
use super::security::SecurityType;

/// Optional 802.11 features advertised in a BSS's beacon/probe response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApFeatures {
    /// 802.11v BSS Transition Management.
    #[serde(rename = "bsstransition")]
    pub bss_transition: bool,
    #[serde(rename = "uapsd")]
    pub uapsd: bool,
    /// 802.11r Fast BSS Transition.
    #[serde(rename = "fastroaming")]
    pub fast_roaming: bool,
    #[serde(rename = "wps")]
    pub wps: bool,
    #[serde(rename = "twtSupport")]
    pub twt_support: bool,
    #[serde(rename = "mumimo")]
    pub mu_mimo: bool,
    #[serde(rename = "qosSupport")]
    pub qos_support: bool,
    /// Spatial reuse (OBSS PD).
    #[serde(rename = "obssPD")]
    pub obss_pd: bool,
    /// 802.11k Neighbor Report.
    #[serde(rename = "neighborReport")]
    pub neighbor_report: bool,
}

/// One observed BSS at one point in time.
///
/// Fields the driver cannot report use explicit sentinels: `0` for
/// frequency/channel/width/noise, `None` for load and survey metrics.
/// Records are normalised once at the acquisition boundary (see
/// [`source::normalize_access_point`](crate::source::normalize_access_point));
/// analysis code never re-derives band or channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessPoint {
    pub bssid: String,
    pub ssid: String,
    pub vendor: String,

    // Radio
    pub frequency: u32,
    pub channel: u32,
    pub channel_width: u32,
    pub band: Band,
    pub dfs: bool,

    // Signal
    pub signal: i32,
    pub noise: i32,
    pub signal_quality: u8,
    pub snr: i32,
    pub tx_power: i32,

    // Security
    pub security: String,
    pub security_type: SecurityType,
    pub security_ciphers: Vec<String>,
    pub auth_methods: Vec<String>,
    /// Protected Management Frames: "Required", "Optional", "Disabled" or empty.
    pub pmf: String,

    #[serde(flatten)]
    pub features: ApFeatures,

    // BSS Load element
    pub bss_load_stations: Option<u32>,
    /// Channel utilization on the 0-255 scale of the BSS Load element.
    pub bss_load_utilization: Option<u8>,

    // Channel survey
    /// Busy percentage reported by the channel survey.
    pub survey_utilization: Option<u8>,
    pub survey_busy_ms: Option<u64>,
    pub survey_ext_busy_ms: Option<u64>,

    pub last_seen: DateTime<Utc>,
}

impl AccessPoint {
    /// Whether the SSID is hidden (not broadcast).
    pub fn is_hidden(&self) -> bool {
        self.ssid.is_empty()
    }

    /// Frequency span this BSS occupies, `[low, high)` in MHz.
    pub fn occupied_range(&self) -> (u32, u32) {
        radio::occupied_range(self.frequency, self.channel_width)
    }

    /// BSS Load utilization as a fraction in `[0, 1]`.
    pub fn bss_load_fraction(&self) -> Option<f64> {
        self.bss_load_utilization.map(|u| f64::from(u) / 255.0)
    }

    /// Survey busy fraction in `[0, 1]` for a measurement window of
    /// `window_ms`. Falls back to `survey_utilization` when the driver
    /// reports a percentage but no busy time.
    pub fn survey_fraction(&self, window_ms: u64) -> Option<f64> {
        match (self.survey_busy_ms, self.survey_utilization) {
            (Some(busy), _) if window_ms > 0 => {
                #[allow(clippy::cast_precision_loss)]
                let fraction = busy as f64 / window_ms as f64;
                Some(fraction.clamp(0.0, 1.0))
            }
            (_, Some(pct)) => Some((f64::from(pct) / 100.0).clamp(0.0, 1.0)),
            _ => None,
        }
    }
}
