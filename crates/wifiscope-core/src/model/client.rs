// ── Client link domain types ──

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shared, read-only view of a bounded history buffer.
///
/// Trackers own the buffer and hand out cheap `Arc` clones; a writer that
/// appends while a snapshot still holds the previous view gets a fresh
/// copy (`Arc::make_mut`), so published histories never change.
pub type History<T> = Arc<VecDeque<T>>;

/// One signal sample of the associated link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalDataPoint {
    pub timestamp: DateTime<Utc>,
    /// Signal in dBm.
    pub signal: i32,
    /// Which AP the signal was measured from.
    pub bssid: String,
}

/// A hand-off from one BSSID to another within the same SSID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoamingEvent {
    pub timestamp: DateTime<Utc>,
    pub ssid: String,
    pub previous_bssid: String,
    pub new_bssid: String,
    pub previous_signal: i32,
    pub new_signal: i32,
    pub previous_channel: u32,
    pub new_channel: u32,
}

impl RoamingEvent {
    /// Signal change across the roam in dB (positive = improvement).
    pub fn signal_delta(&self) -> i32 {
        self.new_signal - self.previous_signal
    }
}

/// Current association state of one client radio.
///
/// Replaced wholesale every refresh; `signal_history` and
/// `roaming_history` are filled in by the trackers when a snapshot is
/// composed and are empty on records coming from a scan source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientStats {
    pub interface: String,
    pub connected: bool,

    // Association
    pub ssid: String,
    pub bssid: String,
    /// Frequency in MHz.
    pub frequency: u32,
    pub channel: u32,
    pub channel_width: u32,
    /// 802.11 generation, e.g. "802.11ax".
    pub wifi_standard: String,
    /// Spatial streams, e.g. "2x2".
    pub mimo_config: String,

    // Signal (dBm)
    pub signal: i32,
    pub signal_avg: i32,
    pub noise: i32,
    pub snr: i32,
    pub last_ack_signal: i32,

    // Rates (Mbps)
    pub tx_bitrate: f64,
    pub rx_bitrate: f64,

    // Counters
    pub tx_bytes: u64,
    pub rx_bytes: u64,
    pub tx_packets: u64,
    pub rx_packets: u64,
    pub tx_retries: u64,
    pub tx_failed: u64,
    /// Retries as a percentage of transmitted packets.
    pub retry_rate: f64,
    /// Seconds since association.
    pub connected_time: u64,

    pub signal_history: History<SignalDataPoint>,
    pub roaming_history: History<RoamingEvent>,
}

impl ClientStats {
    /// A disconnected placeholder for an interface that reported nothing.
    pub fn disconnected(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            ..Self::default()
        }
    }
}
