// ── Channel congestion domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::radio::Band;

/// Categorical congestion of a channel, ordered from best to worst.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CongestionLevel {
    #[default]
    Low,
    Moderate,
    High,
    Severe,
}

/// Aggregate over every AP sharing one (channel, band).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    pub channel: u32,
    /// Center frequency of the channel in MHz.
    pub frequency: u32,
    pub band: Band,
    /// Distinct SSIDs on the channel (hidden networks count once).
    pub network_count: usize,
    pub ap_count: usize,
    /// Contributing SSIDs, sorted.
    pub networks: Vec<String>,
    /// Composite utilization percentage, 0-100.
    pub utilization: u8,
    pub congestion_level: CongestionLevel,
    /// APs on other channels whose occupied range intersects this channel.
    pub overlapping_count: usize,
    pub dfs: bool,
}
