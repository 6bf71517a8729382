// ── Runtime monitor configuration ──
//
// These types describe *how* a monitor refreshes and classifies.
// They never touch disk: wifiscope-config (or the embedding app)
// constructs a `MonitorConfig` and hands it in.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::CongestionLevel;

/// Cut points for [`CongestionLevel`] classification.
///
/// A channel's level is the worse of its utilization level and its
/// network-count level. Percent thresholds are lower bounds: a channel at
/// exactly `high_pct` is `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CongestionThresholds {
    pub moderate_pct: u8,
    pub high_pct: u8,
    pub severe_pct: u8,
    pub moderate_networks: usize,
    pub high_networks: usize,
    pub severe_networks: usize,
}

impl Default for CongestionThresholds {
    fn default() -> Self {
        Self {
            moderate_pct: 25,
            high_pct: 50,
            severe_pct: 75,
            moderate_networks: 3,
            high_networks: 5,
            severe_networks: 8,
        }
    }
}

impl CongestionThresholds {
    /// Classify a utilization percentage alone.
    pub fn level_for_utilization(&self, utilization_pct: u8) -> CongestionLevel {
        if utilization_pct >= self.severe_pct {
            CongestionLevel::Severe
        } else if utilization_pct >= self.high_pct {
            CongestionLevel::High
        } else if utilization_pct >= self.moderate_pct {
            CongestionLevel::Moderate
        } else {
            CongestionLevel::Low
        }
    }

    /// Classify a co-channel network count alone.
    pub fn level_for_network_count(&self, networks: usize) -> CongestionLevel {
        if networks >= self.severe_networks {
            CongestionLevel::Severe
        } else if networks >= self.high_networks {
            CongestionLevel::High
        } else if networks >= self.moderate_networks {
            CongestionLevel::Moderate
        } else {
            CongestionLevel::Low
        }
    }

    pub fn classify(&self, utilization_pct: u8, networks: usize) -> CongestionLevel {
        self.level_for_utilization(utilization_pct)
            .max(self.level_for_network_count(networks))
    }
}

/// How the per-channel utilization composite is weighted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilizationWeights {
    /// Weight of the averaged BSS Load element (0-255 scale).
    pub bss_load_weight: f64,
    /// Weight of the averaged survey busy fraction.
    pub survey_weight: f64,
    /// Estimate used per co-channel network when no AP reports load or
    /// survey data.
    pub density_per_network_pct: u8,
}

impl Default for UtilizationWeights {
    fn default() -> Self {
        Self {
            bss_load_weight: 0.5,
            survey_weight: 0.5,
            density_per_network_pct: 15,
        }
    }
}

/// Thresholds for the network issue rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueThresholds {
    /// Survey utilization (percent) above which an AP is flagged.
    pub high_utilization_pct: u8,
    /// Associated-station count above which an AP is flagged as crowded.
    pub crowded_stations: u32,
    /// Best signal (dBm) below which a network is flagged as weak.
    pub weak_signal_dbm: i32,
}

impl Default for IssueThresholds {
    fn default() -> Self {
        Self {
            high_utilization_pct: 75,
            crowded_stations: 30,
            weak_signal_dbm: -80,
        }
    }
}

/// Configuration for a single [`Monitor`](crate::Monitor).
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Primary interface exposed as `Snapshot::client`. `None` picks the
    /// first interface the source reports.
    pub interface: Option<String>,
    /// Fixed interval between refresh cycles.
    pub refresh_interval: Duration,
    /// Upper bound on a single acquisition from the scan source.
    pub acquisition_timeout: Duration,
    /// Retained signal samples per interface.
    pub signal_history_capacity: usize,
    /// Retained roaming events per interface.
    pub roaming_history_capacity: usize,
    pub congestion: CongestionThresholds,
    pub utilization: UtilizationWeights,
    pub issues: IssueThresholds,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interface: None,
            refresh_interval: Duration::from_secs(3),
            acquisition_timeout: Duration::from_secs(2),
            signal_history_capacity: 600,
            roaming_history_capacity: 100,
            congestion: CongestionThresholds::default(),
            utilization: UtilizationWeights::default(),
            issues: IssueThresholds::default(),
        }
    }
}

impl MonitorConfig {
    /// Reject settings that cannot be applied safely mid-run.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.refresh_interval.is_zero() {
            return Err(CoreError::config("refresh_interval", "must be non-zero"));
        }
        if self.acquisition_timeout.is_zero() {
            return Err(CoreError::config("acquisition_timeout", "must be non-zero"));
        }
        if self.signal_history_capacity == 0 {
            return Err(CoreError::config("signal_history_capacity", "must be at least 1"));
        }
        if self.roaming_history_capacity == 0 {
            return Err(CoreError::config("roaming_history_capacity", "must be at least 1"));
        }
        if let Some(ref iface) = self.interface {
            if iface.trim().is_empty() {
                return Err(CoreError::config("interface", "must not be blank"));
            }
        }

        let c = &self.congestion;
        if !(c.moderate_pct < c.high_pct && c.high_pct < c.severe_pct && c.severe_pct <= 100) {
            return Err(CoreError::config(
                "congestion",
                format!(
                    "percent thresholds must be strictly ascending and at most 100 (got {}/{}/{})",
                    c.moderate_pct, c.high_pct, c.severe_pct
                ),
            ));
        }
        if !(c.moderate_networks < c.high_networks && c.high_networks < c.severe_networks) {
            return Err(CoreError::config(
                "congestion",
                format!(
                    "network thresholds must be strictly ascending (got {}/{}/{})",
                    c.moderate_networks, c.high_networks, c.severe_networks
                ),
            ));
        }

        let w = &self.utilization;
        if !w.bss_load_weight.is_finite()
            || !w.survey_weight.is_finite()
            || w.bss_load_weight < 0.0
            || w.survey_weight < 0.0
        {
            return Err(CoreError::config("utilization", "weights must be finite and non-negative"));
        }
        if w.bss_load_weight + w.survey_weight <= 0.0 {
            return Err(CoreError::config("utilization", "weights must not both be zero"));
        }
        if w.density_per_network_pct > 100 {
            return Err(CoreError::config(
                "utilization.density_per_network_pct",
                "must be at most 100",
            ));
        }

        if self.issues.high_utilization_pct > 100 {
            return Err(CoreError::config("issues.high_utilization_pct", "must be at most 100"));
        }

        Ok(())
    }
}
