// ── Derived insights ──
//
// Higher-level reading of a snapshot: how well the client roams and
// where the surrounding deployment could be improved.

use serde::Serialize;
use strum::Display;

use crate::model::radio::{self, Band};
use crate::model::{CongestionLevel, RoamingEvent};
use crate::snapshot::Snapshot;

/// Signal below which a single-AP network is considered under-covered.
pub const WEAK_COVERAGE_DBM: i32 = -70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoamingQuality {
    NoData,
    Excellent,
    Good,
    Fair,
    Poor,
}

impl RoamingQuality {
    /// Grade an average per-roam signal change in dB.
    pub fn from_signal_change(avg_change: i32) -> Self {
        match avg_change {
            c if c > 10 => Self::Excellent,
            c if c > 0 => Self::Good,
            c if c > -10 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::NoData => "No roaming events recorded",
            Self::Excellent => "Roaming is improving signal quality significantly",
            Self::Good => "Roaming is improving signal quality",
            Self::Fair => "Roaming maintains similar signal quality",
            Self::Poor => "Roaming is degrading signal quality",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoamingAnalysis {
    pub event_count: usize,
    /// Mean `new_signal - previous_signal`, truncated toward zero.
    pub avg_signal_change: i32,
    pub quality: RoamingQuality,
}

pub fn analyze_roaming<'a>(events: impl IntoIterator<Item = &'a RoamingEvent>) -> RoamingAnalysis {
    let (total, count) = events
        .into_iter()
        .fold((0i64, 0i64), |(total, count), e| (total + i64::from(e.signal_delta()), count + 1));

    if count == 0 {
        return RoamingAnalysis {
            event_count: 0,
            avg_signal_change: 0,
            quality: RoamingQuality::NoData,
        };
    }

    let avg = i32::try_from(total / count).unwrap_or_default();
    RoamingAnalysis {
        event_count: usize::try_from(count).unwrap_or_default(),
        avg_signal_change: avg,
        quality: RoamingQuality::from_signal_change(avg),
    }
}

/// Deployment suggestions for the environment in `snapshot`.
///
/// Always returns at least one entry.
pub fn placement_recommendations(snapshot: &Snapshot) -> Vec<String> {
    let mut recommendations = Vec::new();

    for channel in snapshot.channels.iter() {
        if channel.congestion_level >= CongestionLevel::High {
            recommendations.push(format!(
                "Consider switching from channel {} ({}) to a less congested channel",
                channel.channel, channel.band
            ));
        }
    }

    for network in snapshot.networks.iter() {
        if network.best_signal < WEAK_COVERAGE_DBM && network.ap_count == 1 {
            let name = if network.is_hidden() { "<hidden>" } else { network.ssid.as_str() };
            recommendations.push(format!(
                "Network '{name}' has weak signal coverage. Consider adding additional access points"
            ));
        }
    }

    let overlapping_2g = snapshot
        .channels
        .iter()
        .any(|c| c.band == Band::Ghz2_4 && !radio::is_non_overlapping_2g_channel(c.channel));
    if overlapping_2g {
        recommendations.push(
            "Detected overlapping 2.4GHz channels. Use channels 1, 6, or 11 for optimal performance"
                .to_owned(),
        );
    }

    if recommendations.is_empty() {
        recommendations
            .push("No immediate issues detected. Current configuration appears optimal".to_owned());
    }
    recommendations
}

impl Snapshot {
    /// Roaming analysis of the primary interface.
    pub fn roaming_analysis(&self) -> RoamingAnalysis {
        analyze_roaming(self.client.roaming_history.iter())
    }

    pub fn recommendations(&self) -> Vec<String> {
        placement_recommendations(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{ChannelInfo, Network, NetworkChannel, NetworkSecurity, SecurityType};

    fn roam(previous_signal: i32, new_signal: i32) -> RoamingEvent {
        RoamingEvent {
            timestamp: Utc::now(),
            ssid: "Home".into(),
            previous_bssid: "a".into(),
            new_bssid: "b".into(),
            previous_signal,
            new_signal,
            previous_channel: 1,
            new_channel: 6,
        }
    }

    fn channel(ch: u32, band: Band, level: CongestionLevel) -> ChannelInfo {
        ChannelInfo {
            channel: ch,
            frequency: radio::channel_to_frequency(ch, band).unwrap(),
            band,
            network_count: 1,
            ap_count: 1,
            networks: vec!["Home".into()],
            utilization: 0,
            congestion_level: level,
            overlapping_count: 0,
            dfs: false,
        }
    }

    fn network(ssid: &str, best_signal: i32, ap_count: usize) -> Network {
        Network {
            ssid: ssid.into(),
            access_points: Vec::new(),
            best_signal,
            best_signal_ap: "aa:00:00:00:00:01".into(),
            channel: NetworkChannel::Single(6),
            security: NetworkSecurity::Uniform(SecurityType::Wpa2),
            ap_count,
            has_issues: false,
            issue_messages: Vec::new(),
        }
    }

    #[test]
    fn no_events_is_no_data() {
        let analysis = analyze_roaming(std::iter::empty());
        assert_eq!(analysis.quality, RoamingQuality::NoData);
        assert_eq!(analysis.event_count, 0);
    }

    #[test]
    fn quality_grades() {
        assert_eq!(analyze_roaming(&[roam(-70, -50)]).quality, RoamingQuality::Excellent);
        assert_eq!(analyze_roaming(&[roam(-60, -55)]).quality, RoamingQuality::Good);
        assert_eq!(analyze_roaming(&[roam(-60, -60)]).quality, RoamingQuality::Fair);
        assert_eq!(analyze_roaming(&[roam(-50, -70)]).quality, RoamingQuality::Poor);
        assert_eq!(RoamingQuality::from_signal_change(10), RoamingQuality::Good);
        assert_eq!(RoamingQuality::from_signal_change(-10), RoamingQuality::Poor);
    }

    #[test]
    fn average_truncates_toward_zero() {
        let analysis = analyze_roaming(&[roam(-60, -55), roam(-60, -60)]);
        assert_eq!(analysis.event_count, 2);
        assert_eq!(analysis.avg_signal_change, 2);
        assert_eq!(analysis.quality.to_string(), "good");
    }

    #[test]
    fn quiet_environment_gets_default_recommendation() {
        let snapshot = Snapshot {
            channels: Arc::new(vec![channel(6, Band::Ghz2_4, CongestionLevel::Low)]),
            networks: Arc::new(vec![network("Home", -50, 1)]),
            ..Snapshot::empty()
        };
        assert_eq!(
            snapshot.recommendations(),
            vec!["No immediate issues detected. Current configuration appears optimal".to_owned()]
        );
    }

    #[test]
    fn flags_congestion_coverage_and_overlap() {
        let snapshot = Snapshot {
            channels: Arc::new(vec![
                channel(3, Band::Ghz2_4, CongestionLevel::Low),
                channel(36, Band::Ghz5, CongestionLevel::Severe),
            ]),
            networks: Arc::new(vec![network("Garage", -78, 1), network("Office", -78, 3)]),
            ..Snapshot::empty()
        };
        assert_eq!(
            snapshot.recommendations(),
            vec![
                "Consider switching from channel 36 (5GHz) to a less congested channel".to_owned(),
                "Network 'Garage' has weak signal coverage. Consider adding additional access points"
                    .to_owned(),
                "Detected overlapping 2.4GHz channels. Use channels 1, 6, or 11 for optimal performance"
                    .to_owned(),
            ]
        );
    }
}
