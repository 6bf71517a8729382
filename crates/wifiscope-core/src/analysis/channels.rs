// ── Channel analysis ──
//
// Buckets access points by (channel, band) and derives utilization,
// congestion level and adjacent-channel overlap for each bucket.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{CongestionThresholds, MonitorConfig, UtilizationWeights};
use crate::model::radio::{self, Band};
use crate::model::{AccessPoint, ChannelInfo};

/// Per-channel congestion for the given AP set, ordered by channel
/// number (then band).
///
/// Survey busy time is measured against the configured refresh interval.
pub fn analyze_channels(access_points: &[AccessPoint], config: &MonitorConfig) -> Vec<ChannelInfo> {
    let window_ms = u64::try_from(config.refresh_interval.as_millis()).unwrap_or(u64::MAX);

    let mut buckets: BTreeMap<(u32, Band), Vec<&AccessPoint>> = BTreeMap::new();
    for ap in access_points {
        buckets.entry((ap.channel, ap.band)).or_default().push(ap);
    }

    buckets
        .iter()
        .map(|(&(channel, band), members)| {
            let overlapping_count = count_overlapping(channel, band, members, access_points);
            build_channel(
                channel,
                band,
                members,
                overlapping_count,
                &config.congestion,
                &config.utilization,
                window_ms,
            )
        })
        .collect()
}

fn build_channel(
    channel: u32,
    band: Band,
    members: &[&AccessPoint],
    overlapping_count: usize,
    thresholds: &CongestionThresholds,
    weights: &UtilizationWeights,
    window_ms: u64,
) -> ChannelInfo {
    let networks: BTreeSet<&str> = members.iter().map(|ap| ap.ssid.as_str()).collect();
    let network_count = networks.len();

    let frequency = radio::channel_to_frequency(channel, band)
        .or_else(|| members.first().map(|ap| ap.frequency))
        .unwrap_or_default();

    let utilization = utilization(members, weights, window_ms, network_count);

    ChannelInfo {
        channel,
        frequency,
        band,
        network_count,
        ap_count: members.len(),
        networks: networks.into_iter().map(str::to_owned).collect(),
        utilization,
        congestion_level: thresholds.classify(utilization, network_count),
        overlapping_count,
        dfs: members.iter().any(|ap| ap.dfs),
    }
}

/// Weighted mean of the average BSS-load fraction and the average survey
/// busy fraction, over whichever of the two is reported. With neither,
/// falls back to a density estimate from the network count.
fn utilization(
    members: &[&AccessPoint],
    weights: &UtilizationWeights,
    window_ms: u64,
    network_count: usize,
) -> u8 {
    let bss_load = mean(members.iter().filter_map(|ap| ap.bss_load_fraction()));
    let survey = mean(
        members
            .iter()
            .filter_map(|ap| ap.survey_fraction(window_ms)),
    );

    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    if let Some(avg) = bss_load {
        weighted += avg * weights.bss_load_weight;
        total_weight += weights.bss_load_weight;
    }
    if let Some(avg) = survey {
        weighted += avg * weights.survey_weight;
        total_weight += weights.survey_weight;
    }

    if total_weight > 0.0 {
        let pct = (weighted / total_weight * 100.0).round().clamp(0.0, 100.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = pct as u8;
        return pct;
    }

    let estimate = usize::from(weights.density_per_network_pct).saturating_mul(network_count);
    u8::try_from(estimate.min(100)).unwrap_or(100)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0u32), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / f64::from(count))
}

/// APs on a different (channel, band) whose occupied range intersects
/// the range of any AP in this bucket.
///
/// Members share one center frequency, so their ranges are nested and
/// the widest one stands in for all of them.
fn count_overlapping(
    channel: u32,
    band: Band,
    members: &[&AccessPoint],
    access_points: &[AccessPoint],
) -> usize {
    let Some(widest) = members
        .iter()
        .map(|ap| ap.occupied_range())
        .max_by_key(|(lo, hi)| hi - lo)
    else {
        return 0;
    };

    access_points
        .iter()
        .filter(|ap| ap.channel != channel || ap.band != band)
        .filter(|ap| radio::ranges_overlap(widest, ap.occupied_range()))
        .count()
}
