// ── Network aggregation ──
//
// Groups access points by SSID into logical networks and runs the
// issue rules over each group. Single pass over the AP set.

use indexmap::IndexMap;

use crate::config::IssueThresholds;
use crate::model::radio::{self, Band};
use crate::model::{AccessPoint, Network, NetworkChannel, NetworkSecurity, SecurityType};

/// Group `access_points` by SSID.
///
/// Hidden (empty) SSIDs form their own group. The result is ordered by
/// descending best signal, then SSID, so it is deterministic for any
/// input order.
pub fn aggregate_networks(
    access_points: &[AccessPoint],
    issues: &IssueThresholds,
) -> Vec<Network> {
    let mut groups: IndexMap<&str, Vec<&AccessPoint>> = IndexMap::new();
    for ap in access_points {
        groups.entry(ap.ssid.as_str()).or_default().push(ap);
    }

    let mut networks: Vec<Network> = groups
        .into_iter()
        .filter_map(|(ssid, members)| build_network(ssid, members, issues))
        .collect();

    networks.sort_by(|a, b| {
        b.best_signal
            .cmp(&a.best_signal)
            .then_with(|| a.ssid.cmp(&b.ssid))
    });
    networks
}

fn build_network(
    ssid: &str,
    mut members: Vec<&AccessPoint>,
    issues: &IssueThresholds,
) -> Option<Network> {
    // Best signal first; equal signals fall back to the smallest bssid.
    members.sort_by(|a, b| {
        b.signal
            .cmp(&a.signal)
            .then_with(|| a.bssid.cmp(&b.bssid))
    });
    let best = *members.first()?;

    // Channel numbers repeat across bands, so agreement needs both.
    let channel = if members
        .iter()
        .all(|ap| ap.channel == best.channel && ap.band == best.band)
    {
        NetworkChannel::Single(best.channel)
    } else {
        NetworkChannel::Multiple
    };

    let security = collapse_security(&known_security_types(&members));

    let mut network = Network {
        ssid: ssid.to_owned(),
        best_signal: best.signal,
        best_signal_ap: best.bssid.clone(),
        channel,
        security,
        ap_count: members.len(),
        has_issues: false,
        issue_messages: Vec::new(),
        access_points: members.into_iter().cloned().collect(),
    };

    network.issue_messages = detect_issues(&network, best.band, issues);
    network.has_issues = !network.issue_messages.is_empty();
    Some(network)
}

/// Distinct classified security types among `members`, sorted by name.
/// APs whose descriptor could not be classified neither agree nor
/// disagree with the rest.
fn known_security_types(members: &[&AccessPoint]) -> Vec<SecurityType> {
    let mut known: Vec<SecurityType> = members
        .iter()
        .map(|ap| ap.security_type)
        .filter(|t| t.is_known())
        .collect();
    known.sort_by_key(ToString::to_string);
    known.dedup();
    known
}

fn collapse_security(known: &[SecurityType]) -> NetworkSecurity {
    match known {
        [] => NetworkSecurity::Uniform(SecurityType::Unknown),
        [only] => NetworkSecurity::Uniform(*only),
        _ => NetworkSecurity::Mixed,
    }
}

/// Fixed rule set; each triggered rule appends exactly one message.
fn detect_issues(network: &Network, best_band: Band, issues: &IssueThresholds) -> Vec<String> {
    let mut messages = Vec::new();
    let aps = &network.access_points;

    if network.security == NetworkSecurity::Mixed {
        let members: Vec<&AccessPoint> = aps.iter().collect();
        let listed: Vec<String> = known_security_types(&members)
            .iter()
            .map(ToString::to_string)
            .collect();
        messages.push(format!(
            "Security mismatch between APs ({}); possible rogue AP",
            listed.join(", ")
        ));
    }

    let congested = aps
        .iter()
        .filter(|ap| {
            ap.survey_utilization
                .is_some_and(|u| u > issues.high_utilization_pct)
        })
        .count();
    if congested > 0 {
        messages.push(format!(
            "High channel utilization (above {}%) on {congested} AP(s)",
            issues.high_utilization_pct
        ));
    }

    if let Some(crowded) = aps
        .iter()
        .filter(|ap| {
            ap.bss_load_stations
                .is_some_and(|n| n > issues.crowded_stations)
        })
        .max_by_key(|ap| ap.bss_load_stations)
    {
        messages.push(format!(
            "Crowded AP {} ({} stations)",
            crowded.bssid,
            crowded.bss_load_stations.unwrap_or_default()
        ));
    }

    if network.best_signal < issues.weak_signal_dbm {
        messages.push(format!(
            "Weak signal strength (below {} dBm)",
            issues.weak_signal_dbm
        ));
    }

    if let NetworkChannel::Single(ch) = network.channel {
        if best_band == Band::Ghz2_4 && !radio::is_non_overlapping_2g_channel(ch) {
            messages.push(format!("Channel {ch} may overlap with adjacent channels"));
        }
    }

    messages
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    fn ap(bssid: &str, ssid: &str, channel: u32, signal: i32) -> AccessPoint {
        let frequency = radio::channel_to_frequency(channel, Band::Unknown).unwrap();
        AccessPoint {
            bssid: bssid.into(),
            ssid: ssid.into(),
            channel,
            frequency,
            band: Band::from_frequency(frequency),
            signal,
            security_type: SecurityType::Wpa2,
            ..AccessPoint::default()
        }
    }

    fn defaults() -> IssueThresholds {
        IssueThresholds::default()
    }

    #[test]
    fn empty_input_yields_no_networks() {
        assert!(aggregate_networks(&[], &defaults()).is_empty());
    }

    #[test]
    fn home_network_on_two_channels() {
        let aps = vec![
            ap("aa:00:00:00:00:02", "Home", 6, -60),
            ap("aa:00:00:00:00:01", "Home", 1, -40),
        ];
        let networks = aggregate_networks(&aps, &defaults());

        assert_eq!(networks.len(), 1);
        let home = &networks[0];
        assert_eq!(home.ssid, "Home");
        assert_eq!(home.best_signal, -40);
        assert_eq!(home.best_signal_ap, "aa:00:00:00:00:01");
        assert_eq!(home.channel, NetworkChannel::Multiple);
        assert_eq!(home.ap_count, 2);
        assert_eq!(home.security, NetworkSecurity::Uniform(SecurityType::Wpa2));
        assert!(!home.has_issues, "{:?}", home.issue_messages);
    }

    #[test]
    fn partition_covers_every_ap_exactly_once() {
        let aps = vec![
            ap("aa:00:00:00:00:01", "Home", 1, -40),
            ap("aa:00:00:00:00:02", "Office", 6, -70),
            ap("aa:00:00:00:00:03", "", 11, -55),
            ap("aa:00:00:00:00:04", "Home", 36, -65),
            ap("aa:00:00:00:00:05", "", 1, -80),
            ap("aa:00:00:00:00:06", "Cafe", 149, -50),
        ];
        let networks = aggregate_networks(&aps, &defaults());

        let mut seen = HashSet::new();
        for network in &networks {
            assert_eq!(network.ap_count, network.access_points.len());
            for member in &network.access_points {
                assert_eq!(member.ssid, network.ssid);
                assert!(seen.insert(member.bssid.clone()), "duplicate {}", member.bssid);
            }
        }
        assert_eq!(seen.len(), aps.len());
    }

    #[test]
    fn hidden_ssids_form_their_own_group() {
        let aps = vec![
            ap("aa:00:00:00:00:01", "", 1, -40),
            ap("aa:00:00:00:00:02", "", 1, -50),
            ap("aa:00:00:00:00:03", "Home", 1, -45),
        ];
        let networks = aggregate_networks(&aps, &defaults());
        let hidden = networks.iter().find(|n| n.is_hidden()).unwrap();
        assert_eq!(hidden.ap_count, 2);
        assert_eq!(hidden.channel, NetworkChannel::Single(1));
    }

    #[test]
    fn best_signal_tie_breaks_on_smallest_bssid() {
        let aps = vec![
            ap("aa:00:00:00:00:09", "Home", 6, -50),
            ap("aa:00:00:00:00:03", "Home", 6, -50),
            ap("aa:00:00:00:00:05", "Home", 6, -70),
        ];
        let home = &aggregate_networks(&aps, &defaults())[0];
        assert_eq!(home.best_signal, -50);
        assert_eq!(home.best_signal_ap, "aa:00:00:00:00:03");
        assert_eq!(home.access_points[0].bssid, "aa:00:00:00:00:03");
        assert_eq!(home.channel, NetworkChannel::Single(6));
    }

    #[test]
    fn ordered_by_descending_best_signal() {
        let aps = vec![
            ap("aa:00:00:00:00:01", "Weak", 1, -75),
            ap("aa:00:00:00:00:02", "Strong", 6, -35),
            ap("aa:00:00:00:00:03", "Mid", 11, -55),
        ];
        let order: Vec<String> = aggregate_networks(&aps, &defaults())
            .into_iter()
            .map(|n| n.ssid)
            .collect();
        assert_eq!(order, vec!["Strong", "Mid", "Weak"]);
    }

    #[test]
    fn security_mismatch_is_flagged_as_mixed() {
        let mut rogue = ap("aa:00:00:00:00:02", "Home", 6, -60);
        rogue.security_type = SecurityType::Open;
        let aps = vec![ap("aa:00:00:00:00:01", "Home", 6, -40), rogue];

        let home = &aggregate_networks(&aps, &defaults())[0];
        assert_eq!(home.security, NetworkSecurity::Mixed);
        assert!(home.has_issues);
        assert_eq!(home.issue_messages.len(), 1);
        assert!(home.issue_messages[0].starts_with("Security mismatch"));
    }

    #[test]
    fn unclassified_security_does_not_count_as_mismatch() {
        let mut unknown = ap("aa:00:00:00:00:02", "Home", 6, -60);
        unknown.security_type = SecurityType::Unknown;
        let aps = vec![ap("aa:00:00:00:00:01", "Home", 6, -40), unknown];

        let home = &aggregate_networks(&aps, &defaults())[0];
        assert_eq!(home.security, NetworkSecurity::Uniform(SecurityType::Wpa2));
        assert!(!home.has_issues, "{:?}", home.issue_messages);
    }

    #[test]
    fn mixed_security_always_raises_the_mismatch_issue() {
        let mut open = ap("aa:00:00:00:00:02", "Home", 6, -60);
        open.security_type = SecurityType::Open;
        let mut unknown = ap("aa:00:00:00:00:03", "Home", 6, -70);
        unknown.security_type = SecurityType::Unknown;
        let aps = vec![ap("aa:00:00:00:00:01", "Home", 6, -40), open, unknown];

        let home = &aggregate_networks(&aps, &defaults())[0];
        assert_eq!(home.security, NetworkSecurity::Mixed);
        assert_eq!(
            home.issue_messages,
            vec!["Security mismatch between APs (Open, WPA2); possible rogue AP".to_owned()]
        );
    }

    #[test]
    fn all_unclassified_security_is_uniform_unknown() {
        let mut a = ap("aa:00:00:00:00:01", "Home", 6, -40);
        a.security_type = SecurityType::Unknown;
        let mut b = ap("aa:00:00:00:00:02", "Home", 6, -50);
        b.security_type = SecurityType::Unknown;

        let home = &aggregate_networks(&[a, b], &defaults())[0];
        assert_eq!(home.security, NetworkSecurity::Uniform(SecurityType::Unknown));
        assert!(!home.has_issues);
    }

    #[test]
    fn same_channel_number_on_different_bands_is_multiple() {
        let mut six_ghz = ap("aa:00:00:00:00:02", "Home", 1, -60);
        six_ghz.band = Band::Ghz6;
        six_ghz.frequency = radio::channel_to_frequency(1, Band::Ghz6).unwrap();
        let aps = vec![ap("aa:00:00:00:00:01", "Home", 1, -40), six_ghz];

        let home = &aggregate_networks(&aps, &defaults())[0];
        assert_eq!(home.channel, NetworkChannel::Multiple);
    }

    #[test]
    fn utilization_and_crowding_rules() {
        let mut busy = ap("aa:00:00:00:00:01", "Home", 6, -40);
        busy.survey_utilization = Some(90);
        let mut crowded = ap("aa:00:00:00:00:02", "Home", 6, -50);
        crowded.bss_load_stations = Some(42);
        crowded.survey_utilization = Some(75);

        let home = &aggregate_networks(&[busy, crowded], &defaults())[0];
        assert_eq!(
            home.issue_messages,
            vec![
                "High channel utilization (above 75%) on 1 AP(s)".to_owned(),
                "Crowded AP aa:00:00:00:00:02 (42 stations)".to_owned(),
            ]
        );
    }

    #[test]
    fn weak_signal_and_overlapping_channel_rules() {
        let aps = vec![ap("aa:00:00:00:00:01", "Far", 3, -85)];
        let far = &aggregate_networks(&aps, &defaults())[0];
        assert_eq!(
            far.issue_messages,
            vec![
                "Weak signal strength (below -80 dBm)".to_owned(),
                "Channel 3 may overlap with adjacent channels".to_owned(),
            ]
        );
    }

    #[test]
    fn five_ghz_channels_are_not_flagged_for_overlap() {
        let aps = vec![ap("aa:00:00:00:00:01", "Fast", 40, -50)];
        assert!(!aggregate_networks(&aps, &defaults())[0].has_issues);
    }

    #[test]
    fn thresholds_are_configurable() {
        let strict = IssueThresholds {
            weak_signal_dbm: -45,
            ..IssueThresholds::default()
        };
        let aps = vec![ap("aa:00:00:00:00:01", "Home", 6, -50)];
        assert!(aggregate_networks(&aps, &strict)[0].has_issues);
        assert!(!aggregate_networks(&aps, &defaults())[0].has_issues);
    }
}
