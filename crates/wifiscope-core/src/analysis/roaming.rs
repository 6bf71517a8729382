// ── Roaming tracker ──
//
// Per-interface link state machine. Only an AP-to-AP hand-off inside one
// SSID counts as a roam; network switches, reconnects and interface
// resets move the state silently.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::model::{ClientStats, History, RoamingEvent};
use crate::store::HistoryBuffer;

/// Last retained association of one interface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Disconnected,
    Connected {
        ssid: String,
        bssid: String,
        signal: i32,
        channel: u32,
    },
}

impl LinkState {
    fn from_stats(stats: &ClientStats) -> Self {
        if stats.connected {
            Self::Connected {
                ssid: stats.ssid.clone(),
                bssid: stats.bssid.clone(),
                signal: stats.signal,
                channel: stats.channel,
            }
        } else {
            Self::Disconnected
        }
    }
}

/// How an observation moved the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTransition {
    /// BSSID changed within the same SSID; the event was recorded.
    Roamed(RoamingEvent),
    /// Associated to a different SSID.
    NetworkSwitch,
    /// Disconnected to connected.
    Associated,
    /// Connected to disconnected.
    Disassociated,
    /// Still on the same BSSID.
    Unchanged,
    /// Still disconnected.
    Idle,
}

#[derive(Debug, Clone)]
pub struct RoamingTracker {
    state: LinkState,
    history: HistoryBuffer<RoamingEvent>,
}

impl RoamingTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: LinkState::Disconnected,
            history: HistoryBuffer::new(capacity),
        }
    }

    /// Feed one refresh's client record. Emits at most one event.
    pub fn observe(&mut self, stats: &ClientStats, at: DateTime<Utc>) -> LinkTransition {
        let next = LinkState::from_stats(stats);

        let transition = match (&self.state, &next) {
            (LinkState::Disconnected, LinkState::Disconnected) => LinkTransition::Idle,
            (LinkState::Disconnected, LinkState::Connected { .. }) => LinkTransition::Associated,
            (LinkState::Connected { .. }, LinkState::Disconnected) => LinkTransition::Disassociated,
            (
                LinkState::Connected {
                    ssid: prev_ssid,
                    bssid: prev_bssid,
                    signal: prev_signal,
                    channel: prev_channel,
                },
                LinkState::Connected {
                    ssid,
                    bssid,
                    signal,
                    channel,
                },
            ) => {
                if prev_ssid != ssid {
                    LinkTransition::NetworkSwitch
                } else if prev_bssid == bssid {
                    LinkTransition::Unchanged
                } else {
                    LinkTransition::Roamed(RoamingEvent {
                        timestamp: at,
                        ssid: ssid.clone(),
                        previous_bssid: prev_bssid.clone(),
                        new_bssid: bssid.clone(),
                        previous_signal: *prev_signal,
                        new_signal: *signal,
                        previous_channel: *prev_channel,
                        new_channel: *channel,
                    })
                }
            }
        };

        match &transition {
            LinkTransition::Roamed(event) => {
                info!(
                    interface = %stats.interface,
                    ssid = %event.ssid,
                    from = %event.previous_bssid,
                    to = %event.new_bssid,
                    signal_delta = event.signal_delta(),
                    "roaming detected"
                );
                self.history.push(event.clone());
            }
            LinkTransition::NetworkSwitch => {
                debug!(
                    interface = %stats.interface,
                    ssid = %stats.ssid,
                    "network switch; not a roam"
                );
            }
            _ => {}
        }

        self.state = next;
        transition
    }

    pub fn state(&self) -> &LinkState {
        &self.state
    }

    pub fn history(&self) -> History<RoamingEvent> {
        self.history.shared()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn connected(ssid: &str, bssid: &str, signal: i32) -> ClientStats {
        ClientStats {
            interface: "wlan0".into(),
            connected: true,
            ssid: ssid.into(),
            bssid: bssid.into(),
            signal,
            channel: 6,
            ..ClientStats::default()
        }
    }

    fn run(tracker: &mut RoamingTracker, samples: &[ClientStats]) -> Vec<LinkTransition> {
        let start = Utc::now();
        samples
            .iter()
            .zip(0i64..)
            .map(|(s, i)| tracker.observe(s, start + Duration::seconds(3 * i)))
            .collect()
    }

    #[test]
    fn a_a_b_b_a_emits_two_events() {
        let mut tracker = RoamingTracker::new(100);
        let seq = [
            connected("Home", "a", -60),
            connected("Home", "a", -65),
            connected("Home", "b", -45),
            connected("Home", "b", -50),
            connected("Home", "a", -55),
        ];
        run(&mut tracker, &seq);

        let history = tracker.history();
        assert_eq!(history.len(), 2);
        assert_eq!((history[0].previous_bssid.as_str(), history[0].new_bssid.as_str()), ("a", "b"));
        assert_eq!((history[0].previous_signal, history[0].new_signal), (-65, -45));
        assert_eq!((history[1].previous_bssid.as_str(), history[1].new_bssid.as_str()), ("b", "a"));
    }

    #[test]
    fn ssid_change_is_not_a_roam() {
        let mut tracker = RoamingTracker::new(100);
        let transitions = run(
            &mut tracker,
            &[connected("Home", "a", -50), connected("Office", "b", -50)],
        );
        assert_eq!(transitions[1], LinkTransition::NetworkSwitch);
        assert!(tracker.history().is_empty());

        // Tracking resumes from the new network.
        run(&mut tracker, &[connected("Office", "c", -40)]);
        assert_eq!(tracker.history().len(), 1);
        assert_eq!(tracker.history()[0].previous_bssid, "b");
    }

    #[test]
    fn reconnect_through_disconnect_is_not_a_roam() {
        let mut tracker = RoamingTracker::new(100);
        let transitions = run(
            &mut tracker,
            &[
                connected("Home", "a", -50),
                ClientStats::disconnected("wlan0"),
                connected("Home", "b", -50),
            ],
        );
        assert_eq!(
            transitions,
            vec![
                LinkTransition::Associated,
                LinkTransition::Disassociated,
                LinkTransition::Associated,
            ]
        );
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn idle_and_unchanged() {
        let mut tracker = RoamingTracker::new(100);
        let transitions = run(
            &mut tracker,
            &[
                ClientStats::disconnected("wlan0"),
                connected("Home", "a", -50),
                connected("Home", "a", -52),
            ],
        );
        assert_eq!(transitions[0], LinkTransition::Idle);
        assert_eq!(transitions[2], LinkTransition::Unchanged);
        assert_eq!(
            tracker.state(),
            &LinkState::Connected {
                ssid: "Home".into(),
                bssid: "a".into(),
                signal: -52,
                channel: 6,
            }
        );
    }

    #[test]
    fn history_is_bounded() {
        let mut tracker = RoamingTracker::new(3);
        let seq: Vec<ClientStats> = (0..10)
            .map(|i| connected("Home", if i % 2 == 0 { "a" } else { "b" }, -50))
            .collect();
        run(&mut tracker, &seq);
        assert_eq!(tracker.history().len(), 3);
    }

    #[test]
    fn published_history_is_not_mutated_by_later_roams() {
        let mut tracker = RoamingTracker::new(10);
        run(&mut tracker, &[connected("Home", "a", -50), connected("Home", "b", -50)]);
        let published = tracker.history();
        run(&mut tracker, &[connected("Home", "a", -50)]);

        assert_eq!(published.len(), 1);
        assert_eq!(tracker.history().len(), 2);
    }
}
