// ── Per-interface tracker set ──
//
// Owns the roaming and signal trackers for every interface seen so far
// and stitches their histories onto each generation's client records.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::roaming::{LinkTransition, RoamingTracker};
use super::signal::SignalHistoryTracker;
use crate::config::MonitorConfig;
use crate::model::{ClientStats, RoamingEvent};
use crate::store::Generation;

#[derive(Debug, Clone)]
struct InterfaceTrackers {
    roaming: RoamingTracker,
    signal: SignalHistoryTracker,
}

/// Client records of one cycle with their histories attached.
#[derive(Debug, Clone)]
pub struct TrackedClients {
    /// The primary interface. Synthesised as disconnected when the
    /// source reported nothing for it.
    pub primary: Arc<ClientStats>,
    /// Every tracked interface, in first-seen order.
    pub all: Vec<Arc<ClientStats>>,
    /// Roams detected in this cycle.
    pub roams: Vec<RoamingEvent>,
}

#[derive(Debug)]
pub struct TrackerSet {
    configured_primary: Option<String>,
    primary: Option<String>,
    signal_capacity: usize,
    roaming_capacity: usize,
    by_interface: IndexMap<String, InterfaceTrackers>,
}

impl TrackerSet {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            configured_primary: config.interface.clone(),
            primary: config.interface.clone(),
            signal_capacity: config.signal_history_capacity,
            roaming_capacity: config.roaming_history_capacity,
            by_interface: IndexMap::new(),
        }
    }

    /// Advance every interface's trackers by one generation.
    ///
    /// Interfaces tracked earlier but missing from `generation` are
    /// observed as disconnected.
    pub fn observe(&mut self, generation: &Generation) -> TrackedClients {
        let at = generation.captured_at;

        if self.primary.is_none() {
            self.primary = self
                .configured_primary
                .clone()
                .or_else(|| generation.clients.keys().next().cloned());
        }

        for name in generation.clients.keys() {
            self.ensure(name);
        }
        if let Some(primary) = self.primary.clone() {
            self.ensure(&primary);
        }

        let mut roams = Vec::new();
        let mut all = Vec::with_capacity(self.by_interface.len());
        for (name, trackers) in &mut self.by_interface {
            let stats = generation
                .client(name)
                .cloned()
                .unwrap_or_else(|| ClientStats::disconnected(name.clone()));
            let (tracked, roam) = observe_one(trackers, stats, at);
            roams.extend(roam);
            all.push(Arc::new(tracked));
        }

        let primary = self
            .primary
            .as_deref()
            .and_then(|p| all.iter().find(|c| c.interface == p))
            .cloned()
            .unwrap_or_else(|| Arc::new(ClientStats::default()));

        TrackedClients {
            primary,
            all,
            roams,
        }
    }

    /// Name of the primary interface, once known.
    pub fn primary_interface(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    fn ensure(&mut self, name: &str) {
        if !self.by_interface.contains_key(name) {
            self.by_interface.insert(
                name.to_owned(),
                InterfaceTrackers {
                    roaming: RoamingTracker::new(self.roaming_capacity),
                    signal: SignalHistoryTracker::new(self.signal_capacity),
                },
            );
        }
    }
}

fn observe_one(
    trackers: &mut InterfaceTrackers,
    mut stats: ClientStats,
    at: DateTime<Utc>,
) -> (ClientStats, Option<RoamingEvent>) {
    let roam = match trackers.roaming.observe(&stats, at) {
        LinkTransition::Roamed(event) => Some(event),
        _ => None,
    };
    trackers.signal.observe(&stats, at);

    stats.signal_history = trackers.signal.history();
    stats.roaming_history = trackers.roaming.history();
    (stats, roam)
}
