// ── Versioned sample store ──
//
// Holds the latest generation of raw AccessPoint / ClientStats records.
// A whole generation is built off to the side and published with one
// atomic pointer swap, so readers never see a half-applied batch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::model::{AccessPoint, ClientStats};
use crate::source::{normalize_access_point, normalize_client};

/// One consistent point-in-time batch of raw records.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    /// Monotonically increasing; `0` is the empty generation before the
    /// first update.
    pub number: u64,
    pub captured_at: DateTime<Utc>,
    /// Unique by BSSID.
    pub access_points: Vec<AccessPoint>,
    /// At most one record per interface.
    pub clients: IndexMap<String, ClientStats>,
    /// Records rejected by validation while building this generation.
    pub dropped: usize,
}

impl Generation {
    pub fn client(&self, interface: &str) -> Option<&ClientStats> {
        self.clients.get(interface)
    }
}

/// Thread-safe store of the current generation.
///
/// One writer (the refresh driver) and any number of readers. Reads are
/// a wait-free `ArcSwap` load; writes serialise on an internal lock that
/// readers never touch.
pub struct SampleStore {
    current: ArcSwap<Generation>,
    write_lock: Mutex<()>,
    version: watch::Sender<u64>,
}

impl SampleStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        Self {
            current: ArcSwap::from_pointee(Generation::default()),
            write_lock: Mutex::new(()),
            version,
        }
    }

    /// Replace the current generation with a new batch captured now.
    pub fn update(
        &self,
        access_points: Vec<AccessPoint>,
        clients: Vec<ClientStats>,
    ) -> Arc<Generation> {
        self.update_at(access_points, clients, Utc::now())
    }

    /// Replace the current generation with a batch captured at `captured_at`.
    ///
    /// Invalid records are dropped with a logged diagnostic. Duplicate
    /// BSSIDs (or interfaces) keep the last record in the batch.
    /// `last_seen` never moves backwards for a BSSID that was present in
    /// the previous generation.
    pub fn update_at(
        &self,
        access_points: Vec<AccessPoint>,
        clients: Vec<ClientStats>,
        captured_at: DateTime<Utc>,
    ) -> Arc<Generation> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let previous = self.current.load_full();
        let previous_seen: HashMap<&str, DateTime<Utc>> = previous
            .access_points
            .iter()
            .map(|ap| (ap.bssid.as_str(), ap.last_seen))
            .collect();

        let mut dropped = 0usize;

        let mut by_bssid: IndexMap<String, AccessPoint> =
            IndexMap::with_capacity(access_points.len());
        for raw in access_points {
            match normalize_access_point(raw, captured_at) {
                Ok(mut ap) => {
                    if let Some(&seen) = previous_seen.get(ap.bssid.as_str()) {
                        ap.last_seen = ap.last_seen.max(seen);
                    }
                    if by_bssid.insert(ap.bssid.clone(), ap).is_some() {
                        debug!("duplicate bssid in scan batch; keeping the later record");
                    }
                }
                Err(e) => {
                    dropped += 1;
                    warn!(error = %e, "dropping access point record");
                }
            }
        }

        let mut by_interface: IndexMap<String, ClientStats> =
            IndexMap::with_capacity(clients.len());
        for raw in clients {
            match normalize_client(raw) {
                Ok(client) => {
                    by_interface.insert(client.interface.clone(), client);
                }
                Err(e) => {
                    dropped += 1;
                    warn!(error = %e, "dropping client stats record");
                }
            }
        }

        let next = Arc::new(Generation {
            number: previous.number + 1,
            captured_at,
            access_points: by_bssid.into_values().collect(),
            clients: by_interface,
            dropped,
        });

        self.current.store(Arc::clone(&next));
        self.version.send_replace(next.number);
        next
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    /// The current generation (cheap `Arc` clone).
    pub fn current(&self) -> Arc<Generation> {
        self.current.load_full()
    }

    pub fn current_aps(&self) -> Vec<AccessPoint> {
        self.current.load().access_points.clone()
    }

    pub fn current_client(&self, interface: &str) -> Option<ClientStats> {
        self.current.load().client(interface).cloned()
    }

    pub fn generation(&self) -> u64 {
        self.current.load().number
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Watch the generation number; changes once per `update`.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}

impl Default for SampleStore {
    fn default() -> Self {
        Self::new()
    }
}
