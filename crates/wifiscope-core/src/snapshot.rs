// ── Snapshot composition and publishing ──
//
// A snapshot is built from exactly one store generation and handed to
// consumers behind an `Arc`. Publishing is a pointer swap; readers never
// block the refresh driver and never see a torn snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::analysis::{TrackedClients, aggregate_networks, analyze_channels};
use crate::config::MonitorConfig;
use crate::model::{Band, ChannelInfo, ClientStats, Network};
use crate::store::Generation;
use crate::stream::SnapshotStream;

/// Immutable, consistent view of the radio environment.
///
/// All fields describe the environment at `published_at` of the
/// generation they were computed from, not at read time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Store generation every field was derived from; `0` before the
    /// first successful cycle.
    pub generation: u64,
    pub published_at: DateTime<Utc>,
    /// Set when the latest cycle(s) failed and this content is retained
    /// from the last good generation.
    pub stale: bool,
    /// Consecutive failed cycles since the last good one.
    pub failed_cycles: u32,
    pub networks: Arc<Vec<Network>>,
    pub channels: Arc<Vec<ChannelInfo>>,
    /// The primary interface.
    pub client: Arc<ClientStats>,
    /// Every tracked interface, primary included.
    pub clients: Arc<Vec<Arc<ClientStats>>>,
}

impl Snapshot {
    /// The placeholder published before the first cycle completes.
    pub fn empty() -> Self {
        Self {
            generation: 0,
            published_at: Utc::now(),
            stale: false,
            failed_cycles: 0,
            networks: Arc::default(),
            channels: Arc::default(),
            client: Arc::default(),
            clients: Arc::default(),
        }
    }

    /// Run the stateless analyses over `generation` and combine them
    /// with the tracker output for the same generation.
    pub fn compose(
        generation: &Generation,
        config: &MonitorConfig,
        tracked: TrackedClients,
    ) -> Self {
        let networks = aggregate_networks(&generation.access_points, &config.issues);
        let channels = analyze_channels(&generation.access_points, config);

        Self {
            generation: generation.number,
            published_at: Utc::now(),
            stale: false,
            failed_cycles: 0,
            networks: Arc::new(networks),
            channels: Arc::new(channels),
            client: tracked.primary,
            clients: Arc::new(tracked.all),
        }
    }

    pub fn network(&self, ssid: &str) -> Option<&Network> {
        self.networks.iter().find(|n| n.ssid == ssid)
    }

    pub fn channel(&self, channel: u32, band: Band) -> Option<&ChannelInfo> {
        self.channels
            .iter()
            .find(|c| c.channel == channel && c.band == band)
    }

    pub fn client_for(&self, interface: &str) -> Option<&Arc<ClientStats>> {
        self.clients.iter().find(|c| c.interface == interface)
    }

    pub fn access_point_count(&self) -> usize {
        self.networks.iter().map(|n| n.ap_count).sum()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Holds the current snapshot and notifies subscribers on every publish.
pub struct SnapshotPublisher {
    current: ArcSwap<Snapshot>,
    tx: watch::Sender<Arc<Snapshot>>,
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        let initial = Arc::new(Snapshot::empty());
        let (tx, _) = watch::channel(Arc::clone(&initial));
        Self {
            current: ArcSwap::new(initial),
            tx,
        }
    }

    /// Make `snapshot` current. A snapshot older than the current one is
    /// discarded so generations are never published out of order.
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let current = self.current.load_full();
        if snapshot.generation < current.generation {
            debug!(
                generation = snapshot.generation,
                current = current.generation,
                "discarding out-of-order snapshot"
            );
            return current;
        }
        self.swap(Arc::new(snapshot))
    }

    /// Re-publish the current content flagged stale after a failed cycle.
    pub fn mark_stale(&self) -> Arc<Snapshot> {
        let current = self.current.load_full();
        let mut next = Snapshot::clone(&current);
        next.stale = true;
        next.failed_cycles = current.failed_cycles.saturating_add(1);
        next.published_at = Utc::now();
        self.swap(Arc::new(next))
    }

    /// The current snapshot (wait-free).
    pub fn load(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.tx.subscribe())
    }

    fn swap(&self, next: Arc<Snapshot>) -> Arc<Snapshot> {
        self.current.store(Arc::clone(&next));
        self.tx.send_replace(Arc::clone(&next));
        next
    }
}

impl Default for SnapshotPublisher {
    fn default() -> Self {
        Self::new()
    }
}
