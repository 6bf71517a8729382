// ── Monitor ──
//
// Refresh driver and public facade. Each cycle acquires one raw batch,
// swaps it into the sample store, advances the trackers and publishes a
// snapshot built from that single generation.

use std::sync::Arc;

use strum::Display;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::analysis::TrackerSet;
use crate::config::MonitorConfig;
use crate::error::CoreError;
use crate::model::RoamingEvent;
use crate::snapshot::{Snapshot, SnapshotPublisher};
use crate::source::ScanSource;
use crate::store::{Generation, SampleStore};
use crate::stream::SnapshotStream;

const ROAMING_CHANNEL_SIZE: usize = 64;

// ── MonitorState ─────────────────────────────────────────────────

/// Lifecycle state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MonitorState {
    /// Created, never started.
    Idle,
    Running,
    Stopped,
}

// ── Monitor ──────────────────────────────────────────────────────

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc<MonitorInner>`. Owns the sample store,
/// the trackers and the snapshot publisher; the scan source is the only
/// external collaborator.
pub struct Monitor<S: ScanSource> {
    inner: Arc<MonitorInner<S>>,
}

impl<S: ScanSource> Clone for Monitor<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct MonitorInner<S: ScanSource> {
    config: MonitorConfig,
    source: S,
    store: SampleStore,
    publisher: SnapshotPublisher,
    /// Held for the whole cycle; a second cycle that cannot take it is
    /// skipped rather than queued.
    trackers: Mutex<TrackerSet>,
    state: watch::Sender<MonitorState>,
    roaming_tx: broadcast::Sender<RoamingEvent>,
    cancel: CancellationToken,
    /// Child token for the current run. Cancelled on stop, replaced on
    /// the next start.
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<S: ScanSource> Monitor<S> {
    /// Create a monitor. Does NOT start the refresh driver; call
    /// [`start()`](Self::start), or drive cycles manually with
    /// [`refresh_now()`](Self::refresh_now).
    ///
    /// Rejects an invalid configuration.
    pub fn new(config: MonitorConfig, source: S) -> Result<Self, CoreError> {
        config.validate()?;

        let (state, _) = watch::channel(MonitorState::Idle);
        let (roaming_tx, _) = broadcast::channel(ROAMING_CHANNEL_SIZE);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();
        let trackers = TrackerSet::new(&config);

        Ok(Self {
            inner: Arc::new(MonitorInner {
                config,
                source,
                store: SampleStore::new(),
                publisher: SnapshotPublisher::new(),
                trackers: Mutex::new(trackers),
                state,
                roaming_tx,
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    /// The raw generation the current snapshot was built from, or a newer
    /// one if a cycle is mid-flight.
    pub fn current_generation(&self) -> Arc<Generation> {
        self.inner.store.current()
    }

    /// Number of the latest stored generation; `0` before the first
    /// successful cycle.
    pub fn generation(&self) -> u64 {
        self.inner.store.generation()
    }

    /// Watch the store's generation number.
    pub fn subscribe_generations(&self) -> watch::Receiver<u64> {
        self.inner.store.subscribe()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Spawn the periodic refresh driver. The first cycle runs
    /// immediately.
    pub async fn start(&self) -> Result<(), CoreError> {
        let mut handles = self.inner.task_handles.lock().await;
        if *self.inner.state.borrow() == MonitorState::Running {
            return Err(CoreError::AlreadyRunning);
        }

        let cancel = {
            let mut child = self.inner.cancel_child.lock().await;
            if child.is_cancelled() {
                *child = self.inner.cancel.child_token();
            }
            child.clone()
        };

        handles.push(tokio::spawn(refresh_task(self.clone(), cancel)));
        self.inner.state.send_replace(MonitorState::Running);
        info!(
            interval_ms = duration_ms(self.inner.config.refresh_interval),
            "monitor started"
        );
        Ok(())
    }

    /// Stop the refresh driver. An in-flight cycle runs to completion
    /// and publishes before this returns.
    pub async fn stop(&self) {
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "refresh task ended abnormally");
            }
        }

        if *self.inner.state.borrow() == MonitorState::Running {
            self.inner.state.send_replace(MonitorState::Stopped);
            info!("monitor stopped");
        }
    }

    /// Run one cycle now, outside the periodic schedule.
    ///
    /// Returns `CycleInProgress` if another cycle holds the driver, and
    /// the acquisition error if the source failed or timed out; in that
    /// case the previous snapshot stays current, flagged stale.
    pub async fn refresh_now(&self) -> Result<Arc<Snapshot>, CoreError> {
        self.run_cycle().await
    }

    async fn run_cycle(&self) -> Result<Arc<Snapshot>, CoreError> {
        let Ok(mut trackers) = self.inner.trackers.try_lock() else {
            return Err(CoreError::CycleInProgress);
        };

        let config = &self.inner.config;
        let acquisition =
            tokio::time::timeout(config.acquisition_timeout, self.inner.source.acquire());
        let scan = match acquisition.await {
            Ok(Ok(scan)) => scan,
            Ok(Err(e)) => return Err(self.cycle_failed(e.into())),
            Err(_) => {
                let timeout_ms = duration_ms(config.acquisition_timeout);
                return Err(self.cycle_failed(CoreError::AcquisitionTimeout { timeout_ms }));
            }
        };

        let generation = self.inner.store.update(scan.access_points, scan.clients);
        let tracked = trackers.observe(&generation);
        let roams = tracked.roams.clone();
        let snapshot = self
            .inner
            .publisher
            .publish(Snapshot::compose(&generation, config, tracked));

        for event in roams {
            // No receivers is fine.
            let _ = self.inner.roaming_tx.send(event);
        }

        debug!(
            generation = snapshot.generation,
            access_points = generation.access_points.len(),
            dropped = generation.dropped,
            networks = snapshot.networks.len(),
            channels = snapshot.channels.len(),
            "refresh cycle complete"
        );
        Ok(snapshot)
    }

    fn cycle_failed(&self, err: CoreError) -> CoreError {
        let stale = self.inner.publisher.mark_stale();
        warn!(
            error = %err,
            failed_cycles = stale.failed_cycles,
            generation = stale.generation,
            "scan acquisition failed; keeping previous snapshot"
        );
        err
    }

    // ── Consumer access ──────────────────────────────────────────

    /// The current snapshot (wait-free).
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.publisher.load()
    }

    /// Subscribe to snapshot publications.
    pub fn subscribe(&self) -> SnapshotStream {
        self.inner.publisher.subscribe()
    }

    /// Subscribe to roaming events as they are detected, on any
    /// interface.
    pub fn roaming_events(&self) -> broadcast::Receiver<RoamingEvent> {
        self.inner.roaming_tx.subscribe()
    }

    pub fn state(&self) -> watch::Receiver<MonitorState> {
        self.inner.state.subscribe()
    }

    pub fn is_running(&self) -> bool {
        *self.inner.state.borrow() == MonitorState::Running
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically run a cycle until cancelled. Ticks that fire while a
/// cycle is still running are dropped, not queued: the next cycle starts
/// on the first tick scheduled after the previous one finished.
async fn refresh_task<S: ScanSource>(monitor: Monitor<S>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(monitor.inner.config.refresh_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_finished: Option<Instant> = None;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            scheduled = interval.tick() => {
                if last_finished.is_some_and(|finished| scheduled < finished) {
                    debug!("tick fired during the previous cycle; dropped");
                } else {
                    match monitor.run_cycle().await {
                        Ok(_) => {}
                        Err(CoreError::CycleInProgress) => {
                            debug!("cycle still running; tick skipped");
                        }
                        Err(e) => debug!(error = %e, "periodic refresh skipped"),
                    }
                    last_finished = Some(Instant::now());
                }
            }
        }
    }
}

fn duration_ms(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
