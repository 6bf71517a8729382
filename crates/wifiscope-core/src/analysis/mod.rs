// ── Derived-state analysis ──
//
// Pure recomputation from one store generation (aggregation, channels)
// plus the stateful per-interface trackers (roaming, signal history).

pub mod aggregate;
pub mod channels;
pub mod roaming;
pub mod signal;
pub mod trackers;

pub use aggregate::aggregate_networks;
pub use channels::analyze_channels;
pub use roaming::{LinkState, LinkTransition, RoamingTracker};
pub use signal::SignalHistoryTracker;
pub use trackers::{TrackedClients, TrackerSet};
