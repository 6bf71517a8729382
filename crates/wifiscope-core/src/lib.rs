//! Radio-environment analysis core for Wi-Fi diagnostics.
//!
//! Turns raw 802.11 scan results and client-link statistics into a
//! consistent, continuously refreshed view of the surroundings:
//!
//! - **[`Monitor`]**: Refresh driver and facade. Each cycle acquires one
//!   raw batch from a [`ScanSource`], swaps it into the [`SampleStore`],
//!   runs the analyses and publishes a [`Snapshot`]. Supports periodic
//!   operation ([`start()`](Monitor::start) / [`stop()`](Monitor::stop))
//!   and manual cycles ([`refresh_now()`](Monitor::refresh_now)).
//!
//! - **[`SampleStore`]**: Versioned, generation-swapped storage of raw
//!   `AccessPoint` and `ClientStats` records. Readers never see a
//!   half-applied batch.
//!
//! - **Analysis** ([`analysis`]): SSID aggregation into [`Network`]s,
//!   per-channel congestion ([`ChannelInfo`]), and the per-interface
//!   roaming and signal-history trackers.
//!
//! - **[`Snapshot`]** / **[`SnapshotStream`]**: Immutable published
//!   view, readable wait-free or pushed to subscribers. A failed cycle
//!   re-publishes the previous content flagged `stale`.
//!
//! - **Insights and export** ([`insights`], [`export`]): roaming quality,
//!   deployment recommendations, JSON/CSV reports.

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod insights;
pub mod model;
pub mod monitor;
pub mod snapshot;
pub mod source;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{CongestionThresholds, IssueThresholds, MonitorConfig, UtilizationWeights};
pub use error::{AcquisitionError, CoreError};
pub use export::{ExportFormat, export_client, export_networks};
pub use insights::{RoamingAnalysis, RoamingQuality, analyze_roaming, placement_recommendations};
pub use monitor::{Monitor, MonitorState};
pub use snapshot::{Snapshot, SnapshotPublisher};
pub use source::{RawScan, ScanSource};
pub use store::{Generation, HistoryBuffer, SampleStore};
pub use stream::SnapshotStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AccessPoint, ApFeatures, Band, ChannelInfo, ClientStats, CongestionLevel, History, Network,
    NetworkChannel, NetworkSecurity, RoamingEvent, SecurityType, SignalDataPoint,
};
