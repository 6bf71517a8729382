// ── Radio environment domain model ──
//
// Raw records (AccessPoint, ClientStats) as delivered by a scan source,
// and the derived aggregates (Network, ChannelInfo) recomputed each cycle.

pub mod access_point;
pub mod channel;
pub mod client;
pub mod network;
pub mod radio;
pub mod security;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use wifiscope_core::model::*` gives you everything.

pub use access_point::{AccessPoint, ApFeatures};
pub use channel::{ChannelInfo, CongestionLevel};
pub use client::{ClientStats, History, RoamingEvent, SignalDataPoint};
pub use network::{Network, NetworkChannel};
pub use radio::Band;
pub use security::{NetworkSecurity, SecurityType};
