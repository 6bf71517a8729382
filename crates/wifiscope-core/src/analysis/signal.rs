// ── Signal history tracker ──

use chrono::{DateTime, Utc};

use crate::model::{ClientStats, History, SignalDataPoint};
use crate::store::HistoryBuffer;

/// Bounded signal samples of one interface's associated link.
///
/// Disconnected refreshes append nothing, so gaps in the series mark
/// disconnection periods.
#[derive(Debug, Clone)]
pub struct SignalHistoryTracker {
    samples: HistoryBuffer<SignalDataPoint>,
}

impl SignalHistoryTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: HistoryBuffer::new(capacity),
        }
    }

    /// Record a sample if the client is connected. Returns whether one
    /// was appended.
    pub fn observe(&mut self, stats: &ClientStats, at: DateTime<Utc>) -> bool {
        if !stats.connected {
            return false;
        }
        self.samples.push(SignalDataPoint {
            timestamp: at,
            signal: stats.signal,
            bssid: stats.bssid.clone(),
        });
        true
    }

    pub fn history(&self) -> History<SignalDataPoint> {
        self.samples.shared()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
