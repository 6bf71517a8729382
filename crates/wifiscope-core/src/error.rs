// ── Core error types ──
//
// Errors surfaced by wifiscope-core. Consumers of published snapshots
// never see these: a failed cycle only flags the retained snapshot as
// stale. Callers of `Monitor::new` / `refresh_now` and config loaders do.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Acquisition errors ───────────────────────────────────────────
    #[error("Scan acquisition failed: {reason}")]
    Acquisition { reason: String },

    #[error("Scan acquisition timed out after {timeout_ms}ms")]
    AcquisitionTimeout { timeout_ms: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Invalid {record}: {reason}")]
    Validation { record: String, reason: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Invalid configuration for {field}: {reason}")]
    Config { field: String, reason: String },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Monitor is already running")]
    AlreadyRunning,

    #[error("A refresh cycle is already in progress")]
    CycleInProgress,

    // ── Output errors ────────────────────────────────────────────────
    #[error("Export failed: {message}")]
    Export { message: String },
}

impl CoreError {
    pub(crate) fn validation(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            record: record.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failure reported by a [`ScanSource`](crate::source::ScanSource).
///
/// Folded into [`CoreError::Acquisition`] by the monitor; never reaches
/// snapshot consumers.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("wireless backend unavailable: {0}")]
    Unavailable(String),

    #[error("interface {interface}: {reason}")]
    Interface { interface: String, reason: String },

    #[error("could not parse scan output: {0}")]
    Parse(String),
}

// ── Conversion from source errors ────────────────────────────────────

impl From<AcquisitionError> for CoreError {
    fn from(err: AcquisitionError) -> Self {
        CoreError::Acquisition {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Export {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        CoreError::Export {
            message: err.to_string(),
        }
    }
}
