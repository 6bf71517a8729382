//! Configuration for wifiscope monitors.
//!
//! TOML file + environment loading and translation to
//! `wifiscope_core::MonitorConfig`. Invalid settings are rejected here,
//! at startup, never mid-run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wifiscope_core::{
    CongestionThresholds, CoreError, IssueThresholds, MonitorConfig, UtilizationWeights,
};

/// Prefix for environment overrides. Nested keys use `__`, e.g.
/// `WIFISCOPE_CONGESTION__HIGH_PCT=60`.
pub const ENV_PREFIX: &str = "WIFISCOPE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<CoreError> for ConfigError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { field, reason } => Self::Validation { field, reason },
            other => Self::Validation {
                field: "config".into(),
                reason: other.to_string(),
            },
        }
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// On-disk configuration. Every field is optional in the file; missing
/// ones take the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Primary interface; unset picks the first one the scanner reports.
    pub interface: Option<String>,

    pub refresh_interval_ms: u64,

    pub acquisition_timeout_ms: u64,

    /// Signal samples retained per interface.
    pub signal_history_capacity: usize,

    /// Roaming events retained per interface.
    pub roaming_history_capacity: usize,

    pub congestion: CongestionThresholds,

    pub utilization: UtilizationWeights,

    pub issues: IssueThresholds,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = MonitorConfig::default();
        Self {
            interface: defaults.interface,
            refresh_interval_ms: duration_ms(defaults.refresh_interval),
            acquisition_timeout_ms: duration_ms(defaults.acquisition_timeout),
            signal_history_capacity: defaults.signal_history_capacity,
            roaming_history_capacity: defaults.roaming_history_capacity,
            congestion: defaults.congestion,
            utilization: defaults.utilization,
            issues: defaults.issues,
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl Config {
    /// Translate to a validated `MonitorConfig`.
    pub fn to_monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        let interface = self
            .interface
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        let config = MonitorConfig {
            interface,
            refresh_interval: Duration::from_millis(self.refresh_interval_ms),
            acquisition_timeout: Duration::from_millis(self.acquisition_timeout_ms),
            signal_history_capacity: self.signal_history_capacity,
            roaming_history_capacity: self.roaming_history_capacity,
            congestion: self.congestion,
            utilization: self.utilization,
            issues: self.issues,
        };
        config.validate()?;

        if config.acquisition_timeout > config.refresh_interval {
            return Err(ConfigError::Validation {
                field: "acquisition_timeout_ms".into(),
                reason: format!(
                    "must not exceed refresh_interval_ms ({} > {})",
                    self.acquisition_timeout_ms, self.refresh_interval_ms
                ),
            });
        }

        Ok(config)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "wifiscope", "wifiscope").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("wifiscope");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + environment. A missing file yields the
/// defaults (plus any environment overrides).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load and validate in one step.
pub fn load_monitor_config() -> Result<MonitorConfig, ConfigError> {
    load_config()?.to_monitor_config()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_match_monitor_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.refresh_interval_ms, 3000);
        assert_eq!(cfg.acquisition_timeout_ms, 2000);
        assert_eq!(cfg.signal_history_capacity, 600);
        assert_eq!(cfg.roaming_history_capacity, 100);
        assert_eq!(cfg.congestion.severe_pct, 75);
        assert_eq!(cfg.issues.weak_signal_dbm, -80);
        assert_eq!(cfg.to_monitor_config().unwrap(), MonitorConfig::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
interface = "wlan1"
refresh_interval_ms = 5000

[congestion]
high_pct = 60

[issues]
crowded_stations = 20
"#,
        );

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.interface.as_deref(), Some("wlan1"));
        assert_eq!(cfg.refresh_interval_ms, 5000);
        assert_eq!(cfg.congestion.high_pct, 60);
        assert_eq!(cfg.congestion.moderate_pct, 25);
        assert_eq!(cfg.issues.crowded_stations, 20);
        assert_eq!(cfg.issues.weak_signal_dbm, -80);

        let monitor = cfg.to_monitor_config().unwrap();
        assert_eq!(monitor.refresh_interval, Duration::from_secs(5));
        assert_eq!(monitor.interface.as_deref(), Some("wlan1"));
    }

    #[test]
    fn invalid_values_are_rejected_at_conversion() {
        let cfg = Config {
            refresh_interval_ms: 0,
            ..Config::default()
        };
        let err = cfg.to_monitor_config().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation { ref field, .. } if field == "refresh_interval"
        ));

        let cfg = Config {
            acquisition_timeout_ms: 10_000,
            ..Config::default()
        };
        assert!(matches!(
            cfg.to_monitor_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "acquisition_timeout_ms"
        ));
    }

    #[test]
    fn blank_interface_means_auto() {
        let cfg = Config {
            interface: Some("  ".into()),
            ..Config::default()
        };
        assert_eq!(cfg.to_monitor_config().unwrap().interface, None);
    }

    #[test]
    fn malformed_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "refresh_interval_ms = \"soon\"\n");
        assert!(matches!(load_config_from(&path), Err(ConfigError::Figment(_))));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            interface: Some("wlan0".into()),
            signal_history_capacity: 1200,
            ..Config::default()
        };

        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }
}
