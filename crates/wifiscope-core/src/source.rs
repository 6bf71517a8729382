// ── Acquisition boundary ──
//
// The scan source trait the monitor pulls raw records from, and the
// normalisation every raw record passes through before it reaches the
// sample store. After this point the analysis code never sees a
// missing bssid or a channel that disagrees with its frequency.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::{AcquisitionError, CoreError};
use crate::model::radio::{self, Band};
use crate::model::{AccessPoint, ClientStats, SecurityType};

/// One batch of raw records as delivered by a scan source.
///
/// Access points are unordered and may be empty; `clients` holds at most
/// one record per monitored interface.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawScan {
    pub access_points: Vec<AccessPoint>,
    pub clients: Vec<ClientStats>,
}

impl RawScan {
    pub fn new(access_points: Vec<AccessPoint>, clients: Vec<ClientStats>) -> Self {
        Self {
            access_points,
            clients,
        }
    }

    /// Decode a batch from its JSON wire form (`{"accessPoints": [...],
    /// "clients": [...]}`), as produced by an out-of-process scanner.
    pub fn from_json(input: &str) -> Result<Self, AcquisitionError> {
        serde_json::from_str(input).map_err(|e| AcquisitionError::Parse(e.to_string()))
    }
}

/// Producer of raw scan batches (OS scanner, replay file, test fixture).
///
/// Called once per refresh cycle. The monitor bounds each call with its
/// acquisition timeout, so implementations may block on I/O freely.
pub trait ScanSource: Send + Sync + 'static {
    fn acquire(&self) -> impl Future<Output = Result<RawScan, AcquisitionError>> + Send;
}

impl<T: ScanSource> ScanSource for Arc<T> {
    fn acquire(&self) -> impl Future<Output = Result<RawScan, AcquisitionError>> + Send {
        (**self).acquire()
    }
}

// ── Normalisation ────────────────────────────────────────────────────

/// Validate a raw access point and fill in its derived fields.
///
/// - `bssid` is trimmed, lower-cased and required.
/// - Whichever of frequency/channel is missing is derived from the
///   other; a pair that disagrees is rejected.
/// - `band` follows the frequency; a contradicting band is rejected.
/// - `signal_quality` is recomputed, `snr` too when noise is reported.
/// - An unset `security_type` is classified from the descriptor.
/// - An unset `last_seen` becomes `seen_at`.
pub fn normalize_access_point(
    mut ap: AccessPoint,
    seen_at: DateTime<Utc>,
) -> Result<AccessPoint, CoreError> {
    let bssid = ap.bssid.trim().to_ascii_lowercase();
    if bssid.is_empty() {
        return Err(CoreError::validation(
            "access point",
            format!("missing bssid (ssid {:?})", ap.ssid),
        ));
    }
    ap.bssid = bssid;

    let (frequency, channel, band) = resolve_radio(&ap)?;
    ap.frequency = frequency;
    ap.channel = channel;
    ap.band = band;

    ap.signal_quality = radio::signal_to_quality(ap.signal);
    if ap.noise != 0 {
        ap.snr = ap.signal - ap.noise;
    }

    if ap.security_type == SecurityType::Unknown {
        ap.security_type = SecurityType::classify(&ap.security, &ap.auth_methods);
    }

    if ap.last_seen == DateTime::<Utc>::default() {
        ap.last_seen = seen_at;
    }

    Ok(ap)
}

fn resolve_radio(ap: &AccessPoint) -> Result<(u32, u32, Band), CoreError> {
    let record = || format!("access point {}", ap.bssid);

    let (frequency, channel, band) = match (ap.frequency, ap.channel) {
        (0, 0) => {
            return Err(CoreError::validation(record(), "neither frequency nor channel reported"));
        }
        (freq, 0) => {
            let (channel, band) = radio::frequency_to_channel(freq).ok_or_else(|| {
                CoreError::validation(record(), format!("unrecognised frequency {freq} MHz"))
            })?;
            (freq, channel, band)
        }
        (0, channel) => {
            let freq = radio::channel_to_frequency(channel, ap.band).ok_or_else(|| {
                CoreError::validation(
                    record(),
                    format!("channel {channel} does not exist in band {}", ap.band),
                )
            })?;
            (freq, channel, Band::from_frequency(freq))
        }
        (freq, channel) => {
            let (expected, band) = radio::frequency_to_channel(freq).ok_or_else(|| {
                CoreError::validation(record(), format!("unrecognised frequency {freq} MHz"))
            })?;
            if expected != channel {
                return Err(CoreError::validation(
                    record(),
                    format!(
                        "channel {channel} contradicts frequency {freq} MHz (channel {expected})"
                    ),
                ));
            }
            (freq, channel, band)
        }
    };

    if ap.band != Band::Unknown && ap.band != band {
        return Err(CoreError::validation(
            record(),
            format!("band {} contradicts frequency {frequency} MHz", ap.band),
        ));
    }

    Ok((frequency, channel, band))
}

/// Validate a raw client record and fill in its derived fields.
///
/// A record that claims to be connected but carries no bssid is the
/// signature of an interface reset and is downgraded to disconnected.
pub fn normalize_client(mut client: ClientStats) -> Result<ClientStats, CoreError> {
    let interface = client.interface.trim().to_owned();
    if interface.is_empty() {
        return Err(CoreError::validation("client stats", "missing interface name"));
    }
    client.interface = interface;
    client.bssid = client.bssid.trim().to_ascii_lowercase();

    if client.connected && client.bssid.is_empty() {
        debug!(interface = %client.interface, "connected without bssid; treating as disconnected");
        client.connected = false;
    }

    if client.channel == 0 {
        if let Some((channel, _)) = radio::frequency_to_channel(client.frequency) {
            client.channel = channel;
        }
    }

    if client.noise != 0 {
        client.snr = client.signal - client.noise;
    }

    client.retry_rate = if client.tx_packets > 0 {
        #[allow(clippy::cast_precision_loss)]
        let rate = client.tx_retries as f64 / client.tx_packets as f64 * 100.0;
        rate
    } else {
        0.0
    };

    // Histories belong to the trackers; anything a source sends is ignored.
    client.signal_history = Default::default();
    client.roaming_history = Default::default();

    Ok(client)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    fn raw_ap() -> AccessPoint {
        AccessPoint {
            bssid: " AA:BB:CC:DD:EE:01 ".into(),
            ssid: "Home".into(),
            frequency: 2437,
            signal: -50,
            noise: -95,
            security: "WPA2-PSK".into(),
            ..AccessPoint::default()
        }
    }

    #[test]
    fn derives_channel_band_and_quality() {
        let ap = normalize_access_point(raw_ap(), now()).unwrap();
        assert_eq!(ap.bssid, "aa:bb:cc:dd:ee:01");
        assert_eq!(ap.channel, 6);
        assert_eq!(ap.band, Band::Ghz2_4);
        assert_eq!(ap.signal_quality, 71);
        assert_eq!(ap.snr, 45);
        assert_eq!(ap.security_type, SecurityType::Wpa2);
        assert_eq!(ap.last_seen, now());
    }

    #[test]
    fn derives_frequency_from_channel() {
        let raw = AccessPoint {
            frequency: 0,
            channel: 36,
            ..raw_ap()
        };
        let ap = normalize_access_point(raw, now()).unwrap();
        assert_eq!(ap.frequency, 5180);
        assert_eq!(ap.band, Band::Ghz5);
    }

    #[test]
    fn six_ghz_channel_uses_supplied_band() {
        let raw = AccessPoint {
            frequency: 0,
            channel: 5,
            band: Band::Ghz6,
            ..raw_ap()
        };
        let ap = normalize_access_point(raw, now()).unwrap();
        assert_eq!(ap.frequency, 5975);
        assert_eq!(ap.band, Band::Ghz6);
    }

    #[test]
    fn rejects_missing_bssid() {
        let raw = AccessPoint {
            bssid: "   ".into(),
            ..raw_ap()
        };
        let err = normalize_access_point(raw, now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn rejects_contradicting_channel() {
        let raw = AccessPoint {
            channel: 11,
            ..raw_ap()
        };
        let err = normalize_access_point(raw, now()).unwrap_err();
        assert!(err.to_string().contains("contradicts"));
    }

    #[test]
    fn rejects_contradicting_band() {
        let raw = AccessPoint {
            band: Band::Ghz5,
            ..raw_ap()
        };
        assert!(normalize_access_point(raw, now()).is_err());
    }

    #[test]
    fn rejects_missing_radio_info() {
        let raw = AccessPoint {
            frequency: 0,
            ..raw_ap()
        };
        assert!(normalize_access_point(raw, now()).is_err());
    }

    #[test]
    fn keeps_supplied_last_seen() {
        let earlier = now() - chrono::Duration::seconds(10);
        let raw = AccessPoint {
            last_seen: earlier,
            ..raw_ap()
        };
        assert_eq!(normalize_access_point(raw, now()).unwrap().last_seen, earlier);
    }

    #[test]
    fn client_connected_without_bssid_is_disconnected() {
        let raw = ClientStats {
            interface: "wlan0".into(),
            connected: true,
            ssid: "Home".into(),
            ..ClientStats::default()
        };
        let client = normalize_client(raw).unwrap();
        assert!(!client.connected);
    }

    #[test]
    fn client_retry_rate_and_snr() {
        let raw = ClientStats {
            interface: "wlan0".into(),
            connected: true,
            bssid: "AA:BB:CC:DD:EE:01".into(),
            frequency: 5180,
            signal: -55,
            noise: -90,
            tx_packets: 200,
            tx_retries: 10,
            ..ClientStats::default()
        };
        let client = normalize_client(raw).unwrap();
        assert_eq!(client.bssid, "aa:bb:cc:dd:ee:01");
        assert_eq!(client.channel, 36);
        assert_eq!(client.snr, 35);
        assert!((client.retry_rate - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn client_requires_interface() {
        assert!(normalize_client(ClientStats::default()).is_err());
    }

    #[test]
    fn raw_scan_from_json() {
        let scan = RawScan::from_json(
            r#"{"accessPoints":[{"bssid":"aa:bb:cc:dd:ee:01","ssid":"Home","frequency":2412,"signal":-40}],
                "clients":[{"interface":"wlan0","connected":true,"bssid":"aa:bb:cc:dd:ee:01"}]}"#,
        )
        .unwrap();
        assert_eq!(scan.access_points.len(), 1);
        assert_eq!(scan.clients[0].interface, "wlan0");

        assert!(matches!(
            RawScan::from_json("not json"),
            Err(AcquisitionError::Parse(_))
        ));
    }
}
