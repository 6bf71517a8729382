// ── Radio helpers ──
//
// Channel/frequency/band arithmetic shared by validation and analysis.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Signal at or above this level maps to 100% quality.
pub const EXCELLENT_SIGNAL_DBM: i32 = -30;
/// Signal at or below this level maps to 0% quality.
pub const POOR_SIGNAL_DBM: i32 = -100;
/// Width assumed when the driver does not report one.
pub const DEFAULT_CHANNEL_WIDTH_MHZ: u32 = 20;

/// The frequency band a BSS operates in.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
)]
pub enum Band {
    #[serde(rename = "2.4GHz")]
    #[strum(serialize = "2.4GHz")]
    Ghz2_4,
    #[serde(rename = "5GHz")]
    #[strum(serialize = "5GHz")]
    Ghz5,
    #[serde(rename = "6GHz")]
    #[strum(serialize = "6GHz")]
    Ghz6,
    #[default]
    #[serde(rename = "unknown", alias = "")]
    #[strum(serialize = "unknown")]
    Unknown,
}

impl Band {
    pub fn from_frequency(freq_mhz: u32) -> Self {
        frequency_to_channel(freq_mhz).map_or(Self::Unknown, |(_, band)| band)
    }
}

/// Map a primary-channel center frequency to its channel number and band.
pub fn frequency_to_channel(freq_mhz: u32) -> Option<(u32, Band)> {
    match freq_mhz {
        2484 => Some((14, Band::Ghz2_4)),
        2412..=2472 if (freq_mhz - 2407) % 5 == 0 => Some(((freq_mhz - 2407) / 5, Band::Ghz2_4)),
        5160..=5885 if freq_mhz % 5 == 0 => Some(((freq_mhz - 5000) / 5, Band::Ghz5)),
        5935 => Some((2, Band::Ghz6)),
        5955..=7115 if (freq_mhz - 5950) % 5 == 0 => Some(((freq_mhz - 5950) / 5, Band::Ghz6)),
        _ => None,
    }
}

/// Map a channel number to its center frequency.
///
/// Channel numbers repeat across 2.4 and 6 GHz, so `band` disambiguates;
/// with [`Band::Unknown`] only the 2.4/5 GHz numbering is considered.
pub fn channel_to_frequency(channel: u32, band: Band) -> Option<u32> {
    match (band, channel) {
        (Band::Ghz2_4 | Band::Unknown, 14) => Some(2484),
        (Band::Ghz2_4 | Band::Unknown, 1..=13) => Some(2407 + channel * 5),
        (Band::Ghz5 | Band::Unknown, 32..=177) => Some(5000 + channel * 5),
        (Band::Ghz6, 2) => Some(5935),
        (Band::Ghz6, 1..=233) => Some(5950 + channel * 5),
        _ => None,
    }
}

/// Linear mapping of dBm onto a 0-100 quality percentage.
pub fn signal_to_quality(signal_dbm: i32) -> u8 {
    if signal_dbm >= EXCELLENT_SIGNAL_DBM {
        return 100;
    }
    if signal_dbm <= POOR_SIGNAL_DBM {
        return 0;
    }
    let span = EXCELLENT_SIGNAL_DBM - POOR_SIGNAL_DBM;
    let pct = (signal_dbm - POOR_SIGNAL_DBM) * 100 / span;
    u8::try_from(pct).unwrap_or(0)
}

/// Frequency span `[low, high)` in MHz occupied by a transmission
/// centered on `freq_mhz` with the given width.
pub fn occupied_range(freq_mhz: u32, width_mhz: u32) -> (u32, u32) {
    let width = if width_mhz == 0 {
        DEFAULT_CHANNEL_WIDTH_MHZ
    } else {
        width_mhz
    };
    let half = width / 2;
    (freq_mhz.saturating_sub(half), freq_mhz + half)
}

/// Whether two occupied ranges intersect. Ranges that only touch at an
/// edge do not.
pub fn ranges_overlap(a: (u32, u32), b: (u32, u32)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// The three non-overlapping 20 MHz channels of the 2.4 GHz band.
pub fn is_non_overlapping_2g_channel(channel: u32) -> bool {
    matches!(channel, 1 | 6 | 11)
}
