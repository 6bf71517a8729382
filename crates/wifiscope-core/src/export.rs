// ── Report export ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::CoreError;
use crate::model::{ClientStats, Network};

const NETWORK_CSV_HEADER: [&str; 6] = [
    "SSID",
    "AP Count",
    "Best Signal",
    "Channel",
    "Security",
    "Has Issues",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    Json,
    Csv,
}

/// Render a network list as pretty JSON or as a one-row-per-network CSV
/// summary.
pub fn export_networks(networks: &[Network], format: ExportFormat) -> Result<String, CoreError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(networks)?),
        ExportFormat::Csv => networks_to_csv(networks),
    }
}

/// Pretty JSON of one client record, histories included.
pub fn export_client(client: &ClientStats) -> Result<String, CoreError> {
    Ok(serde_json::to_string_pretty(client)?)
}

fn networks_to_csv(networks: &[Network]) -> Result<String, CoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(NETWORK_CSV_HEADER)?;

    for network in networks {
        writer.write_record([
            network.ssid.clone(),
            network.ap_count.to_string(),
            network.best_signal.to_string(),
            network.channel.to_string(),
            network.security.to_string(),
            if network.has_issues { "Yes" } else { "No" }.to_owned(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| CoreError::Export {
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| CoreError::Export {
        message: e.to_string(),
    })
}
