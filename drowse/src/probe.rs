//! Version/protocol probe boundary.
//!
//! Modern server distributions ship a `version.json` manifest describing the
//! version they implement. The probe is best-effort: callers log failures and
//! keep the values stored in the config.

use std::path::Path;

use serde::Deserialize;

const VERSION_MANIFEST: &str = "version.json";

#[derive(Deserialize)]
struct VersionManifest {
    name: String,
    protocol_version: i32,
}

/// Read the declared version string and protocol number from the server
/// folder's manifest.
pub async fn version_info(folder: &Path) -> Result<(String, i32), String> {
    let path = folder.join(VERSION_MANIFEST);
    let data = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| format!("read {}: {e}", path.display()))?;
    let manifest: VersionManifest =
        serde_json::from_str(&data).map_err(|e| format!("parse {}: {e}", path.display()))?;
    Ok((manifest.name, manifest.protocol_version))
}
