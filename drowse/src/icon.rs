//! Server icon boundary.
//!
//! While the server hibernates, the supervisor answers status pings itself
//! and serves this icon. A frozen icon in the server folder takes precedence;
//! otherwise the built-in placeholder is used.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

const ICON_FILE_NAME: &str = "server-icon-frozen.png";

/// Built-in placeholder icon (base64 PNG), used when the server folder
/// carries no frozen icon.
pub const DEFAULT_ICON: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Read the frozen icon from the server folder, base64-encoded for the
/// status response.
pub async fn load(folder: &Path) -> Result<String, String> {
    let path = folder.join(ICON_FILE_NAME);
    let data = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("read {}: {e}", path.display()))?;
    Ok(STANDARD.encode(data))
}
