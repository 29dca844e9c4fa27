use crate::error::CheckError;
use crate::icon;
use crate::net::ProxyAddrs;

/// Environment report produced by the validator pass.
///
/// This replaces a process-global status slot: the rest of the system
/// receives it by value inside [`crate::bootstrap::Bootstrap`] and treats it
/// as read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvReport {
    /// Why the server environment is unusable, if it is. Later checks
    /// overwrite earlier ones (single-slot semantics).
    pub server_error: Option<CheckError>,
    /// Runtime tool version line; `None` when java is not installed,
    /// `"unknown"` when the version query failed.
    pub java_version: Option<String>,
    /// Resolved proxy addresses; `None` when proxy wiring was aborted.
    pub proxy: Option<ProxyAddrs>,
    /// Base64 icon served while hibernating.
    pub icon: String,
}

impl Default for EnvReport {
    fn default() -> Self {
        Self {
            server_error: None,
            java_version: None,
            proxy: None,
            icon: icon::DEFAULT_ICON.to_string(),
        }
    }
}

impl EnvReport {
    /// Log a soft failure with its originating bootstrap step and record it
    /// into the status slot.
    pub fn record(&mut self, op: &'static str, err: CheckError) {
        tracing::warn!(op, error = %err, "environment check failed");
        self.server_error = Some(err);
    }
}
