use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BootstrapError, BootstrapResult};
use crate::identity;
use crate::probe;

/// Fixed config file name, looked up beside the running executable.
pub const CONFIG_FILE_NAME: &str = "drowse-config.json";

/// Persisted configuration. Two instances exist per process: the *default*
/// instance mirroring the file on disk, and the *runtime* instance produced
/// by overlaying command-line flags on a copy of the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub commands: CommandsConfig,
    pub drowse: DrowseConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub folder: PathBuf,
    pub file_name: String,
    /// Declared server version (e.g. "1.19.2"), refreshed by the version probe.
    pub version: String,
    /// Declared protocol number, refreshed by the version probe.
    pub protocol: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandsConfig {
    /// Start command template. `<Server.FileName>` and
    /// `<Commands.StartServerParam>` are substituted at overlay time.
    pub start_server: String,
    pub start_server_param: String,
    /// Graceful stop command sent to the server console.
    pub stop_server: String,
    /// Seconds after a failed stop before the server process is killed.
    pub stop_server_allow_kill: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrowseConfig {
    /// Installation identity: empty until derived, otherwise 40 hex chars.
    pub id: String,
    /// Log verbosity (0=error .. 4=trace).
    pub debug: u8,
    /// Whether the server process may be suspended instead of stopped.
    pub allow_suspend: bool,
    pub info_hibernation: String,
    pub info_starting: String,
    pub notify_update: bool,
    pub notify_message: bool,
    /// Port clients connect to.
    pub port: u16,
    /// Seconds to wait before stopping an empty server.
    pub time_before_stopping_empty_server: i64,
}

/// Directory containing the running executable; the config file lives here.
pub fn exe_dir() -> BootstrapResult<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| BootstrapError::Load {
        op: "load_default",
        detail: format!("resolve executable path: {e}"),
    })?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| BootstrapError::Load {
            op: "load_default",
            detail: "executable path has no parent directory".to_string(),
        })
}

/// Read and deserialize the default config from `config_dir`. Any failure is
/// fatal: there is no partial or built-in fallback.
pub async fn read_default(config_dir: &Path) -> BootstrapResult<Config> {
    let path = config_dir.join(CONFIG_FILE_NAME);
    let data = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| BootstrapError::Load {
            op: "load_default",
            detail: format!("read {}: {e}", path.display()),
        })?;
    serde_json::from_str(&data).map_err(|e| BootstrapError::Load {
        op: "load_default",
        detail: format!("parse {}: {e}", path.display()),
    })
}

/// Load the default config and run its post-load setup: identity derivation
/// and the best-effort version/protocol probe.
///
/// Returns the config and whether it changed in memory and should be
/// persisted (the dirty flag).
pub async fn load_default(config_dir: &Path) -> BootstrapResult<(Config, bool)> {
    let mut config = read_default(config_dir).await?;

    let mut dirty = identity::refresh(&mut config, config_dir).await;

    // Version/protocol are not vital for serving clients, so a failed probe
    // only logs and keeps the stored values.
    match probe::version_info(&config.server.folder).await {
        Ok(info) => dirty |= apply_version_probe(&mut config, info),
        Err(e) => tracing::warn!(
            op = "load_default",
            error = %e,
            "version probe failed, keeping stored version/protocol"
        ),
    }

    Ok((config, dirty))
}

/// Adopt probed version metadata into the default config. Returns whether
/// the config changed.
pub fn apply_version_probe(config: &mut Config, (version, protocol): (String, i32)) -> bool {
    if config.server.version == version && config.server.protocol == protocol {
        return false;
    }
    tracing::info!(
        op = "load_default",
        %version,
        protocol,
        "server version info refreshed"
    );
    config.server.version = version;
    config.server.protocol = protocol;
    true
}

/// Serialize the default config (pretty-printed) and overwrite the file in
/// `config_dir`. A failure here never rolls back in-memory state.
pub async fn save(config: &Config, config_dir: &Path) -> BootstrapResult<()> {
    let data = serde_json::to_string_pretty(config).map_err(|e| BootstrapError::Save {
        op: "save",
        detail: format!("serialize config: {e}"),
    })?;
    let path = config_dir.join(CONFIG_FILE_NAME);
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| BootstrapError::Save {
            op: "save",
            detail: format!("write {}: {e}", path.display()),
        })?;
    tracing::info!("saved default config to {}", path.display());
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A fully populated config used across the crate's tests.
    pub(crate) fn sample_config() -> Config {
        Config {
            server: ServerConfig {
                folder: PathBuf::from("/srv/minecraft"),
                file_name: "server.jar".to_string(),
                version: "1.19.2".to_string(),
                protocol: 760,
            },
            commands: CommandsConfig {
                start_server: "java <Commands.StartServerParam> -jar <Server.FileName> nogui"
                    .to_string(),
                start_server_param: "-Xmx1024M".to_string(),
                stop_server: "stop".to_string(),
                stop_server_allow_kill: 10,
            },
            drowse: DrowseConfig {
                id: "da39a3ee5e6b4b0d3255bfef95601890afd80709".to_string(),
                debug: 2,
                allow_suspend: false,
                info_hibernation: "server is hibernating".to_string(),
                info_starting: "server is starting".to_string(),
                notify_update: true,
                notify_message: true,
                port: 25555,
                time_before_stopping_empty_server: 30,
            },
        }
    }

    #[tokio::test]
    async fn save_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = sample_config();

        save(&config, dir.path()).await.unwrap();

        let loaded = read_default(dir.path()).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn read_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_default(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("load_default"), "got: {err}");
    }

    #[tokio::test]
    async fn read_fails_on_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        let err = read_default(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("parse"), "got: {err}");
    }

    #[tokio::test]
    async fn read_fails_on_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{"server": {}}"#).unwrap();
        assert!(read_default(dir.path()).await.is_err());
    }

    #[test]
    fn version_probe_updates_and_dirties() {
        let mut config = sample_config();
        let dirty = apply_version_probe(&mut config, ("1.20.1".to_string(), 763));
        assert!(dirty);
        assert_eq!(config.server.version, "1.20.1");
        assert_eq!(config.server.protocol, 763);
    }

    #[test]
    fn version_probe_is_idempotent() {
        let mut config = sample_config();
        let dirty = apply_version_probe(&mut config, ("1.19.2".to_string(), 760));
        assert!(!dirty);
    }
}
