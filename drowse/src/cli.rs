//! Command-line surface and the runtime-config overlay.
//!
//! Every flag mirrors one field of the persisted config; a flag that is not
//! supplied leaves the loaded default untouched. The overlay itself is a pure
//! function of (default config, parsed flags).

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Expected length of a healthy identity (a SHA-1 hex digest).
const IDENTITY_LEN: usize = 40;

const FILE_NAME_TOKEN: &str = "<Server.FileName>";
const START_PARAM_TOKEN: &str = "<Commands.StartServerParam>";

/// Drowse keeps a Minecraft server hibernating until players connect.
// clap's own version flag is disabled so `--version` can carry the declared
// server version, matching the rest of the field-per-flag surface.
#[derive(Parser, Debug, Default)]
#[command(name = "drowse", disable_version_flag = true)]
pub struct Cli {
    /// Minecraft server folder path.
    #[arg(long)]
    pub folder: Option<PathBuf>,

    /// Minecraft server file name.
    #[arg(long)]
    pub file: Option<String>,

    /// Declared minecraft server version.
    #[arg(long)]
    pub version: Option<String>,

    /// Declared minecraft server protocol number.
    #[arg(long)]
    pub protocol: Option<i32>,

    /// Start server parameters.
    #[arg(long)]
    pub msparam: Option<String>,

    /// Seconds after a failed stop before the server is killed.
    #[arg(long = "allowkill")]
    pub allow_kill: Option<i32>,

    /// Installation identity.
    #[arg(long)]
    pub id: Option<String>,

    /// Debug verbosity level (0=error .. 4=trace).
    #[arg(short = 'd', long = "debug")]
    pub debug: Option<u8>,

    /// Whether the server process may be suspended (true/false).
    #[arg(long = "allowsuspend")]
    pub allow_suspend: Option<bool>,

    /// Hibernation message shown to pinging clients.
    #[arg(long = "infohibe")]
    pub info_hibernation: Option<String>,

    /// Starting message shown to pinging clients.
    #[arg(long = "infostar")]
    pub info_starting: Option<String>,

    /// Whether update notifications are shown (true/false).
    #[arg(long = "notifyupd")]
    pub notify_update: Option<bool>,

    /// Whether message notifications are shown (true/false).
    #[arg(long = "notifymes")]
    pub notify_message: Option<bool>,

    /// Port for clients to connect to.
    #[arg(long)]
    pub port: Option<u16>,

    /// Seconds to wait before stopping an empty server.
    #[arg(long)]
    pub timeout: Option<i64>,
}

impl Cli {
    /// Produce the runtime config: a value copy of `default` with the
    /// supplied flags applied, placeholders substituted last.
    pub fn overlay(&self, default: &Config) -> Config {
        let mut c = default.clone();

        if let Some(v) = &self.folder {
            c.server.folder = v.clone();
        }
        if let Some(v) = &self.file {
            c.server.file_name = v.clone();
        }
        if let Some(v) = &self.version {
            c.server.version = v.clone();
        }
        if let Some(v) = self.protocol {
            c.server.protocol = v;
        }
        if let Some(v) = &self.msparam {
            c.commands.start_server_param = v.clone();
        }
        if let Some(v) = self.allow_kill {
            c.commands.stop_server_allow_kill = v;
        }
        if let Some(v) = &self.id {
            c.drowse.id = v.clone();
        }
        if let Some(v) = self.debug {
            c.drowse.debug = v;
        }
        if let Some(v) = self.allow_suspend {
            c.drowse.allow_suspend = v;
        }
        if let Some(v) = &self.info_hibernation {
            c.drowse.info_hibernation = v.clone();
        }
        if let Some(v) = &self.info_starting {
            c.drowse.info_starting = v.clone();
        }
        if let Some(v) = self.notify_update {
            c.drowse.notify_update = v;
        }
        if let Some(v) = self.notify_message {
            c.drowse.notify_message = v;
        }
        if let Some(v) = self.port {
            c.drowse.port = v;
        }
        if let Some(v) = self.timeout {
            c.drowse.time_before_stopping_empty_server = v;
        }

        c.commands.start_server = substitute_placeholders(&c.commands.start_server, &c);
        c
    }
}

/// Replace every occurrence of both placeholder tokens in the start-command
/// template with the runtime field values.
fn substitute_placeholders(template: &str, config: &Config) -> String {
    template
        .replace(FILE_NAME_TOKEN, &config.server.file_name)
        .replace(START_PARAM_TOKEN, &config.commands.start_server_param)
}

/// Promote a user-specified runtime identity into the default config.
///
/// The health check is length-only on purpose: downstream consumers rely on
/// the same 40-char rule, not on hex content. Returns whether the default
/// changed (the dirty flag).
pub fn promote_identity(default: &mut Config, runtime: &Config) -> bool {
    if runtime.drowse.id == default.drowse.id {
        return false;
    }
    if runtime.drowse.id.len() != IDENTITY_LEN {
        tracing::warn!(
            op = "reconcile_identity",
            "user-specified identity is not healthy, keeping default identity"
        );
        return false;
    }
    tracing::info!(
        op = "reconcile_identity",
        "adopting user-specified identity into default config"
    );
    default.drowse.id = runtime.drowse.id.clone();
    true
}
