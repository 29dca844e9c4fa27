//! Startup orchestration.
//!
//! One forward pass per process start:
//! validate host → load default (derive identity, probe version) →
//! overlay flags → reconcile identity → apply log level → validate
//! environment → conditional save. Only host support and the config load can
//! fail fatally; everything later degrades into a recorded status.

use std::path::Path;

use crate::cli::{self, Cli};
use crate::config::{self, Config};
use crate::error::BootstrapResult;
use crate::logging::LogHandle;
use crate::opsys;
use crate::status::EnvReport;
use crate::validate;

/// Validated two-tier configuration handed to the rest of the process, which
/// treats it as read-only from here on.
#[derive(Debug)]
pub struct Bootstrap {
    /// Mirror of the persisted config (post identity derivation/promotion).
    pub default: Config,
    /// Default plus command-line overlay; what the supervisor actually runs
    /// with.
    pub runtime: Config,
    /// Environment validation results, including the shared status slot.
    pub env: EnvReport,
    /// Whether the dirtied default config was persisted back to disk.
    pub saved: bool,
}

/// Run the bootstrap against the config beside the running executable.
pub async fn run(cli: &Cli, log: &LogHandle) -> BootstrapResult<Bootstrap> {
    let config_dir = config::exe_dir()?;
    run_in(cli, log, &config_dir).await
}

/// Bootstrap against an explicit config directory.
pub async fn run_in(cli: &Cli, log: &LogHandle, config_dir: &Path) -> BootstrapResult<Bootstrap> {
    tracing::debug!("checking host support...");
    opsys::host_supported()?;

    tracing::debug!("loading config...");
    let (mut default, mut dirty) = config::load_default(config_dir).await?;

    let runtime = cli.overlay(&default);
    dirty |= cli::promote_identity(&mut default, &runtime);
    log.set_debug_level(runtime.drowse.debug);

    let env = validate::check_environment(&runtime).await;

    // A failed save is fatal only to the save attempt: the loaded config is
    // complete and the process can still reach ready.
    let mut saved = false;
    if dirty {
        match config::save(&default, config_dir).await {
            Ok(()) => saved = true,
            Err(e) => tracing::warn!(op = "save", error = %e, "could not persist default config"),
        }
    }

    Ok(Bootstrap {
        default,
        runtime,
        env,
        saved,
    })
}
