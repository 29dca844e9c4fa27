mod bootstrap;
mod cli;
mod config;
mod error;
mod icon;
mod identity;
mod logging;
mod net;
mod opsys;
mod probe;
mod status;
mod validate;

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let log = logging::init();
    let cli = cli::Cli::parse();

    let boot = match bootstrap::run(&cli, &log).await {
        Ok(boot) => boot,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(err) = &boot.env.server_error {
        tracing::warn!("server environment is degraded: {err}");
    }
    if let Some(java) = &boot.env.java_version {
        tracing::debug!(%java, "runtime tool version");
    }
    if let Some(addrs) = &boot.env.proxy {
        tracing::info!(listen = %addrs.listen, target = %addrs.target, "proxy wiring ready");
    }
    tracing::info!(
        id = %boot.default.drowse.id,
        version = %boot.runtime.server.version,
        port = boot.runtime.drowse.port,
        icon_bytes = boot.env.icon.len(),
        saved = boot.saved,
        "bootstrap complete, configuration ready"
    );

    ExitCode::SUCCESS
}
