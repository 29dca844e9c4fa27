//! Environment validation.
//!
//! Every check here is soft: failures are logged, recorded into the
//! [`EnvReport`], and the bootstrap carries on. A missing server folder
//! short-circuits the server-specific checks entirely.

use crate::config::Config;
use crate::error::CheckError;
use crate::icon;
use crate::net;
use crate::status::EnvReport;

const GATE_FILE_NAME: &str = "eula.txt";
const GATE_TOKEN: &str = "eula=true";
const RUNTIME_TOOL: &str = "java";

/// ANSI wrapping for inherited server output, so it reads apart from our own.
const SERVER_COLOR: &str = "\x1b[36m";
const COLOR_RESET: &str = "\x1b[0m";

/// Run the full validation pass over the runtime config.
pub async fn check_environment(config: &Config) -> EnvReport {
    let mut report = EnvReport::default();

    let server_path = config.server.folder.join(&config.server.file_name);
    if !matches!(tokio::fs::try_exists(&server_path).await, Ok(true)) {
        // Without a server there is nothing else to validate this run.
        report.record(
            "validate_folder",
            CheckError::ServerMissing { path: server_path },
        );
        return report;
    }

    check_acceptance_gate(config, &mut report).await;
    check_runtime_tool(&mut report).await;

    match net::resolve(config).await {
        Ok(addrs) => {
            tracing::info!(
                op = "resolve_addrs",
                listen = %addrs.listen,
                target = %addrs.target,
                "proxy addresses resolved"
            );
            report.proxy = Some(addrs);
        }
        Err(e) => report.record("resolve_addrs", e),
    }

    match icon::load(&config.server.folder).await {
        Ok(encoded) => report.icon = encoded,
        Err(e) => tracing::debug!(op = "load_icon", error = %e, "using built-in icon"),
    }

    report
}

/// Check that `eula.txt` exists and is accepted, starting the server once to
/// generate it when it is missing. Two named conditions evaluated in order:
/// readable, then accepted.
async fn check_acceptance_gate(config: &Config, report: &mut EnvReport) {
    let gate_path = config.server.folder.join(GATE_FILE_NAME);

    let mut contents = tokio::fs::read_to_string(&gate_path).await.ok();
    if contents.is_none() {
        tracing::warn!(
            op = "validate_gate",
            path = %gate_path.display(),
            "could not read eula.txt, starting server once to generate it"
        );
        if let Err(detail) = bootstrap_server(config).await {
            report.record("bootstrap_server", CheckError::ServerStartFailed { detail });
        }
        contents = tokio::fs::read_to_string(&gate_path).await.ok();
    }

    match contents {
        Some(text) if gate_accepted(&text) => {
            tracing::info!(op = "validate_gate", "eula.txt exists and is accepted");
        }
        _ => report.record("validate_gate", CheckError::GateNotAccepted { path: gate_path }),
    }
}

/// Case-insensitive, whitespace-insensitive search for the acceptance token.
fn gate_accepted(text: &str) -> bool {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    normalized.contains(GATE_TOKEN)
}

/// Run the configured start command to completion in the server folder, with
/// stdout/stderr inherited so first-run output is visible to the user.
async fn bootstrap_server(config: &Config) -> Result<(), String> {
    let mut parts = config.commands.start_server.split_whitespace();
    let program = parts.next().ok_or("start command is empty")?;

    print!("{SERVER_COLOR}");
    let result = tokio::process::Command::new(program)
        .args(parts)
        .current_dir(&config.server.folder)
        .status()
        .await;
    print!("{COLOR_RESET}");

    let status = result.map_err(|e| format!("spawn {program}: {e}"))?;
    if !status.success() {
        return Err(format!("server exited with {status}"));
    }
    Ok(())
}

/// Verify the runtime tool is on the search path and query its version.
async fn check_runtime_tool(report: &mut EnvReport) {
    if which::which(RUNTIME_TOOL).is_err() {
        report.record("validate_tool", CheckError::JavaMissing);
        return;
    }

    match tokio::process::Command::new(RUNTIME_TOOL)
        .arg("--version")
        .output()
        .await
    {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout)
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            tracing::info!(op = "validate_tool", %version, "java found");
            report.java_version = Some(version);
        }
        _ => {
            tracing::warn!(op = "validate_tool", "could not query java version");
            report.java_version = Some("unknown".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::sample_config;
    use std::path::Path;

    /// Config pointing at a temp server folder containing the server file.
    fn config_in(dir: &Path) -> Config {
        let mut config = sample_config();
        config.server.folder = dir.to_path_buf();
        std::fs::write(dir.join(&config.server.file_name), b"jar").unwrap();
        config
    }

    #[test]
    fn gate_token_matching_is_normalized() {
        assert!(gate_accepted("eula=true"));
        assert!(gate_accepted("EULA = True"));
        assert!(gate_accepted("#By agreeing below...\r\neula = TRUE\r\n"));
        assert!(!gate_accepted("eula=false"));
        assert!(!gate_accepted(""));
    }

    #[tokio::test]
    async fn missing_server_records_and_skips_everything() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = sample_config();
        config.server.folder = dir.path().join("nope");

        let report = check_environment(&config).await;
        assert!(matches!(
            report.server_error,
            Some(CheckError::ServerMissing { .. })
        ));
        assert_eq!(report.java_version, None);
        assert_eq!(report.proxy, None);
        assert_eq!(report.icon, icon::DEFAULT_ICON);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn accepted_gate_does_not_launch_server() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        // a start command that would leave a marker behind if it ever ran
        std::fs::write(dir.path().join("gen.sh"), "touch ran-marker\n").unwrap();
        config.commands.start_server = "/bin/sh gen.sh".to_string();
        std::fs::write(dir.path().join(GATE_FILE_NAME), "EULA = True\n").unwrap();

        let mut report = EnvReport::default();
        check_acceptance_gate(&config, &mut report).await;

        assert_eq!(report.server_error, None);
        assert!(!dir.path().join("ran-marker").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn rejected_gate_records_without_launching() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        std::fs::write(dir.path().join("gen.sh"), "touch ran-marker\n").unwrap();
        config.commands.start_server = "/bin/sh gen.sh".to_string();
        std::fs::write(dir.path().join(GATE_FILE_NAME), "eula=false\n").unwrap();

        let mut report = EnvReport::default();
        check_acceptance_gate(&config, &mut report).await;

        assert!(matches!(
            report.server_error,
            Some(CheckError::GateNotAccepted { .. })
        ));
        assert!(!dir.path().join("ran-marker").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_gate_bootstraps_then_rechecks() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        // stand-in for a first server run that writes eula.txt
        std::fs::write(dir.path().join("gen.sh"), "echo eula=true > eula.txt\n").unwrap();
        config.commands.start_server = "/bin/sh gen.sh".to_string();

        let mut report = EnvReport::default();
        check_acceptance_gate(&config, &mut report).await;

        assert_eq!(report.server_error, None);
        assert!(dir.path().join(GATE_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn failed_bootstrap_launch_is_recorded_then_overwritten_by_gate() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.commands.start_server = dir.path().join("no-such-binary").display().to_string();

        let mut report = EnvReport::default();
        check_acceptance_gate(&config, &mut report).await;

        // launch failure goes into the slot first, the terminal gate check
        // overwrites it (single-slot semantics)
        assert!(matches!(
            report.server_error,
            Some(CheckError::GateNotAccepted { .. })
        ));
    }

    #[tokio::test]
    async fn empty_start_command_is_a_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.commands.start_server = String::new();

        let err = bootstrap_server(&config).await.unwrap_err();
        assert!(err.contains("empty"), "got: {err}");
    }
}
