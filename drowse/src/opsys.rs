use crate::error::{BootstrapError, BootstrapResult};

/// Platforms the supervisor can run on. Process suspension and console
/// handling are implemented for these only.
pub fn host_supported() -> BootstrapResult<()> {
    match (std::env::consts::OS, std::env::consts::ARCH) {
        ("linux" | "macos" | "windows", "x86" | "x86_64" | "arm" | "aarch64") => {
            tracing::debug!(
                os = std::env::consts::OS,
                arch = std::env::consts::ARCH,
                "host supported"
            );
            Ok(())
        }
        (os, arch) => Err(BootstrapError::HostUnsupported(format!("{os}/{arch}"))),
    }
}
