use std::path::PathBuf;

/// Fatal bootstrap failures. Anything in here aborts startup; no partial
/// configuration is ever handed to the rest of the process.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("unsupported host platform: {0}")]
    HostUnsupported(String),

    #[error("config load ({op}): {detail}")]
    Load { op: &'static str, detail: String },

    #[error("config save ({op}): {detail}")]
    Save { op: &'static str, detail: String },
}

pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Soft failures recorded by the environment validator. These degrade the
/// server environment (hibernation stays unavailable) but never halt the
/// bootstrap itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    #[error("server folder/file does not exist: {}", path.display())]
    ServerMissing { path: PathBuf },

    #[error("could not start server to generate eula.txt: {detail}")]
    ServerStartFailed { detail: String },

    #[error("eula.txt is not accepted: {}", path.display())]
    GateNotAccepted { path: PathBuf },

    #[error("java not installed")]
    JavaMissing,

    #[error("proxy setup failed: {detail}")]
    ProxySetup { detail: String },
}
