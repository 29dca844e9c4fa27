//! Proxy address resolution boundary.
//!
//! Clients connect to the listen address; the supervisor forwards to the
//! server on the loopback target address. The server's own port is read from
//! its `server.properties`.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use crate::config::Config;
use crate::error::CheckError;

const SERVER_PROPERTIES: &str = "server.properties";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyAddrs {
    /// Address clients connect to.
    pub listen: SocketAddr,
    /// Address the server listens on.
    pub target: SocketAddr,
}

/// Resolve the listen/target addresses for the proxy. Failure aborts proxy
/// wiring for this run but never the bootstrap.
pub async fn resolve(config: &Config) -> Result<ProxyAddrs, CheckError> {
    let server_port = read_server_port(&config.server.folder).await?;
    Ok(ProxyAddrs {
        listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.drowse.port)),
        target: SocketAddr::from((Ipv4Addr::LOCALHOST, server_port)),
    })
}

async fn read_server_port(folder: &Path) -> Result<u16, CheckError> {
    let path = folder.join(SERVER_PROPERTIES);
    let data = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| CheckError::ProxySetup {
            detail: format!("read {}: {e}", path.display()),
        })?;

    let value = data
        .lines()
        .filter_map(|line| line.trim().strip_prefix("server-port="))
        .next_back()
        .ok_or_else(|| CheckError::ProxySetup {
            detail: format!("no server-port entry in {}", path.display()),
        })?;

    value.trim().parse().map_err(|e| CheckError::ProxySetup {
        detail: format!("server-port {value:?}: {e}"),
    })
}
