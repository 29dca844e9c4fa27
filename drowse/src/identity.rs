//! Installation identity derivation.
//!
//! The identity binds an install to its hardware and location:
//! `sha1_hex(protected_machine_id + executable_dir)`. Re-deriving on the same
//! machine and install path always reproduces the same identity, so repeated
//! bootstraps are idempotent once the id has stabilized.

use std::path::Path;

use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};
use sha2::Sha256;

use crate::config::Config;

/// Key for the HMAC protecting the raw machine id from being recoverable
/// out of the derived identity.
const APP_ID: &str = "drowse";

/// Well-known machine id locations, in lookup order.
const MACHINE_ID_PATHS: &[&str] = &["/etc/machine-id", "/var/lib/dbus/machine-id"];

/// Derive the identity string: 40 lowercase hex chars.
pub fn derive(protected_id: &str, exe_dir: &Path) -> String {
    let mut hasher = Sha1::new();
    hasher.update(protected_id.as_bytes());
    hasher.update(exe_dir.to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Hardware-bound protected identifier: HMAC-SHA256 of the app id keyed by
/// the OS machine id, hex-encoded.
async fn protected_id() -> Result<String, String> {
    let machine_id = machine_id().await?;
    let mut mac = Hmac::<Sha256>::new_from_slice(machine_id.as_bytes())
        .map_err(|e| format!("key machine id: {e}"))?;
    mac.update(APP_ID.as_bytes());
    Ok(format!("{:x}", mac.finalize().into_bytes()))
}

async fn machine_id() -> Result<String, String> {
    for path in MACHINE_ID_PATHS {
        if let Ok(raw) = tokio::fs::read_to_string(path).await {
            let id = raw.trim();
            if !id.is_empty() {
                return Ok(id.to_string());
            }
        }
    }
    Err(format!("no machine id found in {MACHINE_ID_PATHS:?}"))
}

/// Re-derive the identity for this install and adopt it into the default
/// config. Returns whether the config changed.
///
/// A machine id that cannot be obtained is a soft failure: the stored
/// identity stays untouched.
pub async fn refresh(config: &mut Config, exe_dir: &Path) -> bool {
    let protected = match protected_id().await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(
                op = "derive_identity",
                error = %e,
                "could not obtain machine id, keeping stored identity"
            );
            return false;
        }
    };

    let id = derive(&protected, exe_dir);
    if config.drowse.id == id {
        return false;
    }
    tracing::info!(op = "derive_identity", "identity derived from machine id");
    config.drowse.id = id;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn derive_is_deterministic() {
        let dir = PathBuf::from("/opt/drowse");
        let a = derive("0123abcd", &dir);
        let b = derive("0123abcd", &dir);
        assert_eq!(a, b);
    }

    #[test]
    fn derive_produces_40_lowercase_hex_chars() {
        let id = derive("0123abcd", Path::new("/opt/drowse"));
        assert_eq!(id.len(), 40);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn derive_depends_on_both_inputs() {
        let dir = Path::new("/opt/drowse");
        assert_ne!(derive("aaaa", dir), derive("bbbb", dir));
        assert_ne!(
            derive("aaaa", Path::new("/opt/a")),
            derive("aaaa", Path::new("/opt/b"))
        );
    }
}
