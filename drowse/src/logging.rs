//! Tracing setup with runtime level reload.
//!
//! The subscriber is installed before the config is loaded, so the final
//! verbosity (the `debug` field of the runtime config, possibly overridden
//! with `-d`) is applied afterwards through a reload handle.

use tracing_subscriber::Registry;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::reload;
use tracing_subscriber::util::SubscriberInitExt;

pub struct LogHandle {
    handle: reload::Handle<LevelFilter, Registry>,
}

/// Install the global subscriber. Safe to call more than once (tests): only
/// the first call installs, but the returned handle always works.
pub fn init() -> LogHandle {
    let (filter, handle) = reload::Layer::new(LevelFilter::INFO);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
    LogHandle { handle }
}

impl LogHandle {
    /// Map the configured debug level (0=error .. 4=trace) onto the
    /// subscriber's max level.
    pub fn set_debug_level(&self, level: u8) {
        let filter = match level {
            0 => LevelFilter::ERROR,
            1 => LevelFilter::WARN,
            2 => LevelFilter::INFO,
            3 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        tracing::info!(op = "overlay_args", level, "setting log level");
        if let Err(e) = self.handle.reload(filter) {
            tracing::warn!(op = "overlay_args", error = %e, "could not update log level");
        }
    }
}
