//! Subscriber setup for applications and tools
//!
//! Library crates only emit `tracing` events. Binaries call [`init_logging`]
//! once to print them. Output goes to stderr so stdout can carry protocol
//! traffic.

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rpcwire_core::LogLevel;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

/// Handle for changing the active filter after initialization
pub struct ReloadHandle {
    handle: Mutex<Option<reload::Handle<EnvFilter, Registry>>>,
}

impl ReloadHandle {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    /// Get the global reload handle
    pub fn global() -> &'static ReloadHandle {
        static INSTANCE: OnceCell<ReloadHandle> = OnceCell::new();
        INSTANCE.get_or_init(ReloadHandle::new)
    }

    fn set_handle(&self, handle: reload::Handle<EnvFilter, Registry>) {
        *self.handle.lock() = Some(handle);
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Replace the active filter with one for `level`
    pub fn reload_level(&self, level: LogLevel) -> Result<(), String> {
        let guard = self.handle.lock();
        let Some(handle) = guard.as_ref() else {
            return Err("logging not initialized".to_string());
        };
        handle
            .reload(EnvFilter::new(level.as_filter()))
            .map_err(|e| format!("failed to reload filter: {e}"))
    }
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Install a stderr subscriber filtered by `filter`
///
/// `RUST_LOG`, when set, takes precedence over `filter`. Only the first call
/// installs anything; later calls return without effect.
pub fn init_logging(filter: &str) {
    use tracing_subscriber::prelude::*;

    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(filter))
            .unwrap_or_else(|_| EnvFilter::new(LogLevel::Info.as_filter()));
        let (filter_layer, handle) = reload::Layer::new(env_filter);

        let installed = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .is_ok();

        // Another subscriber already owns the process; leave it alone.
        if installed {
            ReloadHandle::global().set_handle(handle);
        }
    });
}

/// Install a stderr subscriber at `level`
pub fn init_logging_with_level(level: LogLevel) {
    init_logging(level.as_filter());
}

/// Change the active log level of the subscriber installed by [`init_logging`]
pub fn set_log_level(level: LogLevel) -> Result<(), String> {
    ReloadHandle::global().reload_level(level)
}
