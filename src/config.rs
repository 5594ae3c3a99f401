use std::fmt;
use std::time::Duration;

use crate::error::WatchResult;
use crate::watcher::adapter::{NativeAdapter, RawSink};
use crate::watcher::notify_adapter::NotifyAdapter;

/// Default FSEvents coalescing latency.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// Which native notification mechanism backs a [`crate::Watcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Pick the mechanism native to the host platform.
    #[default]
    Auto,
    /// One watch per directory; new directories are discovered by the watcher.
    PerDirectory,
    /// One watch per root; the OS watches the whole subtree.
    Recursive,
    /// macOS FSEvents stream per root, decoded from raw flag bitmasks.
    FsEvents,
}

impl Backend {
    /// Resolves [`Backend::Auto`] to the backend native to this platform.
    pub fn detect(self) -> Backend {
        match self {
            Backend::Auto if cfg!(target_os = "macos") => Backend::FsEvents,
            Backend::Auto if cfg!(target_os = "windows") => Backend::Recursive,
            Backend::Auto => Backend::PerDirectory,
            other => other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Auto => "auto",
            Backend::PerDirectory => "per-directory",
            Backend::Recursive => "recursive",
            Backend::FsEvents => "fsevents",
        }
    }

    /// Builds the adapter for this backend, wired to `sink`.
    pub fn open(self, config: &WatcherConfig, sink: RawSink) -> WatchResult<Box<dyn NativeAdapter>> {
        match self.detect() {
            Backend::Recursive => Ok(Box::new(NotifyAdapter::recursive(sink)?)),
            Backend::FsEvents => open_fsevents(config, sink),
            Backend::Auto | Backend::PerDirectory => {
                Ok(Box::new(NotifyAdapter::per_directory(sink)?))
            }
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(target_os = "macos")]
fn open_fsevents(config: &WatcherConfig, sink: RawSink) -> WatchResult<Box<dyn NativeAdapter>> {
    use crate::watcher::fsevents::FsEventsAdapter;

    Ok(Box::new(FsEventsAdapter::new(sink, config.latency)?))
}

#[cfg(not(target_os = "macos"))]
fn open_fsevents(_config: &WatcherConfig, _sink: RawSink) -> WatchResult<Box<dyn NativeAdapter>> {
    Err(crate::error::WatchError::Unsupported(Backend::FsEvents.name()))
}

/// Settings for a [`crate::Watcher`].
///
/// Channel capacities of `0` make delivery a rendezvous: the pump waits for
/// the consumer to take each event, and a consumer that stops reading stalls
/// the pump until the native layer's own queue overflows.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub backend: Backend,
    pub latency: Duration,
    pub events_capacity: usize,
    pub errors_capacity: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Auto,
            latency: DEFAULT_LATENCY,
            events_capacity: 0,
            errors_capacity: 0,
        }
    }
}

impl WatcherConfig {
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_events_capacity(mut self, capacity: usize) -> Self {
        self.events_capacity = capacity;
        self
    }

    pub fn with_errors_capacity(mut self, capacity: usize) -> Self {
        self.errors_capacity = capacity;
        self
    }
}
