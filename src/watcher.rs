//! The [`Watcher`] handle and the machinery behind it.
//!
//! - [`adapter`]: the seam between the watcher and a native notification
//!   mechanism
//! - [`notify_adapter`]: per-directory and recursive backends built on `notify`
//! - `fsevents`: macOS FSEvents streams (macOS only)
//! - [`flags`], [`translate`]: mapping raw notifications to [`Op`](crate::Op)
//! - [`registry`], [`walker`], [`registrar`]: the watch set and how it grows
//! - [`pump`]: the background thread that delivers events

pub mod adapter;
pub mod flags;
#[cfg(target_os = "macos")]
pub mod fsevents;
pub mod notify_adapter;
pub mod pump;
pub mod registrar;
pub mod registry;
pub mod translate;
pub mod walker;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::Receiver;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{Backend, WatcherConfig};
use crate::error::{WatchError, WatchResult};
use crate::event::Event;
use crate::watcher::adapter::{NativeAdapter, RawSink};
use crate::watcher::pump::EventPump;
use crate::watcher::registry::WatchState;

/// Recursive filesystem watcher.
///
/// Events arrive on [`Watcher::events`] in the order the native layer reported
/// them; asynchronous failures arrive on [`Watcher::errors`]. Both streams
/// close after [`Watcher::close`] once the pump has drained.
///
/// The handle is `Sync`: one thread can read the streams while another calls
/// [`Watcher::add`] or [`Watcher::close`]. The receivers are cheap to clone
/// when a consumer needs to own them.
///
/// A panic inside an operation that holds the internal lock does not disable
/// the watcher; later calls keep working on whatever state was left behind.
pub struct Watcher {
    id: Uuid,
    backend: Backend,
    state: Arc<Mutex<WatchState>>,
    events: Receiver<Event>,
    errors: Receiver<WatchError>,
}

impl Watcher {
    /// Watcher on the platform's native backend with default settings.
    pub fn new() -> WatchResult<Self> {
        Self::with_config(WatcherConfig::default())
    }

    pub fn with_config(config: WatcherConfig) -> WatchResult<Self> {
        let backend = config.backend;
        Self::with_adapter(config.clone(), |sink| backend.open(&config, sink))
    }

    /// Builds a watcher around the adapter returned by `open`, which receives
    /// the sink the adapter must push raw events into. `config.backend` is
    /// resolved with [`Backend::detect`] and only labels the watcher.
    pub fn with_adapter<F>(config: WatcherConfig, open: F) -> WatchResult<Self>
    where
        F: FnOnce(RawSink) -> WatchResult<Box<dyn NativeAdapter>>,
    {
        let id = Uuid::new_v4();
        let backend = config.backend.detect();
        let (raw_tx, raw_rx) = mpsc::channel();
        let (events_tx, events_rx) = crossbeam_channel::bounded(config.events_capacity);
        let (errors_tx, errors_rx) = crossbeam_channel::bounded(config.errors_capacity);

        let adapter = open(raw_tx)?;
        let state = Arc::new(Mutex::new(WatchState::new(adapter)));

        EventPump::new(id, state.clone(), raw_rx, events_tx, errors_tx).spawn()?;
        info!(watcher = %id, %backend, "watcher started");

        Ok(Watcher {
            id,
            backend,
            state,
            events: events_rx,
            errors: errors_rx,
        })
    }

    /// Starts watching `path` and, on backends without native recursion,
    /// every directory below it that is not ignored.
    ///
    /// Fails with the first filesystem or registration error met; directories
    /// registered before it stay watched.
    pub fn add(&self, path: impl AsRef<Path>) -> WatchResult<()> {
        let path = path.as_ref();
        let mut state = self.lock();
        if state.is_closed() {
            return Err(WatchError::Closed);
        }

        let root = if state.capabilities.canonical_roots {
            fs::canonicalize(path).map_err(|source| WatchError::io(path, source))?
        } else {
            path.to_path_buf()
        };

        if state.capabilities.recursive {
            state.register(&root)?;
        } else {
            walker::walk(&mut state, &root)?;
        }

        debug!(watcher = %self.id, root = %root.display(), "added watch root");
        Ok(())
    }

    /// Excludes every path containing one of `fragments` from future
    /// registration and delivery. Existing watches are left in place.
    pub fn ignore<I, S>(&self, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.lock();
        state.ignore.extend(fragments);
        debug!(watcher = %self.id, fragments = state.ignore.len(), "updated ignore set");
    }

    pub fn events(&self) -> &Receiver<Event> {
        &self.events
    }

    pub fn errors(&self) -> &Receiver<WatchError> {
        &self.errors
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Paths registered individually with the native layer, sorted.
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        self.lock().registry.paths()
    }

    /// Stops the native layer. The public streams close once the pump has
    /// drained what was already queued; events still inside the OS may be
    /// lost. Calling it again is a no-op.
    pub fn close(&self) -> WatchResult<()> {
        let adapter = self.lock().adapter.take();
        match adapter {
            Some(mut adapter) => {
                info!(watcher = %self.id, "closing watcher");
                adapter.stop()
            }
            None => Ok(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(watcher = %self.id, error = %err, "failed to close watcher");
        }
    }
}
