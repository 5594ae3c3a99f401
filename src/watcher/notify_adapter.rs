use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tracing::debug;

use crate::error::{WatchError, WatchResult};
use crate::watcher::adapter::{Capabilities, NativeAdapter, RawEvent, RawSink, WatchHandle};

/// Adapter over a `notify` watcher.
///
/// In [`RecursiveMode::NonRecursive`] every directory has to be registered on
/// its own (inotify); in [`RecursiveMode::Recursive`] one registration covers
/// the subtree (ReadDirectoryChangesW).
pub struct NotifyAdapter<W: Watcher> {
    watcher: Option<W>,
    mode: RecursiveMode,
    next_handle: u64,
}

impl NotifyAdapter<RecommendedWatcher> {
    pub fn per_directory(sink: RawSink) -> WatchResult<Self> {
        Self::with_mode(sink, RecursiveMode::NonRecursive)
    }

    pub fn recursive(sink: RawSink) -> WatchResult<Self> {
        Self::with_mode(sink, RecursiveMode::Recursive)
    }

    fn with_mode(sink: RawSink, mode: RecursiveMode) -> WatchResult<Self> {
        let watcher = RecommendedWatcher::new(forward_to(sink), Config::default())?;
        Ok(Self::from_watcher(watcher, mode))
    }
}

impl<W: Watcher> NotifyAdapter<W> {
    /// Wraps an already-built watcher whose handler was created by
    /// [`forward_to`].
    pub fn from_watcher(watcher: W, mode: RecursiveMode) -> Self {
        Self {
            watcher: Some(watcher),
            mode,
            next_handle: 0,
        }
    }
}

impl<W: Watcher + Send> NativeAdapter for NotifyAdapter<W> {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            recursive: self.mode == RecursiveMode::Recursive,
            canonical_roots: false,
        }
    }

    fn register(&mut self, path: &Path) -> WatchResult<WatchHandle> {
        let watcher = self.watcher.as_mut().ok_or(WatchError::Closed)?;
        watcher.watch(path, self.mode)?;

        self.next_handle += 1;
        debug!(path = %path.display(), handle = self.next_handle, "registered native watch");
        Ok(WatchHandle::new(self.next_handle))
    }

    fn stop(&mut self) -> WatchResult<()> {
        // Dropping the watcher shuts down its event loop, which drops the
        // handler and with it the sink.
        self.watcher.take();
        Ok(())
    }
}

/// Builds a `notify` event handler that splits multi-path events and pushes
/// them, or the backend's errors, into `sink`.
pub fn forward_to(sink: RawSink) -> impl FnMut(notify::Result<Event>) + Send + 'static {
    move |result: notify::Result<Event>| {
        let raw: Vec<WatchResult<RawEvent>> = match result {
            Ok(event) if event.need_rescan() => vec![Err(WatchError::EventsDropped {
                path: event.paths.first().cloned(),
            })],
            Ok(event) => {
                let kind = event.kind;
                event
                    .paths
                    .into_iter()
                    .map(|path| Ok(RawEvent::notify(path, kind)))
                    .collect()
            }
            Err(err) => vec![Err(err.into())],
        };

        for item in raw {
            if sink.send(item).is_err() {
                break;
            }
        }
    }
}
