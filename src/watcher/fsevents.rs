use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fsevent_stream::ffi::{
    kFSEventStreamCreateFlagFileEvents, kFSEventStreamCreateFlagNoDefer,
    kFSEventStreamEventIdSinceNow,
};
use fsevent_stream::stream::{EventStreamHandler, create_event_stream};
use futures::StreamExt;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, trace};

use crate::error::{WatchError, WatchResult};
use crate::watcher::adapter::{Capabilities, NativeAdapter, RawEvent, RawSink, WatchHandle};
use crate::watcher::flags::EventFlags;

/// One FSEvents stream per registered root. Streams are coalesced by the OS
/// over `latency` and report a flag bitmask per path.
pub struct FsEventsAdapter {
    runtime: Option<Runtime>,
    sink: Option<RawSink>,
    latency: Duration,
    streams: HashMap<PathBuf, EventStreamHandler>,
    next_handle: u64,
}

impl FsEventsAdapter {
    pub fn new(sink: RawSink, latency: Duration) -> WatchResult<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("rnotify-fsevents")
            .enable_all()
            .build()?;

        Ok(Self {
            runtime: Some(runtime),
            sink: Some(sink),
            latency,
            streams: HashMap::new(),
            next_handle: 0,
        })
    }

    /// Aborts every stream and releases the sink and runtime. Safe to call
    /// more than once.
    fn shutdown(&mut self) {
        for (path, mut handler) in self.streams.drain() {
            debug!(path = %path.display(), "stopping fsevents stream");
            handler.abort();
        }
        self.sink.take();
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl NativeAdapter for FsEventsAdapter {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            recursive: true,
            canonical_roots: true,
        }
    }

    fn register(&mut self, path: &Path) -> WatchResult<WatchHandle> {
        let (Some(runtime), Some(sink)) = (self.runtime.as_ref(), self.sink.as_ref()) else {
            return Err(WatchError::Closed);
        };

        let _guard = runtime.enter();
        let (stream, handler) = create_event_stream(
            [path],
            kFSEventStreamEventIdSinceNow,
            self.latency,
            kFSEventStreamCreateFlagFileEvents | kFSEventStreamCreateFlagNoDefer,
        )
        .map_err(|source| WatchError::io(path, source))?;

        let sink = sink.clone();
        runtime.spawn(async move {
            let mut events = stream.into_flatten();
            while let Some(event) = events.next().await {
                let flags = EventFlags::from_bits_truncate(event.raw_flags);
                trace!(path = %event.path.display(), flags = %flags.describe(), "fsevent");

                let raw = if flags.events_dropped() {
                    Err(WatchError::EventsDropped {
                        path: Some(event.path),
                    })
                } else {
                    Ok(RawEvent::flags(event.path, flags))
                };
                if sink.send(raw).is_err() {
                    break;
                }
            }
        });

        // Re-adding a root replaces its stream.
        if let Some(mut previous) = self.streams.insert(path.to_path_buf(), handler) {
            previous.abort();
        }

        self.next_handle += 1;
        debug!(path = %path.display(), handle = self.next_handle, "started fsevents stream");
        Ok(WatchHandle::new(self.next_handle))
    }

    fn stop(&mut self) -> WatchResult<()> {
        self.shutdown();
        Ok(())
    }
}

impl Drop for FsEventsAdapter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
