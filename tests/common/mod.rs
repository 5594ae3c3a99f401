#![allow(dead_code)]

use rnotify::watcher::adapter::{Capabilities, NativeAdapter, RawEvent, RawSink, WatchHandle};
use rnotify::{Event, Op, WatchError, WatchResult, Watcher, WatcherConfig};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const TIMEOUT: Duration = Duration::from_secs(3);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// In-memory adapter: records registrations, and lets the test push raw
/// events through [`Script`].
pub struct ScriptedAdapter {
    sink: Option<RawSink>,
    recursive: bool,
    registered: Arc<Mutex<Vec<PathBuf>>>,
}

impl NativeAdapter for ScriptedAdapter {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            recursive: self.recursive,
            canonical_roots: false,
        }
    }

    fn register(&mut self, path: &Path) -> WatchResult<WatchHandle> {
        if self.sink.is_none() {
            return Err(WatchError::Closed);
        }
        let mut registered = self.registered.lock().unwrap();
        registered.push(path.to_path_buf());
        Ok(WatchHandle::new(registered.len() as u64))
    }

    fn stop(&mut self) -> WatchResult<()> {
        self.sink.take();
        Ok(())
    }
}

/// The test's end of a [`ScriptedAdapter`].
pub struct Script {
    sink: RawSink,
    pub registered: Arc<Mutex<Vec<PathBuf>>>,
}

impl Script {
    pub fn push(&self, event: RawEvent) {
        self.sink.send(Ok(event)).unwrap();
    }

    pub fn fail(&self, err: WatchError) {
        self.sink.send(Err(err)).unwrap();
    }

    pub fn registered(&self) -> Vec<PathBuf> {
        self.registered.lock().unwrap().clone()
    }
}

pub fn scripted_watcher(recursive: bool) -> (Watcher, Script) {
    init_tracing();
    let registered = Arc::new(Mutex::new(Vec::new()));
    let mut script = None;

    let watcher = Watcher::with_adapter(WatcherConfig::default(), |sink| {
        script = Some(Script {
            sink: sink.clone(),
            registered: registered.clone(),
        });
        Ok(Box::new(ScriptedAdapter {
            sink: Some(sink),
            recursive,
            registered: registered.clone(),
        }))
    })
    .unwrap();

    (watcher, script.unwrap())
}

/// Reads events until one matches `path` and `op`, returning everything read
/// (including the match). Panics on timeout.
pub fn wait_for(watcher: &Watcher, path: &Path, op: Op) -> Vec<Event> {
    let deadline = Instant::now() + TIMEOUT;
    let mut seen = Vec::new();

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match watcher.events().recv_timeout(remaining) {
            Ok(event) => {
                let found = event.path() == path && event.op() == op;
                seen.push(event);
                if found {
                    return seen;
                }
            }
            Err(_) => panic!(
                "timed out waiting for {} {}; saw {:?}",
                op,
                path.display(),
                seen
            ),
        }
    }
}

/// Reads events until the stream has been quiet for `quiet`.
pub fn drain(watcher: &Watcher, quiet: Duration) -> Vec<Event> {
    let mut seen = Vec::new();
    while let Ok(event) = watcher.events().recv_timeout(quiet) {
        seen.push(event);
    }
    seen
}
