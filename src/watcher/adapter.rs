use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use notify::EventKind;

use crate::error::WatchResult;
use crate::watcher::flags::EventFlags;

/// Channel end an adapter pushes raw events and native errors into, in the
/// order the OS produced them.
pub type RawSink = Sender<WatchResult<RawEvent>>;

/// What a backend can do on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// One registration covers the whole subtree.
    pub recursive: bool,
    /// Roots must be resolved to canonical, symlink-free paths before
    /// registration.
    pub canonical_roots: bool,
}

/// Opaque token for one native registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchHandle(u64);

impl WatchHandle {
    pub fn new(id: u64) -> Self {
        WatchHandle(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// The raw change information a backend attaches to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    /// Already classified by the `notify` backends.
    Notify(EventKind),
    /// FSEvents flag bitmask.
    Flags(EventFlags),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub path: PathBuf,
    pub kind: RawKind,
}

impl RawEvent {
    pub fn notify(path: impl Into<PathBuf>, kind: EventKind) -> Self {
        Self {
            path: path.into(),
            kind: RawKind::Notify(kind),
        }
    }

    pub fn flags(path: impl Into<PathBuf>, flags: EventFlags) -> Self {
        Self {
            path: path.into(),
            kind: RawKind::Flags(flags),
        }
    }
}

/// A platform notification mechanism.
///
/// Raw events and errors go to the [`RawSink`] the adapter was built with.
/// Once [`NativeAdapter::stop`] returns, the adapter must drop every clone of
/// its sink (possibly from a backend thread shortly after) so the event pump
/// sees the channel close.
pub trait NativeAdapter: Send {
    fn capabilities(&self) -> Capabilities;

    fn register(&mut self, path: &Path) -> WatchResult<WatchHandle>;

    fn stop(&mut self) -> WatchResult<()>;
}
