use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{WatchError, WatchResult};
use crate::ignore::IgnoreSet;
use crate::watcher::adapter::{Capabilities, NativeAdapter, WatchHandle};

/// Paths currently registered with the native layer.
///
/// Entries are never removed when a directory disappears; the stale native
/// watch simply stops producing events. Registering a path again replaces
/// its entry.
#[derive(Debug, Default)]
pub struct WatchRegistry {
    watches: HashMap<PathBuf, WatchHandle>,
}

impl WatchRegistry {
    pub fn insert(&mut self, path: PathBuf, handle: WatchHandle) -> Option<WatchHandle> {
        self.watches.insert(path, handle)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.watches.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self.watches.keys().cloned().collect();
        paths.sort();
        paths
    }
}

/// Everything the caller's thread and the event pump both touch, kept behind
/// one lock so "is it watched" and "is it ignored" are read together.
pub struct WatchState {
    pub(crate) adapter: Option<Box<dyn NativeAdapter>>,
    pub(crate) capabilities: Capabilities,
    pub(crate) registry: WatchRegistry,
    pub(crate) ignore: IgnoreSet,
}

impl WatchState {
    pub fn new(adapter: Box<dyn NativeAdapter>) -> Self {
        Self {
            capabilities: adapter.capabilities(),
            adapter: Some(adapter),
            registry: WatchRegistry::default(),
            ignore: IgnoreSet::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.adapter.is_none()
    }

    pub fn register(&mut self, path: &Path) -> WatchResult<WatchHandle> {
        let adapter = self.adapter.as_mut().ok_or(WatchError::Closed)?;
        register(adapter.as_mut(), &mut self.registry, path)
    }
}

/// Registers `path` with the adapter and records the handle.
pub(crate) fn register(
    adapter: &mut dyn NativeAdapter,
    registry: &mut WatchRegistry,
    path: &Path,
) -> WatchResult<WatchHandle> {
    let handle = adapter.register(path)?;
    if let Some(stale) = registry.insert(path.to_path_buf(), handle) {
        trace!(path = %path.display(), stale = stale.id(), "replaced existing watch");
    }
    Ok(handle)
}
