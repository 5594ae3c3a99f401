use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::WatchError;
use crate::watcher::registry::WatchState;
use crate::watcher::walker;

/// Extends coverage to a path reported as created, for backends that watch
/// one directory at a time.
///
/// The path is stat'ed afresh since the event does not say whether it is a
/// directory. Directories that are not ignored are walked so trees that
/// arrive pre-populated (moved in, `mkdir -p`) are covered too. Files written
/// inside the new directory before its watch is in place are not seen; there
/// is no lock step with the filesystem.
///
/// Failures are returned for delivery on the error stream; the creation
/// event itself is still forwarded by the caller.
pub fn on_create(state: &Mutex<WatchState>, path: &Path) -> Vec<WatchError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(source) => return vec![WatchError::io(path, source)],
    };
    if !metadata.is_dir() {
        return Vec::new();
    }

    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    if state.is_closed() || state.ignore.is_ignored(path) {
        return Vec::new();
    }

    match walker::walk(&mut state, path) {
        Ok(registered) => {
            debug!(path = %path.display(), registered, "extended watch to new directory");
            Vec::new()
        }
        Err(err) => vec![err],
    }
}
