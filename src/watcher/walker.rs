use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{WatchError, WatchResult};
use crate::watcher::registry::{WatchState, register};

/// Registers `root` and every directory below it, depth first in file-name
/// order, pruning ignored directories.
///
/// The first filesystem or registration error aborts the walk. Directories
/// registered before the failure stay registered. A root that is not a
/// directory is registered as-is. Returns the number of registrations made.
pub fn walk(state: &mut WatchState, root: &Path) -> WatchResult<usize> {
    let WatchState {
        adapter,
        registry,
        ignore,
        ..
    } = state;
    let adapter = adapter.as_mut().ok_or(WatchError::Closed)?;

    let entries = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && ignore.is_ignored(entry.path())));

    let mut registered = 0;
    for entry in entries {
        let entry = entry?;
        let is_root_file = entry.depth() == 0 && !entry.file_type().is_dir();
        if entry.file_type().is_dir() || is_root_file {
            register(adapter.as_mut(), registry, entry.path())?;
            registered += 1;
        }
    }

    debug!(root = %root.display(), registered, "walked directory tree");
    Ok(registered)
}
