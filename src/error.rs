use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Notify(#[from] notify::Error),

    /// The native layer lost events (kernel queue overflow, FSEvents drop flags).
    #[error("native notification layer dropped events{}", path.as_ref().map(|p| format!(" under {}", p.display())).unwrap_or_default())]
    EventsDropped { path: Option<PathBuf> },

    #[error("backend {0} is not available on this platform")]
    Unsupported(&'static str),

    #[error("watcher is closed")]
    Closed,

    #[error(transparent)]
    Other(#[from] std::io::Error),
}

impl WatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WatchError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type WatchResult<T> = Result<T, WatchError>;
