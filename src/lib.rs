//! # rnotify
//!
//! A recursive filesystem watcher with one API over three kinds of native
//! notification mechanism: per-directory push notifications (inotify),
//! natively recursive watches (ReadDirectoryChangesW) and coalesced flag
//! streams (FSEvents).
//!
//! ## Features
//!
//! - **Recursive Watching**: Watch a root and everything below it, including
//!   directories created after the watch started
//! - **Canonical Events**: Every backend reports the same five operations:
//!   create, write, remove, rename and chmod
//! - **Ignore Fragments**: Exclude paths by substring, both from registration
//!   and from delivery
//! - **Ordered Delivery**: Events are handed to the consumer in the order the
//!   operating system reported them
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rnotify::{Watcher, WatchResult};
//!
//! # fn main() -> WatchResult<()> {
//! let watcher = Watcher::new()?;
//! watcher.ignore([".git", "target"]);
//! watcher.add("/path/to/project")?;
//!
//! for event in watcher.events().iter().take(10) {
//!     println!("{} {}", event.op(), event.path().display());
//! }
//!
//! watcher.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`event`]**: The canonical [`Event`] record and [`Op`] vocabulary
//! - **[`ignore`]**: Substring-based [`IgnoreSet`]
//! - **[`config`]**: [`WatcherConfig`] and backend selection
//! - **[`watcher`]**: The [`Watcher`] handle, native adapters, the directory
//!   walker and the event pump
//! - **[`error`]**: Unified error handling throughout the library
//!
//! ## Delivery Model
//!
//! Each watcher runs one background thread, the event pump. It receives raw
//! notifications from the native adapter, translates them, drops ignored
//! paths and hands the result over a blocking channel. By default the channel
//! is a rendezvous: a consumer that stops reading stalls the pump and,
//! eventually, the operating system's own queue overflows. Lost events are
//! reported as [`WatchError::EventsDropped`] on [`Watcher::errors`].
//!
//! On backends without native recursion a directory created after the watch
//! started is registered when its creation event is processed. Files written
//! inside it before that moment may not be reported.
//!
//! ```rust,no_run
//! use rnotify::{Backend, Op, Watcher, WatcherConfig};
//! use std::time::Duration;
//!
//! # fn main() -> rnotify::WatchResult<()> {
//! let config = WatcherConfig::default()
//!     .with_backend(Backend::PerDirectory)
//!     .with_errors_capacity(64);
//! let watcher = Watcher::with_config(config)?;
//! watcher.add("/srv/data")?;
//!
//! while let Ok(event) = watcher.events().recv_timeout(Duration::from_secs(5)) {
//!     if event.op() == Op::Create {
//!         println!("new: {}", event.path().display());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Synchronous operations return [`WatchResult<T>`]. Failures that happen
//! while reacting to live events never abort the pump; they are delivered on
//! [`Watcher::errors`] and the caller decides whether they are fatal.

pub mod config;
pub mod error;
pub mod event;
pub mod ignore;
pub mod watcher;

/// Re-exports the most commonly used types for convenience.
pub use config::{Backend, WatcherConfig};
pub use error::{WatchError, WatchResult};
pub use event::{Event, Op};
pub use ignore::IgnoreSet;
pub use watcher::Watcher;
