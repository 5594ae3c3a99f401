use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::error::{WatchError, WatchResult};
use crate::event::{Event, Op};
use crate::watcher::adapter::RawEvent;
use crate::watcher::registrar;
use crate::watcher::registry::WatchState;
use crate::watcher::translate::translate;

/// Background loop that turns raw adapter output into public events.
pub struct EventPump {
    id: Uuid,
    state: Arc<Mutex<WatchState>>,
    raw: Receiver<WatchResult<RawEvent>>,
    events: Sender<Event>,
    errors: Sender<WatchError>,
}

/// Why a delivery attempt stopped the pump.
struct Disconnected;

impl EventPump {
    pub fn new(
        id: Uuid,
        state: Arc<Mutex<WatchState>>,
        raw: Receiver<WatchResult<RawEvent>>,
        events: Sender<Event>,
        errors: Sender<WatchError>,
    ) -> Self {
        Self {
            id,
            state,
            raw,
            events,
            errors,
        }
    }

    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("rnotify-pump-{}", self.id.simple()))
            .spawn(move || self.run())
    }

    /// Runs until the raw channel closes or every receiver of a stream it
    /// delivers to is gone. Dropping `self` on return closes the public streams.
    pub fn run(self) {
        debug!(watcher = %self.id, "event pump started");

        while let Ok(raw) = self.raw.recv() {
            let outcome = match raw {
                Ok(raw) => self.handle_event(raw),
                Err(err) => self.deliver_error(err),
            };
            if outcome.is_err() {
                debug!(watcher = %self.id, "consumer went away");
                break;
            }
        }

        debug!(watcher = %self.id, "event pump stopped");
    }

    fn handle_event(&self, raw: RawEvent) -> Result<(), Disconnected> {
        let Some(op) = translate(&raw.kind) else {
            trace!(watcher = %self.id, path = %raw.path.display(), kind = ?raw.kind, "dropped raw event");
            return Ok(());
        };

        let (ignored, recursive) = {
            let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            (state.ignore.is_ignored(&raw.path), state.capabilities.recursive)
        };
        if ignored {
            trace!(watcher = %self.id, path = %raw.path.display(), "ignored event");
            return Ok(());
        }

        if op == Op::Create && !recursive {
            for err in registrar::on_create(&self.state, &raw.path) {
                self.deliver_error(err)?;
            }
        }

        let event = Event::new(raw.path, op);
        trace!(watcher = %self.id, %event, "delivering event");
        self.events.send(event).map_err(|_| Disconnected)
    }

    fn deliver_error(&self, err: WatchError) -> Result<(), Disconnected> {
        warn!(watcher = %self.id, error = %err, "watch error");
        self.errors.send(err).map_err(|_| Disconnected)
    }
}
