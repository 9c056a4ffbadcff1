//! Session harness: one live round state, serialized events, effect fan-out.
//!
//! All state mutation happens inside `reduce` under the session's lock; the
//! lock makes "read state, compute next, publish" atomic against the tick
//! source, which posts from its own thread. Observers run *outside* the lock
//! so they may enqueue further events from elsewhere — but an observer must
//! not call `post_event` on the same session from within its own invocation;
//! the call would recurse into the observer registry lock.

use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use crossbeam_channel::{select, Sender};

use auris_types::reduce::reduce;
use auris_types::{EffectBundle, GameConfig, GameEvent, GameState};

type Observer = Box<dyn Fn(&EffectBundle) + Send>;
type QuitFn = Box<dyn FnOnce() + Send>;

/// Periodic `TimerTick` source. Fixed rate, independent of event dispatch.
struct Ticker {
    stop_tx: Sender<()>,
    thread_id: ThreadId,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Signal the tick thread and join it, unless called from the tick thread
    /// itself (the quit effect can arrive via a tick).
    fn stop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            if self.thread_id != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

/// Owns exactly one round state for the lifetime of a training session.
///
/// Constructed when a discipline is entered; dropped on the quit effect or
/// when the hosting frontend is torn down. Switching disciplines means
/// dropping this session and building a fresh one — round state is never
/// shared between sessions.
pub struct Session {
    state: Mutex<GameState>,
    observers: Mutex<Vec<Observer>>,
    on_quit: Mutex<Option<QuitFn>>,
    ticker: Mutex<Option<Ticker>>,
    started: Instant,
}

impl Session {
    /// Validate the config and build the session at `Step::Begin`.
    ///
    /// `files` is the reference audio pool (already scanned by the file-pool
    /// collaborator); `seed` drives every RNG draw, so a fixed seed makes the
    /// whole session deterministic.
    pub fn new(
        config: GameConfig,
        files: Vec<std::path::PathBuf>,
        seed: u64,
    ) -> Result<Self, String> {
        let state = GameState::new(config, files, seed)?;
        Ok(Self {
            state: Mutex::new(state),
            observers: Mutex::new(Vec::new()),
            on_quit: Mutex::new(None),
            ticker: Mutex::new(None),
            started: Instant::now(),
        })
    }

    /// Register an effect observer. Observers run synchronously in
    /// registration order on whichever thread posted the event.
    pub fn add_observer(&self, observer: impl Fn(&EffectBundle) + Send + 'static) {
        self.observers
            .lock()
            .expect("observer registry poisoned")
            .push(Box::new(observer));
    }

    /// Register the continuation invoked (once) after the quit effect has
    /// been fanned out.
    pub fn set_on_quit(&self, f: impl FnOnce() + Send + 'static) {
        *self.on_quit.lock().expect("on_quit slot poisoned") = Some(Box::new(f));
    }

    /// Deliver one event: reduce under the state lock, publish the new state,
    /// then fan the effects out to observers outside the lock.
    pub fn post_event(&self, event: &GameEvent) -> EffectBundle {
        let effects = {
            let mut state = self.state.lock().expect("round state poisoned");
            reduce(&mut state, event)
        };

        {
            let observers = self.observers.lock().expect("observer registry poisoned");
            for observer in observers.iter() {
                observer(&effects);
            }
        }

        if effects.quit {
            self.stop_ticker();
            let on_quit = self
                .on_quit
                .lock()
                .expect("on_quit slot poisoned")
                .take();
            if let Some(f) = on_quit {
                f();
            }
        }
        effects
    }

    /// Clone the current round state for display/bookkeeping reads.
    pub fn state(&self) -> GameState {
        self.state.lock().expect("round state poisoned").clone()
    }

    /// Start the periodic tick source. Call after `Init`/`CreateUi` have been
    /// posted. Timestamps are milliseconds since session construction.
    pub fn start_ticker(self: &Arc<Self>, interval: Duration) {
        let mut slot = self.ticker.lock().expect("ticker slot poisoned");
        if slot.is_some() {
            // Release the guard first so the unwind doesn't poison the slot
            // and turn the Drop-time stop_ticker into a double panic.
            drop(slot);
            panic!("tick source already running");
        }

        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let ticks = crossbeam_channel::tick(interval);
        let session: Weak<Session> = Arc::downgrade(self);
        let started = self.started;

        let handle = thread::spawn(move || loop {
            select! {
                recv(ticks) -> _ => {
                    let Some(session) = session.upgrade() else { break };
                    let timestamp = started.elapsed().as_millis() as u64;
                    session.post_event(&GameEvent::TimerTick(timestamp));
                }
                recv(stop_rx) -> _ => break,
            }
        });
        *slot = Some(Ticker {
            stop_tx,
            thread_id: handle.thread().id(),
            handle: Some(handle),
        });
    }

    /// Stop the tick source if it is running. Idempotent.
    pub fn stop_ticker(&self) {
        let ticker = self.ticker.lock().expect("ticker slot poisoned").take();
        if let Some(mut ticker) = ticker {
            ticker.stop();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
