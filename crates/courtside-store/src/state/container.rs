//! In-memory mirror with synchronous observer fan-out.
//!
//! The current snapshot lives in a `watch` channel so async consumers can
//! await changes. Registered callbacks are invoked inline on every
//! transition, before the mutating call returns.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::trace;

use super::types::{AppState, ErrorDescriptor};

/// Handle returned by [`StateContainer::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Arc<dyn Fn(&AppState) + Send + Sync>;

/// Holds the mirror, session, busy flag and error slot.
pub struct StateContainer {
    state_tx: watch::Sender<AppState>,
    observers: Mutex<Vec<(ObserverId, Observer)>>,
    next_observer: AtomicU64,
    in_flight: AtomicUsize,
}

impl StateContainer {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(AppState::default());
        Self {
            state_tx,
            observers: Mutex::new(Vec::new()),
            next_observer: AtomicU64::new(1),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> AppState {
        self.state_tx.borrow().clone()
    }

    /// Run `f` against the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state_tx.borrow())
    }

    /// Receiver that is marked changed on every transition.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state_tx.subscribe()
    }

    /// Register a callback invoked synchronously with each new state.
    pub fn observe(&self, observer: impl Fn(&AppState) + Send + Sync + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer.fetch_add(1, Ordering::Relaxed));
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(observer)));
        id
    }

    /// Remove a callback. Returns whether it was registered.
    pub fn unobserve(&self, id: ObserverId) -> bool {
        let mut observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    /// Apply one transition and notify every observer.
    pub(crate) fn update(&self, f: impl FnOnce(&mut AppState)) {
        self.state_tx.send_modify(f);
        self.notify();
    }

    /// Apply a transition only when `guard` accepts the current state.
    /// Observers and subscribers hear nothing when it is rejected.
    pub(crate) fn update_if(
        &self,
        guard: impl FnOnce(&AppState) -> bool,
        f: impl FnOnce(&mut AppState),
    ) -> bool {
        let applied = self.state_tx.send_if_modified(|state| {
            if !guard(state) {
                return false;
            }
            f(state);
            true
        });
        if applied {
            self.notify();
        }
        applied
    }

    /// Mark a command as started: raise the busy flag and clear the error slot.
    pub(crate) fn begin(&self) -> BusyGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.update(|state| {
            state.loading = true;
            state.error = None;
        });
        BusyGuard { container: self }
    }

    pub(crate) fn record_error(&self, error: ErrorDescriptor) {
        self.update(|state| state.error = Some(error));
    }

    fn finish(&self) {
        let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
        if remaining == 0 {
            self.update(|state| state.loading = false);
        }
    }

    fn notify(&self) {
        // Callbacks run outside the lock so they may observe or unobserve.
        let observers: Vec<Observer> = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        if observers.is_empty() {
            return;
        }

        let snapshot = self.snapshot();
        trace!(observers = observers.len(), "Notifying state observers");
        for observer in observers {
            observer(&snapshot);
        }
    }
}

impl Default for StateContainer {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the busy flag when the last in-flight command ends, on every exit path.
pub(crate) struct BusyGuard<'a> {
    container: &'a StateContainer,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.container.finish();
    }
}
