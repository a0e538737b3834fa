//! Write-through command surface.
//!
//! Every mutating command writes to the [`RecordStore`] first and only
//! touches the mirror after the write succeeded. A failed write leaves the
//! mirror exactly as it was and records an error descriptor instead.

mod courts;
mod reservations;
mod session;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::state::{AppState, ObserverId, StateContainer};
use crate::storage::{RecordStore, User};

/// The data layer handle consumers hold: read access to the mirror plus
/// the command surface. Cloning shares the same store and mirror.
#[derive(Clone)]
pub struct Courtside {
    store: RecordStore,
    state: Arc<StateContainer>,
}

impl Courtside {
    /// Build a container over an opened store. The mirror starts anonymous and empty.
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            state: Arc::new(StateContainer::new()),
        }
    }

    /// Direct access to the durable store, for reads outside the mirror.
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn snapshot(&self) -> AppState {
        self.state.snapshot()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read(|s| s.user.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|s| s.loading)
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    pub fn observe(&self, observer: impl Fn(&AppState) + Send + Sync + 'static) -> ObserverId {
        self.state.observe(observer)
    }

    pub fn unobserve(&self, id: ObserverId) -> bool {
        self.state.unobserve(id)
    }

    /// Run one command: busy flag up for its duration, error slot reset at
    /// the start and filled on failure.
    async fn run<T>(
        &self,
        command: &'static str,
        op: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        let _busy = self.state.begin();
        let result = op.await;
        if let Err(ref e) = result {
            warn!(command, error = %e, "Command failed");
            self.state.record_error(e.descriptor());
        }
        result
    }

    /// ID of the logged-in user, if any.
    fn session_id(&self) -> Option<String> {
        self.state.read(|s| s.user.as_ref().map(|u| u.id.clone()))
    }

    /// Apply a mirror change only if the session is still the one the
    /// command started under. After a logout or a switch to another user
    /// the durable write stands but the mirror is left alone.
    fn update_in_session(&self, session: Option<&str>, f: impl FnOnce(&mut AppState)) {
        let applied = self.state.update_if(
            |state| state.user.as_ref().map(|u| u.id.as_str()) == session,
            f,
        );
        if !applied {
            debug!(?session, "Session changed while command ran, mirror untouched");
        }
    }

    /// The logged-in user, or `SessionRequired` before any store access.
    fn session_user(&self) -> Result<User, StoreError> {
        self.state
            .read(|s| s.user.clone())
            .ok_or(StoreError::SessionRequired)
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests;
