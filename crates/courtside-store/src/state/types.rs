//! State container types.

use serde::Serialize;

use crate::storage::{Court, Reservation, User};

/// Which reservations the mirror holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ReservationScope {
    /// Only the logged-in user's reservations, via the `user_id` index.
    #[default]
    CurrentUser,
    /// Every reservation in the store.
    All,
}

/// Session state machine: Anonymous -> Authenticated -> Anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated,
}

/// Error categories surfaced through the error slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    DuplicateKey,
    DuplicateEmail,
    NotFound,
    SessionRequired,
    InvalidCredentials,
    Validation,
    Credential,
    Storage,
}

/// What the last failed command recorded for the consumer to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub message: String,
}

/// Snapshot of everything the state container holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    /// Logged-in user, `None` while anonymous.
    pub user: Option<User>,
    pub courts: Vec<Court>,
    pub reservations: Vec<Reservation>,
    pub reservation_scope: ReservationScope,
    /// True while at least one command is in flight.
    pub loading: bool,
    pub error: Option<ErrorDescriptor>,
}

impl AppState {
    pub const fn session(&self) -> Session {
        if self.user.is_some() {
            Session::Authenticated
        } else {
            Session::Anonymous
        }
    }

    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn court(&self, id: &str) -> Option<&Court> {
        self.courts.iter().find(|c| c.id == id)
    }

    pub fn reservation(&self, id: &str) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == id)
    }

    /// The mirrored data, without the loading flag and error slot.
    pub fn mirror(&self) -> (Option<&User>, &[Court], &[Reservation]) {
        (self.user.as_ref(), &self.courts, &self.reservations)
    }
}
