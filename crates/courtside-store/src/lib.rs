//! Courtside data layer
//!
//! Client-side records for a court reservation app:
//! - SQLite record store for users, courts, and reservations
//! - Write-through commands that keep an in-memory mirror in step with the store
//! - State container with session, busy flag, error slot, and observers
//! - Read-only summaries over the mirror

pub mod credentials;
pub mod error;
pub mod state;
pub mod storage;
pub mod summary;
mod sync;

pub use error::StoreError;
pub use state::{AppState, ErrorDescriptor, ErrorKind, ObserverId, ReservationScope, Session};
pub use storage::{
    Court, NewCourt, NewUser, ProfileUpdate, RecordStore, Reservation, ReservationDraft,
    ReservationStatus, User,
};
pub use summary::ReservationSummary;
pub use sync::Courtside;
