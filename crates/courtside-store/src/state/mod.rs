//! State container: the in-memory mirror of the record store.

mod container;
mod types;

pub use container::{ObserverId, StateContainer};
pub use types::{AppState, ErrorDescriptor, ErrorKind, ReservationScope, Session};
