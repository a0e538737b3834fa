//! Reservation commands.

use courtside_core::db::unix_timestamp;
use tracing::{debug, info, instrument};

use super::{Courtside, new_id};
use crate::error::{StorageResultExt, StoreError};
use crate::state::{AppState, ReservationScope};
use crate::storage::{Collection, Reservation, ReservationDraft, ReservationStatus};

impl Courtside {
    /// Replace the mirrored reservations with the given scope.
    ///
    /// `CurrentUser` reads through the `user_id` index and needs a session;
    /// `All` reads the whole collection.
    #[instrument(skip(self), fields(command = "load_reservations"))]
    pub async fn load_reservations(&self, scope: ReservationScope) -> Result<(), StoreError> {
        self.run("load_reservations", self.load_reservations_inner(scope))
            .await
    }

    async fn load_reservations_inner(&self, scope: ReservationScope) -> Result<(), StoreError> {
        let session = self.session_id();
        let reservations = match scope {
            ReservationScope::CurrentUser => {
                let user = self.session_user()?;
                self.store.reservations_for_user(&user.id).await
            }
            ReservationScope::All => self.store.all_reservations().await,
        }
        .in_collection(Collection::Reservations)?;

        debug!(count = reservations.len(), ?scope, "Reservations loaded");
        self.update_in_session(session.as_deref(), |state| {
            state.reservations = reservations;
            state.reservation_scope = scope;
        });
        Ok(())
    }

    /// Book a court for the logged-in user.
    ///
    /// The record gets a fresh id, the session's user id, status
    /// `pendiente` and a creation timestamp; on success it is appended to
    /// the mirror.
    #[instrument(
        skip(self, draft),
        fields(command = "add_reservation", court_id = %draft.court_id)
    )]
    pub async fn add_reservation(
        &self,
        draft: ReservationDraft,
    ) -> Result<Reservation, StoreError> {
        self.run("add_reservation", self.add_reservation_inner(draft))
            .await
    }

    async fn add_reservation_inner(
        &self,
        draft: ReservationDraft,
    ) -> Result<Reservation, StoreError> {
        let user = self.session_user()?;

        let record = Reservation {
            id: new_id(),
            user_id: user.id.clone(),
            court_id: draft.court_id,
            date: draft.date,
            time: draft.time,
            status: ReservationStatus::Pending,
            created_at: unix_timestamp(),
            updated_at: None,
        };
        let record = self
            .store
            .insert_reservation(&record)
            .await
            .in_collection(Collection::Reservations)?;

        info!(
            reservation_id = %record.id,
            date = %record.date,
            time = %record.time,
            "Reservation added"
        );
        let added = record.clone();
        self.update_in_session(Some(user.id.as_str()), |state| patch_reservation(state, added));
        Ok(record)
    }

    /// Fully replace a reservation by ID and patch the mirror entry in place.
    ///
    /// The replacement carries the session's user id and an update
    /// timestamp. A missing draft status keeps the stored one; an ID not in
    /// the store is inserted.
    #[instrument(skip(self, draft), fields(command = "update_reservation"))]
    pub async fn update_reservation(
        &self,
        id: &str,
        draft: ReservationDraft,
    ) -> Result<Reservation, StoreError> {
        self.run("update_reservation", self.update_reservation_inner(id, draft))
            .await
    }

    async fn update_reservation_inner(
        &self,
        id: &str,
        draft: ReservationDraft,
    ) -> Result<Reservation, StoreError> {
        let user = self.session_user()?;

        let now = unix_timestamp();
        let existing = self
            .store
            .get_reservation(id)
            .await
            .in_collection(Collection::Reservations)?;

        let record = Reservation {
            id: id.to_string(),
            user_id: user.id.clone(),
            court_id: draft.court_id,
            date: draft.date,
            time: draft.time,
            status: draft
                .status
                .or_else(|| existing.as_ref().map(|r| r.status))
                .unwrap_or_default(),
            created_at: existing.as_ref().map_or(now, |r| r.created_at),
            updated_at: Some(now),
        };
        let record = self
            .store
            .put_reservation(&record)
            .await
            .in_collection(Collection::Reservations)?;

        info!(reservation_id = %record.id, status = %record.status, "Reservation updated");
        let updated = record.clone();
        self.update_in_session(Some(user.id.as_str()), |state| patch_reservation(state, updated));
        Ok(record)
    }

    /// Change only the status of a stored reservation.
    ///
    /// Unlike [`Courtside::update_reservation`] the record must exist.
    #[instrument(skip(self), fields(command = "set_reservation_status"))]
    pub async fn set_reservation_status(
        &self,
        id: &str,
        status: ReservationStatus,
    ) -> Result<Reservation, StoreError> {
        self.run(
            "set_reservation_status",
            self.set_reservation_status_inner(id, status),
        )
        .await
    }

    async fn set_reservation_status_inner(
        &self,
        id: &str,
        status: ReservationStatus,
    ) -> Result<Reservation, StoreError> {
        let user = self.session_user()?;

        let existing = self
            .store
            .get_reservation(id)
            .await
            .in_collection(Collection::Reservations)?
            .ok_or_else(|| StoreError::NotFound {
                collection: Collection::Reservations,
                id: id.to_string(),
            })?;

        let record = Reservation {
            status,
            updated_at: Some(unix_timestamp()),
            ..existing
        };
        let record = self
            .store
            .put_reservation(&record)
            .await
            .in_collection(Collection::Reservations)?;

        info!(reservation_id = %record.id, %status, "Reservation status changed");
        let updated = record.clone();
        self.update_in_session(Some(user.id.as_str()), |state| patch_reservation(state, updated));
        Ok(record)
    }

    /// Delete a reservation. Absent IDs are a no-op; returns whether a record was removed.
    #[instrument(skip(self), fields(command = "delete_reservation"))]
    pub async fn delete_reservation(&self, id: &str) -> Result<bool, StoreError> {
        self.run("delete_reservation", self.delete_reservation_inner(id))
            .await
    }

    async fn delete_reservation_inner(&self, id: &str) -> Result<bool, StoreError> {
        self.session_user()?;

        let removed = self
            .store
            .delete_reservation(id)
            .await
            .in_collection(Collection::Reservations)?;

        if removed {
            info!(reservation_id = id, "Reservation deleted");
        }
        self.state
            .update(|state| state.reservations.retain(|r| r.id != id));
        Ok(removed)
    }
}

/// Replace the mirror entry with the same id, or append it when the mirror's
/// scope covers the record.
fn patch_reservation(state: &mut AppState, record: Reservation) {
    if let Some(slot) = state.reservations.iter_mut().find(|r| r.id == record.id) {
        *slot = record;
        return;
    }
    let in_scope = match state.reservation_scope {
        ReservationScope::All => true,
        ReservationScope::CurrentUser => state
            .user
            .as_ref()
            .is_some_and(|user| user.id == record.user_id),
    };
    if in_scope {
        state.reservations.push(record);
    }
}
