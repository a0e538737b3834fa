//! Court commands.

use courtside_core::db::unix_timestamp;
use tracing::{debug, info, instrument};

use super::{Courtside, new_id};
use crate::error::{StorageResultExt, StoreError};
use crate::storage::{Collection, Court, NewCourt};

impl Courtside {
    /// Replace the mirrored courts with everything in the store.
    #[instrument(skip(self), fields(command = "load_courts"))]
    pub async fn load_courts(&self) -> Result<(), StoreError> {
        self.run("load_courts", self.load_courts_inner()).await
    }

    async fn load_courts_inner(&self) -> Result<(), StoreError> {
        let session = self.session_id();
        let courts = self
            .store
            .all_courts()
            .await
            .in_collection(Collection::Courts)?;
        debug!(count = courts.len(), "Courts loaded");
        self.update_in_session(session.as_deref(), |state| state.courts = courts);
        Ok(())
    }

    /// Create a court and append it to the mirror.
    #[instrument(skip(self, court), fields(command = "add_court", name = %court.name))]
    pub async fn add_court(&self, court: NewCourt) -> Result<Court, StoreError> {
        self.run("add_court", self.add_court_inner(court)).await
    }

    async fn add_court_inner(&self, court: NewCourt) -> Result<Court, StoreError> {
        let user = self.session_user()?;
        validate_court(&court)?;

        let record = Court {
            id: new_id(),
            name: court.name,
            court_type: court.court_type,
            capacity: court.capacity,
            price_per_hour: court.price_per_hour,
            created_at: unix_timestamp(),
            updated_at: None,
        };
        let record = self
            .store
            .insert_court(&record)
            .await
            .in_collection(Collection::Courts)?;

        info!(court_id = %record.id, "Court added");
        let added = record.clone();
        self.update_in_session(Some(user.id.as_str()), |state| state.courts.push(added));
        Ok(record)
    }

    /// Fully replace a court by ID (inserting it when absent) and patch the mirror.
    #[instrument(skip(self, court), fields(command = "update_court"))]
    pub async fn update_court(&self, id: &str, court: NewCourt) -> Result<Court, StoreError> {
        self.run("update_court", self.update_court_inner(id, court))
            .await
    }

    async fn update_court_inner(&self, id: &str, court: NewCourt) -> Result<Court, StoreError> {
        let user = self.session_user()?;
        validate_court(&court)?;

        let now = unix_timestamp();
        let created_at = self
            .store
            .get_court(id)
            .await
            .in_collection(Collection::Courts)?
            .map_or(now, |existing| existing.created_at);

        let record = Court {
            id: id.to_string(),
            name: court.name,
            court_type: court.court_type,
            capacity: court.capacity,
            price_per_hour: court.price_per_hour,
            created_at,
            updated_at: Some(now),
        };
        let record = self
            .store
            .put_court(&record)
            .await
            .in_collection(Collection::Courts)?;

        info!(court_id = %record.id, "Court updated");
        let updated = record.clone();
        self.update_in_session(Some(user.id.as_str()), |state| {
            match state.courts.iter_mut().find(|c| c.id == updated.id) {
                Some(slot) => *slot = updated,
                None => state.courts.push(updated),
            }
        });
        Ok(record)
    }

    /// Delete a court. Absent IDs are a no-op; returns whether a record was removed.
    #[instrument(skip(self), fields(command = "delete_court"))]
    pub async fn delete_court(&self, id: &str) -> Result<bool, StoreError> {
        self.run("delete_court", self.delete_court_inner(id)).await
    }

    async fn delete_court_inner(&self, id: &str) -> Result<bool, StoreError> {
        self.session_user()?;

        let removed = self
            .store
            .delete_court(id)
            .await
            .in_collection(Collection::Courts)?;

        if removed {
            info!(court_id = id, "Court deleted");
        }
        self.state.update(|state| state.courts.retain(|c| c.id != id));
        Ok(removed)
    }
}

fn validate_court(court: &NewCourt) -> Result<(), StoreError> {
    if court.name.trim().is_empty() {
        return Err(StoreError::validation("name", "must not be empty"));
    }
    if court.capacity <= 0 {
        return Err(StoreError::validation(
            "capacity",
            format!("must be positive, got {}", court.capacity),
        ));
    }
    if let Some(price) = court.price_per_hour
        && !(price.is_finite() && price >= 0.0)
    {
        return Err(StoreError::validation(
            "price_per_hour",
            format!("must be a non-negative number, got {price}"),
        ));
    }
    Ok(())
}
