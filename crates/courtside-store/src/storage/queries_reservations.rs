//! Reservation queries for the courtside record store.

use super::db::{DatabaseError, RecordStore};
use super::models::{Reservation, ReservationIndex};

impl RecordStore {
    /// Insert a new reservation. Fails with `DuplicateKey` on an existing id.
    ///
    /// `user_id` and `court_id` are stored as given.
    pub async fn insert_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<Reservation, DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO reservations (id, user_id, court_id, date, time, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&reservation.id)
        .bind(&reservation.user_id)
        .bind(&reservation.court_id)
        .bind(&reservation.date)
        .bind(&reservation.time)
        .bind(reservation.status)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .execute(self.pool())
        .await?;

        Ok(reservation.clone())
    }

    /// Get a reservation by ID.
    pub async fn get_reservation(&self, id: &str) -> Result<Option<Reservation>, DatabaseError> {
        let reservation =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?")
                .bind(id)
                .fetch_optional(self.pool())
                .await?;

        Ok(reservation)
    }

    /// All reservations matching `value` on a secondary index, in insertion order.
    pub async fn reservations_by(
        &self,
        index: ReservationIndex,
        value: &str,
    ) -> Result<Vec<Reservation>, DatabaseError> {
        let sql = format!(
            "SELECT * FROM reservations WHERE {} = ? ORDER BY rowid",
            index.column()
        );
        let reservations = sqlx::query_as::<_, Reservation>(&sql)
            .bind(value)
            .fetch_all(self.pool())
            .await?;

        Ok(reservations)
    }

    /// Reservations made by one user.
    pub async fn reservations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Reservation>, DatabaseError> {
        self.reservations_by(ReservationIndex::UserId, user_id).await
    }

    /// Reservations on one calendar day (`YYYY-MM-DD`).
    pub async fn reservations_on(&self, date: &str) -> Result<Vec<Reservation>, DatabaseError> {
        self.reservations_by(ReservationIndex::Date, date).await
    }

    /// List every reservation in insertion order.
    pub async fn all_reservations(&self) -> Result<Vec<Reservation>, DatabaseError> {
        let reservations =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations ORDER BY rowid")
                .fetch_all(self.pool())
                .await?;

        Ok(reservations)
    }

    /// Insert or fully replace a reservation by ID.
    pub async fn put_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<Reservation, DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO reservations (id, user_id, court_id, date, time, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                court_id = excluded.court_id,
                date = excluded.date,
                time = excluded.time,
                status = excluded.status,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&reservation.id)
        .bind(&reservation.user_id)
        .bind(&reservation.court_id)
        .bind(&reservation.date)
        .bind(&reservation.time)
        .bind(reservation.status)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .execute(self.pool())
        .await?;

        Ok(reservation.clone())
    }

    /// Delete a reservation. Absent IDs are a no-op; returns whether a row was removed.
    pub async fn delete_reservation(&self, id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
