//! Court queries for the courtside record store.

use super::db::{DatabaseError, RecordStore};
use super::models::Court;

impl RecordStore {
    /// Insert a new court. Fails with `DuplicateKey` on an existing id or name.
    pub async fn insert_court(&self, court: &Court) -> Result<Court, DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO courts (id, name, court_type, capacity, price_per_hour, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&court.id)
        .bind(&court.name)
        .bind(&court.court_type)
        .bind(court.capacity)
        .bind(court.price_per_hour)
        .bind(court.created_at)
        .bind(court.updated_at)
        .execute(self.pool())
        .await?;

        Ok(court.clone())
    }

    /// Get a court by ID.
    pub async fn get_court(&self, id: &str) -> Result<Option<Court>, DatabaseError> {
        let court = sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(court)
    }

    /// Look a court up through the unique name index.
    pub async fn court_by_name(&self, name: &str) -> Result<Option<Court>, DatabaseError> {
        let court = sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE name = ?")
            .bind(name)
            .fetch_optional(self.pool())
            .await?;

        Ok(court)
    }

    /// List every court in insertion order.
    pub async fn all_courts(&self) -> Result<Vec<Court>, DatabaseError> {
        let courts = sqlx::query_as::<_, Court>("SELECT * FROM courts ORDER BY rowid")
            .fetch_all(self.pool())
            .await?;

        Ok(courts)
    }

    pub async fn count_courts(&self) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM courts")
            .fetch_one(self.pool())
            .await?;

        Ok(count)
    }

    /// Insert or fully replace a court by ID.
    ///
    /// A name held by a different court still fails with `DuplicateKey`.
    pub async fn put_court(&self, court: &Court) -> Result<Court, DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO courts (id, name, court_type, capacity, price_per_hour, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                court_type = excluded.court_type,
                capacity = excluded.capacity,
                price_per_hour = excluded.price_per_hour,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&court.id)
        .bind(&court.name)
        .bind(&court.court_type)
        .bind(court.capacity)
        .bind(court.price_per_hour)
        .bind(court.created_at)
        .bind(court.updated_at)
        .execute(self.pool())
        .await?;

        Ok(court.clone())
    }

    /// Delete a court. Absent IDs are a no-op; returns whether a row was removed.
    pub async fn delete_court(&self, id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM courts WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
