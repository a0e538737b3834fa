//! User queries for the courtside record store.

use super::db::{DatabaseError, RecordStore};
use super::models::User;

impl RecordStore {
    // =========================================================================
    // User queries
    // =========================================================================

    /// Insert a new user. Fails with `DuplicateKey` on an existing id or email.
    pub async fn insert_user(&self, user: &User) -> Result<User, DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO users (id, name, email, phone, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool())
        .await?;

        Ok(user.clone())
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(user)
    }

    /// Look a user up through the unique email index.
    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool())
            .await?;

        Ok(user)
    }

    /// List every user.
    pub async fn all_users(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY rowid")
            .fetch_all(self.pool())
            .await?;

        Ok(users)
    }

    /// Insert or fully replace a user by ID.
    ///
    /// An email held by a different user still fails with `DuplicateKey`.
    pub async fn put_user(&self, user: &User) -> Result<User, DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO users (id, name, email, phone, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                phone = excluded.phone,
                password_hash = excluded.password_hash,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool())
        .await?;

        Ok(user.clone())
    }

    /// Delete a user. Returns whether a row was removed.
    pub async fn delete_user(&self, id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
