//! Record store connection, schema lifecycle and seeding.

use std::path::Path;

use sqlx::migrate::Migrator;
use sqlx::{Pool, Sqlite};
use tracing::{debug, info};

pub use courtside_core::db::DatabaseError;
use courtside_core::db::{open_pool, open_pool_in_memory, unix_timestamp};

use super::models::Court;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Schema version this build expects: the newest embedded migration.
pub const SCHEMA_VERSION: i64 = 1;

/// Outcome of [`RecordStore::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Initialized {
    pub schema_version: i64,
    /// Whether the seed courts were inserted by this call.
    pub seeded: bool,
}

/// Durable keyed storage for users, courts and reservations.
#[derive(Clone)]
pub struct RecordStore {
    pool: Pool<Sqlite>,
}

impl RecordStore {
    /// Open or create a store at the given path and bring its schema up to date.
    pub async fn open(path: &Path) -> Result<Self, DatabaseError> {
        let pool = open_pool(path).await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub async fn open_in_memory() -> Result<Self, DatabaseError> {
        let pool = open_pool_in_memory().await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Apply pending migrations and return the resulting schema version.
    ///
    /// Already-applied migrations are skipped, so this is safe to repeat.
    pub async fn migrate(&self) -> Result<i64, DatabaseError> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;

        let version = MIGRATOR
            .iter()
            .map(|m| m.version)
            .max()
            .unwrap_or_default();
        debug!(version, "Record store migrations complete");
        Ok(version)
    }

    /// Ensure the schema exists and seed the fixed courts into an empty store.
    ///
    /// Repeated calls never duplicate schema objects or seed rows.
    pub async fn initialize(&self) -> Result<Initialized, DatabaseError> {
        let schema_version = self.migrate().await?;
        let seeded = self.seed_courts_if_empty().await?;
        info!(schema_version, seeded, "Record store initialized");
        Ok(Initialized {
            schema_version,
            seeded,
        })
    }

    /// Initialize without inserting seed courts.
    pub async fn initialize_schema(&self) -> Result<Initialized, DatabaseError> {
        let schema_version = self.migrate().await?;
        Ok(Initialized {
            schema_version,
            seeded: false,
        })
    }

    async fn seed_courts_if_empty(&self) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courts")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            debug!(existing, "Courts present, skipping seed");
            return Ok(false);
        }

        let now = unix_timestamp();
        for court in seed_courts(now) {
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
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Get a reference to the connection pool.
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close the underlying pool. Every later operation fails with a storage error.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// The fixed court set inserted into a fresh store. None carries an hourly price.
pub fn seed_courts(now: i64) -> Vec<Court> {
    let court = |id: &str, name: &str, court_type: &str, capacity: i64| Court {
        id: id.to_string(),
        name: name.to_string(),
        court_type: court_type.to_string(),
        capacity,
        price_per_hour: None,
        created_at: now,
        updated_at: None,
    };

    vec![
        court("1", "Cancha de Fútbol 1", "fútbol", 10),
        court("2", "Cancha de Fútbol 2", "fútbol", 10),
        court("3", "Cancha de Baloncesto 1", "baloncesto", 6),
        court("4", "Cancha de Tenis 1", "tenis", 2),
    ]
}
