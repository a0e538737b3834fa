//! Record types for the courtside store.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three collections held by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Courts,
    Reservations,
}

impl Collection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Courts => "courts",
            Self::Reservations => "reservations",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Non-unique secondary indices on the reservations collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationIndex {
    UserId,
    Date,
    CourtId,
}

impl ReservationIndex {
    pub(crate) const fn column(&self) -> &'static str {
        match self {
            Self::UserId => "user_id",
            Self::Date => "date",
            Self::CourtId => "court_id",
        }
    }
}

/// User record. The password is only ever held as an argon2id hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Court record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Court {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub court_type: String,
    pub capacity: i64,
    pub price_per_hour: Option<f64>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Reservation record. `user_id` and `court_id` are not checked against
/// their collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    pub court_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Reservation lifecycle status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
pub enum ReservationStatus {
    #[default]
    #[serde(rename = "pendiente")]
    #[sqlx(rename = "pendiente")]
    Pending,
    #[serde(rename = "confirmada")]
    #[sqlx(rename = "confirmada")]
    Confirmed,
    #[serde(rename = "cancelada")]
    #[sqlx(rename = "cancelada")]
    Cancelled,
}

impl ReservationStatus {
    pub const ALL: [Self; 3] = [Self::Pending, Self::Confirmed, Self::Cancelled];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::Confirmed => "confirmada",
            Self::Cancelled => "cancelada",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown reservation status: {s}"))
    }
}

/// Registration input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
}

/// Profile changes applied to the logged-in user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Court input for create and full-replacement update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCourt {
    pub name: String,
    #[serde(rename = "type")]
    pub court_type: String,
    pub capacity: i64,
    pub price_per_hour: Option<f64>,
}

/// Reservation input for create and full-replacement update.
///
/// `status` is ignored on create (always pending); on update a missing
/// status keeps the stored one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    pub court_id: String,
    pub date: String,
    pub time: String,
    pub status: Option<ReservationStatus>,
}
