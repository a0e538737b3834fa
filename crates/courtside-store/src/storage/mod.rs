//! `SQLite` record store for courtside.
//!
//! Provides persistence for users, courts and reservations with the
//! primary keys and secondary indices the command surface relies on.

mod db;
mod models;
mod queries;
mod queries_courts;
mod queries_reservations;


pub use db::{DatabaseError, Initialized, RecordStore, SCHEMA_VERSION, seed_courts};
pub use models::*;
