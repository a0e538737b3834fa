//! `Courtside` Core Library
//!
//! Shared functionality for `Courtside` components:
//! - `SQLite` pool creation and the storage error type
//! - Configuration resolution and hierarchy
//! - Tracing subscriber setup
//! - Common error types

pub mod config;
pub mod db;
pub mod error;
pub mod tracing_init;

pub use config::Config;
pub use error::{Error, Result};
