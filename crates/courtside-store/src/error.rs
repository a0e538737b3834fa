//! Errors raised by the courtside command surface.

use crate::state::{ErrorDescriptor, ErrorKind};
use crate::storage::{Collection, DatabaseError};

/// Command surface errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Primary key or unique index collision on insert/put.
    #[error("Duplicate key in {collection}: {detail}")]
    DuplicateKey {
        collection: Collection,
        detail: String,
    },

    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: String },

    #[error("No active session")]
    SessionRequired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Storage error: {0}")]
    Storage(DatabaseError),
}

impl StoreError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            Self::DuplicateEmail { .. } => ErrorKind::DuplicateEmail,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::SessionRequired => ErrorKind::SessionRequired,
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Credential(_) => ErrorKind::Credential,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Cloneable form recorded in the state's error slot.
    pub fn descriptor(&self) -> ErrorDescriptor {
        ErrorDescriptor {
            kind: self.kind(),
            message: self.to_string(),
        }
    }

    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<argon2::password_hash::Error> for StoreError {
    fn from(e: argon2::password_hash::Error) -> Self {
        Self::Credential(e.to_string())
    }
}

/// Attach the collection a storage call touched, so unique-index
/// collisions surface as [`StoreError::DuplicateKey`].
pub(crate) trait StorageResultExt<T> {
    fn in_collection(self, collection: Collection) -> Result<T, StoreError>;
}

impl<T> StorageResultExt<T> for Result<T, DatabaseError> {
    fn in_collection(self, collection: Collection) -> Result<T, StoreError> {
        self.map_err(|e| match e {
            DatabaseError::DuplicateKey(detail) => StoreError::DuplicateKey { collection, detail },
            other => StoreError::Storage(other),
        })
    }
}
