//! Storage error types
//!
//! Error codes:
//! - CARMS_STORAGE_UNIQUE_VIOLATION (ERROR severity)
//! - CARMS_STORAGE_NOT_FOUND (ERROR severity)
//! - CARMS_STORAGE_IO_ERROR (ERROR severity)
//! - CARMS_STORAGE_SERIALIZATION (ERROR severity)
//! - CARMS_STORAGE_LOCK_POISONED (ERROR severity)
//! - CARMS_DATA_CORRUPTION (FATAL severity)

use std::io;
use std::sync::PoisonError;

use thiserror::Error;

use crate::model::CarId;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The VIN index already maps this VIN to a different car
    #[error("VIN {vin} is already assigned to another car")]
    UniqueViolation { vin: String },

    /// Replace targeted an id that is not stored
    #[error("No car stored under id {id}")]
    NotFound { id: CarId },

    /// Disk I/O failure
    #[error("{message}: {source}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    /// Persisted data failed verification
    #[error("Storage data corrupted: {0}")]
    Corrupted(String),

    /// Snapshot could not be encoded
    #[error("Snapshot serialization failed: {0}")]
    Serialization(String),

    /// A thread panicked while holding the table lock
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        StorageError::Io {
            message: message.into(),
            source,
        }
    }

    pub fn unique_violation(vin: impl Into<String>) -> Self {
        StorageError::UniqueViolation { vin: vin.into() }
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::UniqueViolation { .. } => "CARMS_STORAGE_UNIQUE_VIOLATION",
            StorageError::NotFound { .. } => "CARMS_STORAGE_NOT_FOUND",
            StorageError::Io { .. } => "CARMS_STORAGE_IO_ERROR",
            StorageError::Corrupted(_) => "CARMS_DATA_CORRUPTION",
            StorageError::Serialization(_) => "CARMS_STORAGE_SERIALIZATION",
            StorageError::LockPoisoned => "CARMS_STORAGE_LOCK_POISONED",
        }
    }

    /// Corruption is never recoverable at runtime
    pub fn is_fatal(&self) -> bool {
        matches!(self, StorageError::Corrupted(_))
    }
}

impl<T> From<PoisonError<T>> for StorageError {
    fn from(_: PoisonError<T>) -> Self {
        StorageError::LockPoisoned
    }
}
