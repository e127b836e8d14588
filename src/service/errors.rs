//! Car service errors
//!
//! "Not found" is not an error here: lookups, update and delete report
//! absence through their return values.

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Create or update would give a second car this VIN
    #[error("Car with VIN {0} already exists")]
    DuplicateVin(String),

    /// Storage failed for a reason other than VIN uniqueness
    #[error(transparent)]
    Storage(StorageError),
}

impl ServiceError {
    pub fn is_duplicate_vin(&self) -> bool {
        matches!(self, ServiceError::DuplicateVin(_))
    }
}

/// A uniqueness violation caught by storage means the same thing as one
/// caught by the service's own check.
impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation { vin } => ServiceError::DuplicateVin(vin),
            other => ServiceError::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_becomes_duplicate_vin() {
        let err = ServiceError::from(StorageError::unique_violation("1HGBH41JXMN109186"));
        assert!(err.is_duplicate_vin());
        assert_eq!(err.to_string(), "Car with VIN 1HGBH41JXMN109186 already exists");
    }

    #[test]
    fn test_other_storage_errors_pass_through() {
        let err = ServiceError::from(StorageError::LockPoisoned);
        assert!(matches!(err, ServiceError::Storage(StorageError::LockPoisoned)));
        assert_eq!(err.to_string(), "Storage lock poisoned");
    }
}
