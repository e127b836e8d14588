//! # Car Repository
//!
//! The storage collaborator the service layer is written against.

use std::sync::Arc;

use super::errors::StorageResult;
use crate::model::{Car, CarId};

/// Keyed car storage with a unique index on VIN.
///
/// Every method is atomic with respect to the others. Implementations
/// must reject a `save` that would give a VIN to a second car with
/// `StorageError::UniqueViolation`, regardless of what callers checked
/// beforehand.
pub trait CarRepository: Send + Sync {
    fn find_by_id(&self, id: CarId) -> StorageResult<Option<Car>>;

    fn find_by_vin(&self, vin: &str) -> StorageResult<Option<Car>>;

    fn exists_by_vin(&self, vin: &str) -> StorageResult<bool>;

    fn exists_by_id(&self, id: CarId) -> StorageResult<bool>;

    /// Insert or update by id.
    ///
    /// A car without an id is inserted under a freshly assigned one; a car
    /// with an id replaces the record stored under it. Replacing an id that
    /// is not stored fails with `StorageError::NotFound` and writes nothing.
    /// Returns the stored record.
    fn save(&self, car: Car) -> StorageResult<Car>;

    /// Remove a car. Returns whether a record was removed.
    fn delete_by_id(&self, id: CarId) -> StorageResult<bool>;

    /// All cars in ascending id order
    fn find_all(&self) -> StorageResult<Vec<Car>>;
}

/// Repository handle shared between the service and the server
pub type SharedRepository = Arc<dyn CarRepository>;

impl<R: CarRepository + ?Sized> CarRepository for Arc<R> {
    fn find_by_id(&self, id: CarId) -> StorageResult<Option<Car>> {
        (**self).find_by_id(id)
    }

    fn find_by_vin(&self, vin: &str) -> StorageResult<Option<Car>> {
        (**self).find_by_vin(vin)
    }

    fn exists_by_vin(&self, vin: &str) -> StorageResult<bool> {
        (**self).exists_by_vin(vin)
    }

    fn exists_by_id(&self, id: CarId) -> StorageResult<bool> {
        (**self).exists_by_id(id)
    }

    fn save(&self, car: Car) -> StorageResult<Car> {
        (**self).save(car)
    }

    fn delete_by_id(&self, id: CarId) -> StorageResult<bool> {
        (**self).delete_by_id(id)
    }

    fn find_all(&self) -> StorageResult<Vec<Car>> {
        (**self).find_all()
    }
}
