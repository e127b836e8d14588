//! Volatile car repository.

use std::sync::RwLock;

use super::errors::StorageResult;
use super::repository::CarRepository;
use super::table::CarTable;
use crate::model::{Car, CarId};

/// Car repository held entirely in memory.
///
/// Lookups take a read lock, writes take the write lock, so each call is
/// atomic. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryCarRepository {
    table: RwLock<CarTable>,
}

impl MemoryCarRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CarRepository for MemoryCarRepository {
    fn find_by_id(&self, id: CarId) -> StorageResult<Option<Car>> {
        Ok(self.table.read()?.get(id).cloned())
    }

    fn find_by_vin(&self, vin: &str) -> StorageResult<Option<Car>> {
        Ok(self.table.read()?.get_by_vin(vin).cloned())
    }

    fn exists_by_vin(&self, vin: &str) -> StorageResult<bool> {
        Ok(self.table.read()?.contains_vin(vin))
    }

    fn exists_by_id(&self, id: CarId) -> StorageResult<bool> {
        Ok(self.table.read()?.contains_id(id))
    }

    fn save(&self, car: Car) -> StorageResult<Car> {
        self.table.write()?.upsert(car)
    }

    fn delete_by_id(&self, id: CarId) -> StorageResult<bool> {
        Ok(self.table.write()?.remove(id))
    }

    fn find_all(&self) -> StorageResult<Vec<Car>> {
        Ok(self.table.read()?.all())
    }
}
