//! In-memory car table with a unique VIN index.
//!
//! Holds rows in id order and a `vin -> id` index. Both repositories keep
//! one of these behind a lock; the file repository additionally persists
//! it after every mutation.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::errors::{StorageError, StorageResult};
use crate::model::{Car, CarId};

/// First id handed out by an empty table
pub const FIRST_ID: CarId = 1;

#[derive(Debug, Clone)]
pub struct CarTable {
    rows: BTreeMap<CarId, Car>,
    vin_index: HashMap<String, CarId>,
    next_id: CarId,
}

/// Plain-data image of a table, as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableImage {
    pub next_id: CarId,
    pub cars: Vec<Car>,
}

impl Default for CarTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CarTable {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            vin_index: HashMap::new(),
            next_id: FIRST_ID,
        }
    }

    /// Rebuild a table from an image, re-checking the VIN invariant.
    pub fn from_image(image: TableImage) -> StorageResult<Self> {
        let mut table = Self::new();
        for car in image.cars {
            let id = car.id.ok_or_else(|| {
                StorageError::Corrupted(format!("car with VIN {} has no id", car.vin))
            })?;
            if table.rows.contains_key(&id) {
                return Err(StorageError::Corrupted(format!("duplicate id {}", id)));
            }
            if table.vin_index.contains_key(&car.vin) {
                return Err(StorageError::Corrupted(format!("duplicate VIN {}", car.vin)));
            }
            table.vin_index.insert(car.vin.clone(), id);
            table.rows.insert(id, car);
        }

        let past_max = table.rows.keys().next_back().map_or(FIRST_ID, |max| max + 1);
        table.next_id = image.next_id.max(past_max);
        Ok(table)
    }

    pub fn to_image(&self) -> TableImage {
        TableImage {
            next_id: self.next_id,
            cars: self.rows.values().cloned().collect(),
        }
    }

    pub fn get(&self, id: CarId) -> Option<&Car> {
        self.rows.get(&id)
    }

    pub fn get_by_vin(&self, vin: &str) -> Option<&Car> {
        self.vin_index.get(vin).and_then(|id| self.rows.get(id))
    }

    pub fn contains_id(&self, id: CarId) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn contains_vin(&self, vin: &str) -> bool {
        self.vin_index.contains_key(vin)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn all(&self) -> Vec<Car> {
        self.rows.values().cloned().collect()
    }

    /// Insert a car without an id, or replace the row under its id.
    ///
    /// Fails without modifying the table if the id is not stored (a row
    /// removed by delete stays removed) or if the VIN belongs to a car with
    /// a different id.
    pub fn upsert(&mut self, mut car: Car) -> StorageResult<Car> {
        if let Some(id) = car.id {
            if !self.rows.contains_key(&id) {
                return Err(StorageError::NotFound { id });
            }
        }

        if let Some(owner) = self.vin_index.get(&car.vin) {
            if car.id != Some(*owner) {
                return Err(StorageError::unique_violation(car.vin));
            }
        }

        let id = match car.id {
            Some(id) => id,
            None => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
        };
        car.id = Some(id);

        if let Some(previous) = self.rows.insert(id, car.clone()) {
            if previous.vin != car.vin {
                self.vin_index.remove(&previous.vin);
            }
        }
        self.vin_index.insert(car.vin.clone(), id);

        Ok(car)
    }

    pub fn remove(&mut self, id: CarId) -> bool {
        match self.rows.remove(&id) {
            Some(car) => {
                self.vin_index.remove(&car.vin);
                true
            }
            None => false,
        }
    }
}
