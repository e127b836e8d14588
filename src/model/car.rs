//! Car entity as held by the storage layer.

use serde::{Deserialize, Serialize};

use super::dto::CarDto;

/// Storage-assigned surrogate identifier
pub type CarId = i64;

/// A persisted car record.
///
/// `id` is `None` until storage assigns one on first save. Once assigned
/// it never changes. `vin` is unique across all records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub id: Option<CarId>,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
}

impl Car {
    /// Create an unsaved car
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        vin: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            brand: brand.into(),
            model: model.into(),
            year,
            vin: vin.into(),
        }
    }

    /// Overwrite brand, model, year and vin from a transfer record.
    ///
    /// This is the single merge step used by update. The id is never
    /// touched, whatever the transfer record carries.
    pub fn apply(&mut self, dto: &CarDto) {
        self.brand = dto.brand.clone();
        self.model = dto.model.clone();
        self.year = dto.year;
        self.vin = dto.vin.clone();
    }
}
