//! Structural conversion between `Car` and `CarDto`.
//!
//! No validation happens here. Absent input maps to absent output.

use super::car::Car;
use super::dto::CarDto;

/// Maps cars to transfer records and back
pub struct CarMapper;

impl CarMapper {
    pub fn to_dto(car: &Car) -> CarDto {
        CarDto {
            id: car.id,
            brand: car.brand.clone(),
            model: car.model.clone(),
            year: car.year,
            vin: car.vin.clone(),
        }
    }

    /// Copies every field, including the id when one is present.
    pub fn to_entity(dto: &CarDto) -> Car {
        Car {
            id: dto.id,
            brand: dto.brand.clone(),
            model: dto.model.clone(),
            year: dto.year,
            vin: dto.vin.clone(),
        }
    }

    pub fn map_to_dto(car: Option<Car>) -> Option<CarDto> {
        car.as_ref().map(Self::to_dto)
    }

    pub fn map_to_entity(dto: Option<CarDto>) -> Option<Car> {
        dto.as_ref().map(Self::to_entity)
    }
}
