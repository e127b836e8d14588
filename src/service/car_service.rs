//! # Car Service
//!
//! Business rules around car storage: VIN uniqueness on create and on
//! VIN-changing update, and existence checks on read, update and delete.
//!
//! The VIN checks here are check-then-act. A concurrent writer can slip
//! between the check and the save; the repository's own unique index
//! rejects that write and it surfaces as `DuplicateVin` all the same.

use super::errors::{ServiceError, ServiceResult};
use crate::model::{CarDto, CarId, CarMapper};
use crate::observability::{log_event_with_fields, Event};
use crate::storage::{CarRepository, StorageError};

pub struct CarService<R: CarRepository> {
    repository: R,
}

impl<R: CarRepository> CarService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Store a new car under a fresh id.
    ///
    /// Any id in `dto` is ignored. Fails with `DuplicateVin` and writes
    /// nothing if the VIN is already stored.
    pub fn create(&self, dto: &CarDto) -> ServiceResult<CarDto> {
        log_event_with_fields(Event::CarCreateBegin, &[("vin", &dto.vin)]);

        if self.repository.exists_by_vin(&dto.vin).map_err(storage_failure)? {
            return Err(duplicate_vin(&dto.vin));
        }

        let mut car = CarMapper::to_entity(dto);
        car.id = None;
        let saved = self.repository.save(car).map_err(storage_failure)?;

        let dto = CarMapper::to_dto(&saved);
        log_event_with_fields(Event::CarCreated, &[("id", &id_field(dto.id)), ("vin", &dto.vin)]);
        Ok(dto)
    }

    pub fn get_by_id(&self, id: CarId) -> ServiceResult<Option<CarDto>> {
        log_event_with_fields(Event::CarLookup, &[("id", &id.to_string())]);
        let car = self.repository.find_by_id(id).map_err(storage_failure)?;
        Ok(CarMapper::map_to_dto(car))
    }

    pub fn get_by_vin(&self, vin: &str) -> ServiceResult<Option<CarDto>> {
        log_event_with_fields(Event::CarLookup, &[("vin", vin)]);
        let car = self.repository.find_by_vin(vin).map_err(storage_failure)?;
        Ok(CarMapper::map_to_dto(car))
    }

    /// All cars in storage order
    pub fn list(&self) -> ServiceResult<Vec<CarDto>> {
        let cars = self.repository.find_all().map_err(storage_failure)?;
        log_event_with_fields(Event::CarListed, &[("count", &cars.len().to_string())]);
        Ok(cars.iter().map(CarMapper::to_dto).collect())
    }

    /// Overwrite brand, model, year and VIN of an existing car.
    ///
    /// Returns `Ok(None)` if no car has this id, including when a delete
    /// removes it between the lookup and the save. The uniqueness check only
    /// runs when the VIN changes, since a car never conflicts with itself.
    /// It asks whether the new VIN exists anywhere, which is equivalent to
    /// "on another id" only because a VIN maps to at most one car.
    pub fn update(&self, id: CarId, dto: &CarDto) -> ServiceResult<Option<CarDto>> {
        log_event_with_fields(Event::CarUpdateBegin, &[("id", &id.to_string())]);

        let Some(mut existing) = self.repository.find_by_id(id).map_err(storage_failure)? else {
            log_event_with_fields(Event::CarNotFound, &[("id", &id.to_string())]);
            return Ok(None);
        };

        if existing.vin != dto.vin
            && self.repository.exists_by_vin(&dto.vin).map_err(storage_failure)?
        {
            return Err(duplicate_vin(&dto.vin));
        }

        existing.apply(dto);
        let saved = match self.repository.save(existing) {
            Ok(saved) => saved,
            Err(StorageError::NotFound { .. }) => {
                log_event_with_fields(Event::CarNotFound, &[("id", &id.to_string())]);
                return Ok(None);
            }
            Err(err) => return Err(storage_failure(err)),
        };

        log_event_with_fields(Event::CarUpdated, &[("id", &id.to_string())]);
        Ok(Some(CarMapper::to_dto(&saved)))
    }

    /// Remove a car. Returns `false` if there was nothing to remove.
    pub fn delete(&self, id: CarId) -> ServiceResult<bool> {
        if !self.repository.exists_by_id(id).map_err(storage_failure)? {
            log_event_with_fields(Event::CarNotFound, &[("id", &id.to_string())]);
            return Ok(false);
        }

        let removed = self.repository.delete_by_id(id).map_err(storage_failure)?;
        if removed {
            log_event_with_fields(Event::CarDeleted, &[("id", &id.to_string())]);
        }
        Ok(removed)
    }
}

fn id_field(id: Option<CarId>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

fn duplicate_vin(vin: &str) -> ServiceError {
    log_event_with_fields(Event::DuplicateVinRejected, &[("vin", vin)]);
    ServiceError::DuplicateVin(vin.to_string())
}

fn storage_failure(err: StorageError) -> ServiceError {
    match ServiceError::from(err) {
        ServiceError::DuplicateVin(vin) => duplicate_vin(&vin),
        other => {
            log_event_with_fields(Event::StorageFailed, &[("error", &other.to_string())]);
            other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Car;
    use crate::storage::{MemoryCarRepository, StorageResult};

    fn dto(brand: &str, vin: &str) -> CarDto {
        CarDto {
            id: None,
            brand: brand.to_string(),
            model: "Camry".to_string(),
            year: 2023,
            vin: vin.to_string(),
        }
    }

    fn service() -> CarService<MemoryCarRepository> {
        CarService::new(MemoryCarRepository::new())
    }

    #[test]
    fn test_create_assigns_id() {
        let service = service();
        let created = service.create(&dto("Toyota", "VIN-A")).unwrap();
        assert_eq!(created.id, Some(1));
        assert_eq!(created.brand, "Toyota");
    }

    #[test]
    fn test_create_ignores_client_id() {
        let service = service();
        let mut input = dto("Toyota", "VIN-A");
        input.id = Some(500);

        let created = service.create(&input).unwrap();
        assert_eq!(created.id, Some(1));
        assert_eq!(service.get_by_id(500).unwrap(), None);
    }

    #[test]
    fn test_create_duplicate_vin_fails() {
        let service = service();
        service.create(&dto("Toyota", "VIN-A")).unwrap();

        let err = service.create(&dto("Honda", "VIN-A")).unwrap_err();
        assert!(err.is_duplicate_vin());
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_update_missing_is_none() {
        let service = service();
        assert_eq!(service.update(9, &dto("Toyota", "VIN-A")).unwrap(), None);
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_update_same_vin_skips_check() {
        let service = service();
        let created = service.create(&dto("Toyota", "VIN-A")).unwrap();
        service.create(&dto("Honda", "VIN-B")).unwrap();

        let updated = service
            .update(created.id.unwrap(), &dto("Lexus", "VIN-A"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.brand, "Lexus");
        assert_eq!(updated.vin, "VIN-A");
        assert_eq!(updated.id, created.id);
    }

    #[test]
    fn test_update_to_taken_vin_fails() {
        let service = service();
        let a = service.create(&dto("Toyota", "VIN-A")).unwrap();
        service.create(&dto("Honda", "VIN-B")).unwrap();

        let err = service
            .update(a.id.unwrap(), &dto("Lexus", "VIN-B"))
            .unwrap_err();
        assert!(err.is_duplicate_vin());
        assert_eq!(service.get_by_id(a.id.unwrap()).unwrap(), Some(a));
    }

    #[test]
    fn test_update_to_free_vin_moves_lookup() {
        let service = service();
        let a = service.create(&dto("Toyota", "VIN-A")).unwrap();

        service.update(a.id.unwrap(), &dto("Toyota", "VIN-Z")).unwrap();
        assert_eq!(service.get_by_vin("VIN-A").unwrap(), None);
        assert_eq!(service.get_by_vin("VIN-Z").unwrap().unwrap().id, a.id);
    }

    #[test]
    fn test_delete_twice() {
        let service = service();
        let a = service.create(&dto("Toyota", "VIN-A")).unwrap();
        let id = a.id.unwrap();

        assert!(service.delete(id).unwrap());
        assert!(!service.delete(id).unwrap());
        assert_eq!(service.get_by_id(id).unwrap(), None);
    }

    /// Repository whose VIN pre-check always answers "free", standing in
    /// for a concurrent writer that won the race.
    struct BlindVinCheck(MemoryCarRepository);

    impl CarRepository for BlindVinCheck {
        fn find_by_id(&self, id: CarId) -> StorageResult<Option<Car>> {
            self.0.find_by_id(id)
        }
        fn find_by_vin(&self, vin: &str) -> StorageResult<Option<Car>> {
            self.0.find_by_vin(vin)
        }
        fn exists_by_vin(&self, _vin: &str) -> StorageResult<bool> {
            Ok(false)
        }
        fn exists_by_id(&self, id: CarId) -> StorageResult<bool> {
            self.0.exists_by_id(id)
        }
        fn save(&self, car: Car) -> StorageResult<Car> {
            self.0.save(car)
        }
        fn delete_by_id(&self, id: CarId) -> StorageResult<bool> {
            self.0.delete_by_id(id)
        }
        fn find_all(&self) -> StorageResult<Vec<Car>> {
            self.0.find_all()
        }
    }

    #[test]
    fn test_storage_backstop_surfaces_as_duplicate_vin() {
        let service = CarService::new(BlindVinCheck(MemoryCarRepository::new()));
        let a = service.create(&dto("Toyota", "VIN-A")).unwrap();
        service.create(&dto("Honda", "VIN-B")).unwrap();

        assert!(service.create(&dto("Mazda", "VIN-A")).unwrap_err().is_duplicate_vin());
        assert!(service
            .update(a.id.unwrap(), &dto("Toyota", "VIN-B"))
            .unwrap_err()
            .is_duplicate_vin());
        assert_eq!(service.list().unwrap().len(), 2);
    }

    /// Repository that deletes the car right after handing it out, as a
    /// concurrent DELETE landing between update's lookup and save would.
    struct DeleteAfterLookup(MemoryCarRepository);

    impl CarRepository for DeleteAfterLookup {
        fn find_by_id(&self, id: CarId) -> StorageResult<Option<Car>> {
            let found = self.0.find_by_id(id)?;
            assert!(self.0.delete_by_id(id)?);
            Ok(found)
        }
        fn find_by_vin(&self, vin: &str) -> StorageResult<Option<Car>> {
            self.0.find_by_vin(vin)
        }
        fn exists_by_vin(&self, vin: &str) -> StorageResult<bool> {
            self.0.exists_by_vin(vin)
        }
        fn exists_by_id(&self, id: CarId) -> StorageResult<bool> {
            self.0.exists_by_id(id)
        }
        fn save(&self, car: Car) -> StorageResult<Car> {
            self.0.save(car)
        }
        fn delete_by_id(&self, id: CarId) -> StorageResult<bool> {
            self.0.delete_by_id(id)
        }
        fn find_all(&self) -> StorageResult<Vec<Car>> {
            self.0.find_all()
        }
    }

    #[test]
    fn test_update_does_not_resurrect_deleted_car() {
        let service = CarService::new(DeleteAfterLookup(MemoryCarRepository::new()));
        let a = service.create(&dto("Toyota", "VIN-A")).unwrap();

        let outcome = service.update(a.id.unwrap(), &dto("Lexus", "VIN-A")).unwrap();
        assert_eq!(outcome, None);
        assert!(service.repository().find_all().unwrap().is_empty());
        assert!(!service.repository().exists_by_vin("VIN-A").unwrap());
    }

    struct BrokenStorage;

    impl CarRepository for BrokenStorage {
        fn find_by_id(&self, _id: CarId) -> StorageResult<Option<Car>> {
            Err(StorageError::LockPoisoned)
        }
        fn find_by_vin(&self, _vin: &str) -> StorageResult<Option<Car>> {
            Err(StorageError::LockPoisoned)
        }
        fn exists_by_vin(&self, _vin: &str) -> StorageResult<bool> {
            Err(StorageError::LockPoisoned)
        }
        fn exists_by_id(&self, _id: CarId) -> StorageResult<bool> {
            Err(StorageError::LockPoisoned)
        }
        fn save(&self, _car: Car) -> StorageResult<Car> {
            Err(StorageError::LockPoisoned)
        }
        fn delete_by_id(&self, _id: CarId) -> StorageResult<bool> {
            Err(StorageError::LockPoisoned)
        }
        fn find_all(&self) -> StorageResult<Vec<Car>> {
            Err(StorageError::LockPoisoned)
        }
    }

    #[test]
    fn test_storage_failures_propagate() {
        let service = CarService::new(BrokenStorage);
        assert!(matches!(
            service.create(&dto("Toyota", "VIN-A")),
            Err(ServiceError::Storage(_))
        ));
        assert!(matches!(service.get_by_id(1), Err(ServiceError::Storage(_))));
        assert!(matches!(service.list(), Err(ServiceError::Storage(_))));
        assert!(matches!(service.delete(1), Err(ServiceError::Storage(_))));
    }
}
