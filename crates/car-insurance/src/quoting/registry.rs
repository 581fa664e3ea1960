use std::sync::Arc;

use tracing::info;

use super::domain::{
    Car, CarDriver, CarId, CarRecord, Customer, CustomerId, Driver, DriverId, NewCar,
    NewCustomer, NewDriver,
};
use super::repository::{InsuranceStore, RepositoryError};

/// Registration of the entities a budget refers to: customers, drivers,
/// cars and the car/driver links that decide who the main driver is.
pub struct RegistryService<S> {
    store: Arc<S>,
}

impl<S> RegistryService<S>
where
    S: InsuranceStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn register_driver(&self, driver: NewDriver) -> Result<Driver, RegistryError> {
        if driver.name.trim().is_empty() || driver.document.trim().is_empty() {
            return Err(RegistryError::MissingField("driver name and document"));
        }
        let stored = self.store.insert_driver(driver)?;
        info!(driver_id = %stored.id, "driver registered");
        Ok(stored)
    }

    /// A customer may reference a driver; that driver must already exist.
    pub fn register_customer(&self, customer: NewCustomer) -> Result<Customer, RegistryError> {
        if customer.name.trim().is_empty() {
            return Err(RegistryError::MissingField("customer name"));
        }
        if let Some(driver_id) = customer.driver_id {
            self.require_driver(driver_id)?;
        }
        let stored = self.store.insert_customer(customer)?;
        info!(customer_id = %stored.id, "customer registered");
        Ok(stored)
    }

    pub fn rename_customer(
        &self,
        id: CustomerId,
        name: String,
    ) -> Result<Customer, RegistryError> {
        if name.trim().is_empty() {
            return Err(RegistryError::MissingField("customer name"));
        }
        let mut customer = self
            .store
            .fetch_customer(id)?
            .ok_or(RepositoryError::NotFound)?;
        customer.name = name;
        let stored = self.store.update_customer(customer)?;
        info!(customer_id = %stored.id, "customer renamed");
        Ok(stored)
    }

    pub fn customer(&self, id: CustomerId) -> Result<Customer, RegistryError> {
        Ok(self
            .store
            .fetch_customer(id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    pub fn register_car(&self, car: NewCar) -> Result<Car, RegistryError> {
        if car.manufacturer.trim().is_empty() || car.model.trim().is_empty() {
            return Err(RegistryError::MissingField("car manufacturer and model"));
        }
        if car.fipe_value.is_sign_negative() {
            return Err(RegistryError::NegativeFipeValue);
        }
        let stored = self.store.insert_car(car)?;
        info!(car_id = %stored.id, "car registered");
        Ok(stored)
    }

    pub fn assign_driver(
        &self,
        car_id: CarId,
        driver_id: DriverId,
        main_driver: bool,
    ) -> Result<CarDriver, RegistryError> {
        let link = self.store.link_driver(CarDriver {
            car_id,
            driver_id,
            main_driver,
        })?;
        info!(%car_id, %driver_id, main_driver, "driver assigned to car");
        Ok(link)
    }

    /// Car facts as the budget validator sees them.
    pub fn car_record(&self, id: CarId) -> Result<CarRecord, RegistryError> {
        let car = self.store.fetch_car(id)?.ok_or(RepositoryError::NotFound)?;
        let links = self.store.drivers_for(car.id)?;
        Ok(CarRecord::from_links(car.id, &links))
    }

    fn require_driver(&self, id: DriverId) -> Result<Driver, RegistryError> {
        Ok(self
            .store
            .fetch_driver(id)?
            .ok_or(RepositoryError::NotFound)?)
    }
}

/// Error raised by the registry service.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("fipe value must not be negative")]
    NegativeFipeValue,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
