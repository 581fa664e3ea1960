use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    Budget, BudgetId, Car, CarDriver, CarId, Customer, CustomerId, Driver, DriverId, NewBudget,
    NewCar, NewCustomer, NewDriver,
};
use super::repository::{
    BudgetRepository, CarRepository, CustomerRepository, DriverRepository, RepositoryError,
};

#[derive(Default)]
struct StoreState {
    last_id: i64,
    customers: BTreeMap<CustomerId, Customer>,
    drivers: BTreeMap<DriverId, Driver>,
    cars: BTreeMap<CarId, Car>,
    car_drivers: Vec<CarDriver>,
    budgets: BTreeMap<BudgetId, Budget>,
}

impl StoreState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Process-local store backing every repository trait. Clones share state.
#[derive(Default, Clone)]
pub struct InMemoryInsuranceStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryInsuranceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl CustomerRepository for InMemoryInsuranceStore {
    fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, RepositoryError> {
        let mut state = self.state()?;
        let id = CustomerId(state.next_id());
        let stored = Customer {
            id,
            name: customer.name,
            email: customer.email,
            document: customer.document,
            driver_id: customer.driver_id,
        };
        state.customers.insert(id, stored.clone());
        Ok(stored)
    }

    fn update_customer(&self, customer: Customer) -> Result<Customer, RepositoryError> {
        let mut state = self.state()?;
        match state.customers.get_mut(&customer.id) {
            Some(slot) => {
                *slot = customer.clone();
                Ok(customer)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.state()?.customers.get(&id).cloned())
    }
}

impl DriverRepository for InMemoryInsuranceStore {
    fn insert_driver(&self, driver: NewDriver) -> Result<Driver, RepositoryError> {
        let mut state = self.state()?;
        let id = DriverId(state.next_id());
        let stored = Driver {
            id,
            name: driver.name,
            document: driver.document,
            birthdate: driver.birthdate,
        };
        state.drivers.insert(id, stored.clone());
        Ok(stored)
    }

    fn fetch_driver(&self, id: DriverId) -> Result<Option<Driver>, RepositoryError> {
        Ok(self.state()?.drivers.get(&id).cloned())
    }
}

impl CarRepository for InMemoryInsuranceStore {
    fn insert_car(&self, car: NewCar) -> Result<Car, RepositoryError> {
        let mut state = self.state()?;
        let id = CarId(state.next_id());
        let stored = Car {
            id,
            manufacturer: car.manufacturer,
            model: car.model,
            release_year: car.release_year,
            fipe_value: car.fipe_value,
        };
        state.cars.insert(id, stored.clone());
        Ok(stored)
    }

    fn fetch_car(&self, id: CarId) -> Result<Option<Car>, RepositoryError> {
        Ok(self.state()?.cars.get(&id).cloned())
    }

    fn link_driver(&self, link: CarDriver) -> Result<CarDriver, RepositoryError> {
        let mut state = self.state()?;
        if !state.cars.contains_key(&link.car_id) || !state.drivers.contains_key(&link.driver_id)
        {
            return Err(RepositoryError::NotFound);
        }

        let conflicting = state.car_drivers.iter().any(|existing| {
            existing.car_id == link.car_id
                && (existing.driver_id == link.driver_id
                    || (existing.main_driver && link.main_driver))
        });
        if conflicting {
            return Err(RepositoryError::Conflict);
        }

        state.car_drivers.push(link);
        Ok(link)
    }

    fn drivers_for(&self, id: CarId) -> Result<Vec<CarDriver>, RepositoryError> {
        Ok(self
            .state()?
            .car_drivers
            .iter()
            .filter(|link| link.car_id == id)
            .copied()
            .collect())
    }
}

impl BudgetRepository for InMemoryInsuranceStore {
    fn insert_budget(&self, budget: NewBudget) -> Result<Budget, RepositoryError> {
        let mut state = self.state()?;
        let id = BudgetId(state.next_id());
        let stored = Budget {
            id,
            car_id: budget.car_id,
            customer_id: budget.customer_id,
            start_date: budget.start_date,
            end_date: budget.end_date,
            created_on: budget.created_on,
            updated_on: None,
        };
        state.budgets.insert(id, stored.clone());
        Ok(stored)
    }

    fn update_budget(&self, budget: Budget) -> Result<Budget, RepositoryError> {
        let mut state = self.state()?;
        match state.budgets.get_mut(&budget.id) {
            Some(slot) => {
                *slot = budget.clone();
                Ok(budget)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_budget(&self, id: BudgetId) -> Result<Option<Budget>, RepositoryError> {
        Ok(self.state()?.budgets.get(&id).cloned())
    }
}
