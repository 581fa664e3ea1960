use super::domain::{
    Budget, BudgetId, Car, CarDriver, CarId, Customer, CustomerId, Driver, DriverId, NewBudget,
    NewCar, NewCustomer, NewDriver,
};

/// Storage abstraction for customers. Inserts assign the identifier.
pub trait CustomerRepository: Send + Sync {
    fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, RepositoryError>;
    fn update_customer(&self, customer: Customer) -> Result<Customer, RepositoryError>;
    fn fetch_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;
}

pub trait DriverRepository: Send + Sync {
    fn insert_driver(&self, driver: NewDriver) -> Result<Driver, RepositoryError>;
    fn fetch_driver(&self, id: DriverId) -> Result<Option<Driver>, RepositoryError>;
}

/// Cars and their driver links.
pub trait CarRepository: Send + Sync {
    fn insert_car(&self, car: NewCar) -> Result<Car, RepositoryError>;
    fn fetch_car(&self, id: CarId) -> Result<Option<Car>, RepositoryError>;
    /// Fails with `Conflict` when the car already has a main driver and the
    /// new link is also flagged main, or when the pair is already linked.
    fn link_driver(&self, link: CarDriver) -> Result<CarDriver, RepositoryError>;
    fn drivers_for(&self, id: CarId) -> Result<Vec<CarDriver>, RepositoryError>;
}

pub trait BudgetRepository: Send + Sync {
    fn insert_budget(&self, budget: NewBudget) -> Result<Budget, RepositoryError>;
    fn update_budget(&self, budget: Budget) -> Result<Budget, RepositoryError>;
    fn fetch_budget(&self, id: BudgetId) -> Result<Option<Budget>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Everything the quoting services need from persistence.
pub trait InsuranceStore:
    CustomerRepository + DriverRepository + CarRepository + BudgetRepository
{
}

impl<T> InsuranceStore for T where
    T: CustomerRepository + DriverRepository + CarRepository + BudgetRepository
{
}
