//! Budget (insurance quote) intake for cars and customers.
//!
//! `validation` holds the decision procedure; everything else in this module
//! exists to feed it facts (`repository`, `store`, `registry`) or to carry its
//! outcome to callers (`service`, `router`).

pub mod dates;
pub mod domain;
pub mod registry;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use dates::{parse_coverage_date, DateFormatError};
pub use domain::{
    Budget, BudgetId, BudgetRecord, BudgetRequest, Car, CarDriver, CarId, CarRecord, Customer,
    CustomerId, CustomerRecord, Driver, DriverId, NewBudget, NewCar, NewCustomer, NewDriver,
};
pub use registry::{RegistryError, RegistryService};
pub use repository::{
    BudgetRepository, CarRepository, CustomerRepository, DriverRepository, InsuranceStore,
    RepositoryError,
};
pub use router::{error_code_for, quoting_router, status_for, QuotingState};
pub use service::{BudgetService, BudgetServiceError, Clock, FixedClock, SystemClock};
pub use store::InMemoryInsuranceStore;
pub use validation::{
    BudgetLookup, BudgetRequestValidator, CarLookup, CustomerLookup, RejectionKind,
    RejectionReason, ValidatedCoverage, ValidationConfig, ValidationOutcome,
};
