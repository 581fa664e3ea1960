use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::quoting::domain::{
    BudgetId, BudgetRecord, CarId, CarRecord, Customer, CustomerId, CustomerRecord, DriverId,
    NewCar, NewCustomer, NewDriver,
};
use crate::quoting::registry::RegistryService;
use crate::quoting::repository::RepositoryError;
use crate::quoting::router::{quoting_router, QuotingState};
use crate::quoting::service::{BudgetService, FixedClock};
use crate::quoting::store::InMemoryInsuranceStore;
use crate::quoting::validation::{BudgetLookup, CarLookup, CustomerLookup, ValidationConfig};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Fixed evaluation date; every scenario date in the suite is relative to it.
pub(super) fn today() -> NaiveDate {
    date(2025, 1, 1)
}

pub(super) const MAIN_DRIVER_CAR: CarId = CarId(10);
pub(super) const SECONDARY_ONLY_CAR: CarId = CarId(11);
pub(super) const KNOWN_CUSTOMER: CustomerId = CustomerId(1);
pub(super) const KNOWN_BUDGET: BudgetId = BudgetId(100);

/// Lookup stub recording the order in which facts are requested.
#[derive(Default)]
pub(super) struct StubLookups {
    pub(super) cars: HashMap<CarId, CarRecord>,
    pub(super) customers: HashMap<CustomerId, CustomerRecord>,
    pub(super) budgets: HashMap<BudgetId, BudgetRecord>,
    pub(super) calls: RefCell<Vec<&'static str>>,
}

impl StubLookups {
    pub(super) fn standard() -> Self {
        let mut lookups = Self::default();
        lookups.cars.insert(
            MAIN_DRIVER_CAR,
            CarRecord {
                id: MAIN_DRIVER_CAR,
                has_main_driver: true,
            },
        );
        lookups.cars.insert(
            SECONDARY_ONLY_CAR,
            CarRecord {
                id: SECONDARY_ONLY_CAR,
                has_main_driver: false,
            },
        );
        lookups
            .customers
            .insert(KNOWN_CUSTOMER, CustomerRecord { id: KNOWN_CUSTOMER });
        lookups.budgets.insert(
            KNOWN_BUDGET,
            BudgetRecord {
                id: KNOWN_BUDGET,
                car_id: MAIN_DRIVER_CAR,
                customer_id: KNOWN_CUSTOMER,
            },
        );
        lookups
    }

    pub(super) fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }
}

impl CarLookup for StubLookups {
    fn lookup_car(&self, id: CarId) -> Result<Option<CarRecord>, RepositoryError> {
        self.calls.borrow_mut().push("car");
        Ok(self.cars.get(&id).copied())
    }
}

impl CustomerLookup for StubLookups {
    fn lookup_customer(&self, id: CustomerId) -> Result<Option<CustomerRecord>, RepositoryError> {
        self.calls.borrow_mut().push("customer");
        Ok(self.customers.get(&id).copied())
    }
}

impl BudgetLookup for StubLookups {
    fn lookup_budget(&self, id: BudgetId) -> Result<Option<BudgetRecord>, RepositoryError> {
        self.calls.borrow_mut().push("budget");
        Ok(self.budgets.get(&id).copied())
    }
}

pub(super) struct OfflineLookups;

impl CarLookup for OfflineLookups {
    fn lookup_car(&self, _id: CarId) -> Result<Option<CarRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl CustomerLookup for OfflineLookups {
    fn lookup_customer(&self, _id: CustomerId) -> Result<Option<CustomerRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl BudgetLookup for OfflineLookups {
    fn lookup_budget(&self, _id: BudgetId) -> Result<Option<BudgetRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Entities seeded into a fresh store.
pub(super) struct Seeded {
    pub(super) customer: Customer,
    pub(super) main_driver: DriverId,
    pub(super) car_with_main_driver: CarId,
    pub(super) car_without_main_driver: CarId,
}

pub(super) fn new_driver(name: &str, document: &str) -> NewDriver {
    NewDriver {
        name: name.to_string(),
        document: document.to_string(),
        birthdate: date(1990, 5, 15),
    }
}

pub(super) fn corolla() -> NewCar {
    NewCar {
        manufacturer: "Toyota".to_string(),
        model: "Corolla".to_string(),
        release_year: 2020,
        fipe_value: dec!(60000.00),
    }
}

pub(super) fn civic() -> NewCar {
    NewCar {
        manufacturer: "Honda".to_string(),
        model: "Civic".to_string(),
        release_year: 2021,
        fipe_value: dec!(70000.00),
    }
}

pub(super) fn seed(store: &Arc<InMemoryInsuranceStore>) -> Seeded {
    let registry = RegistryService::new(Arc::clone(store));

    let main = registry
        .register_driver(new_driver("Main Driver", "98765432100"))
        .expect("driver registers");
    let secondary = registry
        .register_driver(new_driver("Secondary Driver", "11122233344"))
        .expect("driver registers");

    let customer = registry
        .register_customer(NewCustomer {
            name: "Test Customer".to_string(),
            email: Some("test@example.com".to_string()),
            document: Some("12345678900".to_string()),
            driver_id: Some(main.id),
        })
        .expect("customer registers");

    let with_main = registry.register_car(corolla()).expect("car registers");
    registry
        .assign_driver(with_main.id, main.id, true)
        .expect("main driver linked");

    let without_main = registry.register_car(civic()).expect("car registers");
    registry
        .assign_driver(without_main.id, secondary.id, false)
        .expect("secondary driver linked");

    Seeded {
        customer,
        main_driver: main.id,
        car_with_main_driver: with_main.id,
        car_without_main_driver: without_main.id,
    }
}

pub(super) fn budget_service(
    store: &Arc<InMemoryInsuranceStore>,
) -> BudgetService<InMemoryInsuranceStore> {
    BudgetService::with_clock(
        Arc::clone(store),
        ValidationConfig::default(),
        Arc::new(FixedClock(today())),
    )
}

pub(super) fn quoting_state(
    store: &Arc<InMemoryInsuranceStore>,
) -> QuotingState<InMemoryInsuranceStore> {
    QuotingState::with_clock(
        Arc::clone(store),
        ValidationConfig::default(),
        Arc::new(FixedClock(today())),
    )
}

pub(super) fn seeded_router() -> (axum::Router, Seeded) {
    let store = Arc::new(InMemoryInsuranceStore::new());
    let seeded = seed(&store);
    (quoting_router(quoting_state(&store)), seeded)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
