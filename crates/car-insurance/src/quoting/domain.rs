use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier assigned to a customer by the store.
    CustomerId
);
entity_id!(
    /// Identifier assigned to a driver by the store.
    DriverId
);
entity_id!(
    /// Identifier assigned to a car by the store.
    CarId
);
entity_id!(
    /// Identifier assigned to a budget by the store.
    BudgetId
);

/// Person allowed to drive an insured car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub document: String,
    pub birthdate: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDriver {
    pub name: String,
    pub document: String,
    pub birthdate: NaiveDate,
}

/// Policy holder requesting budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<DriverId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub driver_id: Option<DriverId>,
}

/// Vehicle being insured. `fipe_value` is the market reference price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: CarId,
    pub manufacturer: String,
    pub model: String,
    pub release_year: u16,
    pub fipe_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCar {
    pub manufacturer: String,
    pub model: String,
    pub release_year: u16,
    pub fipe_value: Decimal,
}

/// Association between a car and one of its drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDriver {
    pub car_id: CarId,
    pub driver_id: DriverId,
    pub main_driver: bool,
}

/// Persisted insurance budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,
    pub car_id: CarId,
    pub customer_id: CustomerId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBudget {
    pub car_id: CarId,
    pub customer_id: CustomerId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_on: NaiveDate,
}

/// Incoming create/update payload. Every field is optional at the decoding
/// layer; the validator decides which ones an operation requires. Dates stay
/// raw so that format errors surface as validation reasons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    #[serde(default)]
    pub car_id: Option<CarId>,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub budget_id: Option<BudgetId>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl BudgetRequest {
    pub fn for_create(car_id: CarId, customer_id: CustomerId) -> Self {
        Self {
            car_id: Some(car_id),
            customer_id: Some(customer_id),
            ..Self::default()
        }
    }

    pub fn for_update(budget_id: BudgetId) -> Self {
        Self {
            budget_id: Some(budget_id),
            ..Self::default()
        }
    }

    pub fn with_start_date(mut self, raw: impl Into<String>) -> Self {
        self.start_date = Some(raw.into());
        self
    }

    pub fn with_end_date(mut self, raw: impl Into<String>) -> Self {
        self.end_date = Some(raw.into());
        self
    }
}

/// Facts the validator needs about a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarRecord {
    pub id: CarId,
    pub has_main_driver: bool,
}

impl CarRecord {
    /// A car qualifies only when exactly one of its links is flagged main.
    pub fn from_links(id: CarId, links: &[CarDriver]) -> Self {
        let mains = links
            .iter()
            .filter(|link| link.car_id == id && link.main_driver)
            .count();
        Self {
            id,
            has_main_driver: mains == 1,
        }
    }

    pub fn has_main_driver(&self) -> bool {
        self.has_main_driver
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerRecord {
    pub id: CustomerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetRecord {
    pub id: BudgetId,
    pub car_id: CarId,
    pub customer_id: CustomerId,
}

impl From<&Budget> for BudgetRecord {
    fn from(budget: &Budget) -> Self {
        Self {
            id: budget.id,
            car_id: budget.car_id,
            customer_id: budget.customer_id,
        }
    }
}
