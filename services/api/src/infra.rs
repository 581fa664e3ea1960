use car_insurance::quoting::{
    CarId, CustomerId, InsuranceStore, NewCar, NewCustomer, NewDriver, RegistryError,
    RegistryService,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Identifiers of the sample entities loaded by `seed_sample_data`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SampleData {
    pub(crate) customer: CustomerId,
    pub(crate) car_with_main_driver: CarId,
    pub(crate) car_without_main_driver: CarId,
}

/// Two drivers, one customer, and two cars: one with a main driver, one
/// whose only driver is secondary.
pub(crate) fn seed_sample_data<S>(registry: &RegistryService<S>) -> Result<SampleData, RegistryError>
where
    S: InsuranceStore + 'static,
{
    let main = registry.register_driver(NewDriver {
        name: "Main Driver".to_string(),
        document: "98765432100".to_string(),
        birthdate: sample_date(1990, 5, 15),
    })?;
    let secondary = registry.register_driver(NewDriver {
        name: "Secondary Driver".to_string(),
        document: "11122233344".to_string(),
        birthdate: sample_date(1985, 10, 20),
    })?;

    let customer = registry.register_customer(NewCustomer {
        name: "Financial Client".to_string(),
        email: Some("financialclient@email.com".to_string()),
        document: Some("12345678900".to_string()),
        driver_id: Some(main.id),
    })?;

    let corolla = registry.register_car(NewCar {
        manufacturer: "Toyota".to_string(),
        model: "Corolla".to_string(),
        release_year: 2020,
        fipe_value: Decimal::new(6_000_000, 2),
    })?;
    registry.assign_driver(corolla.id, main.id, true)?;

    let civic = registry.register_car(NewCar {
        manufacturer: "Honda".to_string(),
        model: "Civic".to_string(),
        release_year: 2021,
        fipe_value: Decimal::new(7_000_000, 2),
    })?;
    registry.assign_driver(civic.id, secondary.id, false)?;

    Ok(SampleData {
        customer: customer.id,
        car_with_main_driver: corolla.id,
        car_without_main_driver: civic.id,
    })
}

// Fixed calendar values; `from_ymd_opt` only fails on impossible dates.
fn sample_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
