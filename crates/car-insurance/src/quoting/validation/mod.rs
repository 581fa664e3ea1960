mod config;
mod outcome;
pub(crate) mod rules;

pub use config::{ValidationConfig, DEFAULT_MAX_COVERAGE_MONTHS};
pub use outcome::{RejectionKind, RejectionReason, ValidatedCoverage, ValidationOutcome};

use chrono::NaiveDate;

use super::dates::parse_coverage_date;
use super::domain::{
    BudgetId, BudgetRecord, BudgetRequest, CarId, CarRecord, CustomerId, CustomerRecord,
};
use super::repository::RepositoryError;

/// Resolves car facts. `Ok(None)` means the car does not exist.
pub trait CarLookup {
    fn lookup_car(&self, id: CarId) -> Result<Option<CarRecord>, RepositoryError>;
}

pub trait CustomerLookup {
    fn lookup_customer(&self, id: CustomerId) -> Result<Option<CustomerRecord>, RepositoryError>;
}

pub trait BudgetLookup {
    fn lookup_budget(&self, id: BudgetId) -> Result<Option<BudgetRecord>, RepositoryError>;
}

/// Stateless decision procedure for budget create and update requests.
///
/// Checks run in a fixed order and stop at the first failure, so every
/// rejection carries exactly one reason. Lookup failures are returned as
/// `Err` untouched; they are never converted into a rejection.
#[derive(Debug, Clone, Default)]
pub struct BudgetRequestValidator {
    config: ValidationConfig,
}

impl BudgetRequestValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate_for_create<C, U>(
        &self,
        request: &BudgetRequest,
        today: NaiveDate,
        cars: &C,
        customers: &U,
    ) -> Result<ValidationOutcome, RepositoryError>
    where
        C: CarLookup + ?Sized,
        U: CustomerLookup + ?Sized,
    {
        let (Some(car_id), Some(customer_id)) = (request.car_id, request.customer_id) else {
            return Ok(ValidationOutcome::Rejected(RejectionReason::RequestMalformed));
        };

        if customers.lookup_customer(customer_id)?.is_none() {
            return Ok(ValidationOutcome::Rejected(RejectionReason::CustomerNotFound));
        }

        let Some(car) = cars.lookup_car(car_id)? else {
            return Ok(ValidationOutcome::Rejected(RejectionReason::CarNotFound));
        };

        if !car.has_main_driver() {
            return Ok(ValidationOutcome::Rejected(RejectionReason::NoMainDriver));
        }

        Ok(self.coverage(request, today).into())
    }

    pub fn validate_for_update<B>(
        &self,
        request: &BudgetRequest,
        today: NaiveDate,
        budgets: &B,
    ) -> Result<ValidationOutcome, RepositoryError>
    where
        B: BudgetLookup + ?Sized,
    {
        let Some(budget_id) = request.budget_id else {
            return Ok(ValidationOutcome::Rejected(RejectionReason::RequestMalformed));
        };

        if budgets.lookup_budget(budget_id)?.is_none() {
            return Ok(ValidationOutcome::Rejected(RejectionReason::BudgetNotFound));
        }

        Ok(self.coverage(request, today).into())
    }

    fn coverage(
        &self,
        request: &BudgetRequest,
        today: NaiveDate,
    ) -> Result<ValidatedCoverage, RejectionReason> {
        let start_date = request
            .start_date
            .as_deref()
            .map(parse_coverage_date)
            .transpose()
            .map_err(|_| RejectionReason::InvalidStartDate)?;
        let end_date = request
            .end_date
            .as_deref()
            .map(parse_coverage_date)
            .transpose()
            .map_err(|_| RejectionReason::InvalidEndDate)?;

        if end_date.is_some() && start_date.is_none() {
            return Err(RejectionReason::RequestMalformed);
        }

        if let Some(start) = start_date {
            rules::check_not_in_past(start, today)?;
        }

        if let (Some(start), Some(end)) = (start_date, end_date) {
            rules::check_ordering(start, end)?;
            rules::check_span(start, end, self.config.max_coverage_months)?;
        }

        Ok(ValidatedCoverage {
            start_date,
            end_date,
        })
    }
}
