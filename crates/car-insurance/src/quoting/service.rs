use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use super::domain::{
    Budget, BudgetId, BudgetRecord, BudgetRequest, CarId, CarRecord, CustomerId, CustomerRecord,
    NewBudget,
};
use super::repository::{
    BudgetRepository, CarRepository, CustomerRepository, InsuranceStore, RepositoryError,
};
use super::validation::{
    BudgetLookup, BudgetRequestValidator, CarLookup, CustomerLookup, RejectionReason,
    ValidationConfig, ValidationOutcome,
};

/// Source of "today" for past-date checks.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Adapts repository traits to the validator's lookup capabilities.
struct StoreLookup<'a, S: ?Sized>(&'a S);

impl<S: CarRepository + ?Sized> CarLookup for StoreLookup<'_, S> {
    fn lookup_car(&self, id: CarId) -> Result<Option<CarRecord>, RepositoryError> {
        let Some(car) = self.0.fetch_car(id)? else {
            return Ok(None);
        };
        let links = self.0.drivers_for(car.id)?;
        Ok(Some(CarRecord::from_links(car.id, &links)))
    }
}

impl<S: CustomerRepository + ?Sized> CustomerLookup for StoreLookup<'_, S> {
    fn lookup_customer(&self, id: CustomerId) -> Result<Option<CustomerRecord>, RepositoryError> {
        Ok(self
            .0
            .fetch_customer(id)?
            .map(|customer| CustomerRecord { id: customer.id }))
    }
}

impl<S: BudgetRepository + ?Sized> BudgetLookup for StoreLookup<'_, S> {
    fn lookup_budget(&self, id: BudgetId) -> Result<Option<BudgetRecord>, RepositoryError> {
        Ok(self.0.fetch_budget(id)?.as_ref().map(BudgetRecord::from))
    }
}

/// Service composing the store, the validator and a clock.
pub struct BudgetService<S> {
    store: Arc<S>,
    validator: Arc<BudgetRequestValidator>,
    clock: Arc<dyn Clock>,
}

impl<S> BudgetService<S>
where
    S: InsuranceStore + 'static,
{
    pub fn new(store: Arc<S>, config: ValidationConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, config: ValidationConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            validator: Arc::new(BudgetRequestValidator::new(config)),
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Runs the create-path validation without persisting anything.
    pub fn check(&self, request: &BudgetRequest) -> Result<ValidationOutcome, RepositoryError> {
        let lookup = StoreLookup(self.store.as_ref());
        self.validator
            .validate_for_create(request, self.today(), &lookup, &lookup)
    }

    /// Validate and persist a new budget.
    pub fn create(&self, request: BudgetRequest) -> Result<Budget, BudgetServiceError> {
        let today = self.today();
        let coverage = self.check(&request)?.into_result().map_err(|reason| {
            warn!(
                reason = reason.label(),
                car_id = ?request.car_id,
                customer_id = ?request.customer_id,
                "budget creation rejected"
            );
            reason
        })?;

        let (Some(car_id), Some(customer_id)) = (request.car_id, request.customer_id) else {
            return Err(RejectionReason::RequestMalformed.into());
        };

        let budget = self.store.insert_budget(NewBudget {
            car_id,
            customer_id,
            start_date: coverage.start_date,
            end_date: coverage.end_date,
            created_on: today,
        })?;

        info!(budget_id = %budget.id, %car_id, %customer_id, "budget created");
        Ok(budget)
    }

    /// Validate and apply a coverage change to an existing budget.
    ///
    /// A payload carrying any date replaces the stored window with exactly
    /// the dates supplied; a payload without dates leaves it untouched. Car
    /// and customer are never re-targeted by an update.
    pub fn update(&self, request: BudgetRequest) -> Result<Budget, BudgetServiceError> {
        let today = self.today();
        let lookup = StoreLookup(self.store.as_ref());
        let coverage = self
            .validator
            .validate_for_update(&request, today, &lookup)?
            .into_result()
            .map_err(|reason| {
                warn!(
                    reason = reason.label(),
                    budget_id = ?request.budget_id,
                    "budget update rejected"
                );
                reason
            })?;

        let budget_id = request.budget_id.ok_or(RejectionReason::RequestMalformed)?;
        let mut budget = self
            .store
            .fetch_budget(budget_id)?
            .ok_or(RejectionReason::BudgetNotFound)?;

        if request.start_date.is_some() || request.end_date.is_some() {
            budget.start_date = coverage.start_date;
            budget.end_date = coverage.end_date;
        } else {
            debug!(%budget_id, "update carried no coverage dates");
        }
        budget.updated_on = Some(today);

        let stored = self.store.update_budget(budget)?;
        info!(budget_id = %stored.id, "budget updated");
        Ok(stored)
    }

    pub fn get(&self, id: BudgetId) -> Result<Budget, BudgetServiceError> {
        let budget = self
            .store
            .fetch_budget(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(budget)
    }
}

/// Error raised by the budget service.
#[derive(Debug, thiserror::Error)]
pub enum BudgetServiceError {
    #[error(transparent)]
    Rejected(#[from] RejectionReason),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
