use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Result of validating a budget request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationOutcome {
    Accepted(ValidatedCoverage),
    Rejected(RejectionReason),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            ValidationOutcome::Accepted(_) => None,
            ValidationOutcome::Rejected(reason) => Some(*reason),
        }
    }

    pub fn into_result(self) -> Result<ValidatedCoverage, RejectionReason> {
        match self {
            ValidationOutcome::Accepted(coverage) => Ok(coverage),
            ValidationOutcome::Rejected(reason) => Err(reason),
        }
    }
}

impl From<Result<ValidatedCoverage, RejectionReason>> for ValidationOutcome {
    fn from(value: Result<ValidatedCoverage, RejectionReason>) -> Self {
        match value {
            Ok(coverage) => ValidationOutcome::Accepted(coverage),
            Err(reason) => ValidationOutcome::Rejected(reason),
        }
    }
}

/// Coverage window as parsed from an accepted request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedCoverage {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// The single reason a request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    #[error("request is missing a required identifier or pairs an end date with no start date")]
    RequestMalformed,
    #[error("car not found")]
    CarNotFound,
    #[error("customer not found")]
    CustomerNotFound,
    #[error("car has no main driver registered")]
    NoMainDriver,
    #[error("budget not found")]
    BudgetNotFound,
    #[error("start date is not a valid calendar date")]
    InvalidStartDate,
    #[error("end date is not a valid calendar date")]
    InvalidEndDate,
    #[error("end date is before start date")]
    EndBeforeStart,
    #[error("start date is in the past")]
    StartInPast,
    #[error("coverage period exceeds the allowed maximum")]
    RangeTooLong,
}

/// Coarse grouping used by callers that map reasons onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    Malformed,
    MissingEntity,
    NoMainDriver,
    InvalidDates,
}

impl RejectionReason {
    pub fn kind(&self) -> RejectionKind {
        match self {
            RejectionReason::RequestMalformed => RejectionKind::Malformed,
            RejectionReason::CarNotFound
            | RejectionReason::CustomerNotFound
            | RejectionReason::BudgetNotFound => RejectionKind::MissingEntity,
            RejectionReason::NoMainDriver => RejectionKind::NoMainDriver,
            RejectionReason::InvalidStartDate
            | RejectionReason::InvalidEndDate
            | RejectionReason::EndBeforeStart
            | RejectionReason::StartInPast
            | RejectionReason::RangeTooLong => RejectionKind::InvalidDates,
        }
    }

    /// Stable snake_case label, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            RejectionReason::RequestMalformed => "request_malformed",
            RejectionReason::CarNotFound => "car_not_found",
            RejectionReason::CustomerNotFound => "customer_not_found",
            RejectionReason::NoMainDriver => "no_main_driver",
            RejectionReason::BudgetNotFound => "budget_not_found",
            RejectionReason::InvalidStartDate => "invalid_start_date",
            RejectionReason::InvalidEndDate => "invalid_end_date",
            RejectionReason::EndBeforeStart => "end_before_start",
            RejectionReason::StartInPast => "start_in_past",
            RejectionReason::RangeTooLong => "range_too_long",
        }
    }
}
