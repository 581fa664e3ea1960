use crate::infra::{seed_sample_data, SampleData};
use car_insurance::error::AppError;
use car_insurance::quoting::{
    BudgetRequest, BudgetService, BudgetServiceError, CarId, CustomerId, FixedClock,
    InMemoryInsuranceStore, RegistryService, RejectionReason, ValidationConfig, ValidationOutcome,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct BudgetCheckArgs {
    /// Car to quote. Defaults to the sample car with a main driver.
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) car_id: Option<i64>,
    /// Customer requesting the quote. Defaults to the sample customer.
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) customer_id: Option<i64>,
    /// Coverage start, as sent by a client (date or timestamp)
    #[arg(long)]
    pub(crate) start_date: Option<String>,
    /// Coverage end, as sent by a client (date or timestamp)
    #[arg(long)]
    pub(crate) end_date: Option<String>,
    /// Evaluation date (YYYY-MM-DD). Defaults to the local date.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to 2025-01-01 so every scenario is reproducible.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

fn sample_service(
    today: NaiveDate,
) -> Result<(BudgetService<InMemoryInsuranceStore>, SampleData), AppError> {
    let store = Arc::new(InMemoryInsuranceStore::new());
    let sample = seed_sample_data(&RegistryService::new(Arc::clone(&store)))?;
    let service = BudgetService::with_clock(
        store,
        ValidationConfig::default(),
        Arc::new(FixedClock(today)),
    );
    Ok((service, sample))
}

pub(crate) fn run_budget_check(args: BudgetCheckArgs) -> Result<(), AppError> {
    let BudgetCheckArgs {
        car_id,
        customer_id,
        start_date,
        end_date,
        today,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let (service, sample) = sample_service(today)?;

    let request = BudgetRequest {
        car_id: Some(car_id.map(CarId).unwrap_or(sample.car_with_main_driver)),
        customer_id: Some(customer_id.map(CustomerId).unwrap_or(sample.customer)),
        start_date,
        end_date,
        ..BudgetRequest::default()
    };

    println!("Budget check (evaluated {today})");
    println!(
        "Sample data: customer {} | car {} (main driver) | car {} (secondary driver only)",
        sample.customer, sample.car_with_main_driver, sample.car_without_main_driver
    );

    match service.check(&request)? {
        ValidationOutcome::Accepted(coverage) => {
            println!(
                "Accepted: coverage {} -> {}",
                render_date(coverage.start_date),
                render_date(coverage.end_date)
            );
            Ok(())
        }
        ValidationOutcome::Rejected(reason) => {
            println!("Rejected [{}]: {}", reason.label(), reason);
            Err(BudgetServiceError::Rejected(reason).into())
        }
    }
}

fn render_date(date: Option<NaiveDate>) -> String {
    date.map(|date| date.to_string())
        .unwrap_or_else(|| "open".to_string())
}

#[derive(Debug)]
pub(crate) struct DemoScenario {
    pub(crate) label: &'static str,
    pub(crate) request: BudgetRequest,
    pub(crate) expected: Option<RejectionReason>,
}

pub(crate) fn demo_scenarios(sample: &SampleData) -> Vec<DemoScenario> {
    let quotable = || BudgetRequest::for_create(sample.car_with_main_driver, sample.customer);
    let dated = |start: Option<&str>, end: Option<&str>| BudgetRequest {
        start_date: start.map(str::to_string),
        end_date: end.map(str::to_string),
        ..quotable()
    };

    vec![
        DemoScenario {
            label: "car with main driver, no dates",
            request: quotable(),
            expected: None,
        },
        DemoScenario {
            label: "unknown customer",
            request: BudgetRequest::for_create(sample.car_with_main_driver, CustomerId(-1)),
            expected: Some(RejectionReason::CustomerNotFound),
        },
        DemoScenario {
            label: "unknown car",
            request: BudgetRequest::for_create(CarId(999_999), sample.customer),
            expected: Some(RejectionReason::CarNotFound),
        },
        DemoScenario {
            label: "car without main driver",
            request: BudgetRequest::for_create(sample.car_without_main_driver, sample.customer),
            expected: Some(RejectionReason::NoMainDriver),
        },
        DemoScenario {
            label: "impossible start date",
            request: dated(Some("2025-99-99"), None),
            expected: Some(RejectionReason::InvalidStartDate),
        },
        DemoScenario {
            label: "unparseable end date",
            request: dated(Some("2025-01-01"), Some("invalid-date-format")),
            expected: Some(RejectionReason::InvalidEndDate),
        },
        DemoScenario {
            label: "end before start",
            request: dated(Some("2025-06-01"), Some("2025-05-01")),
            expected: Some(RejectionReason::EndBeforeStart),
        },
        DemoScenario {
            label: "start in the past",
            request: dated(Some("2020-01-01"), Some("2026-01-01")),
            expected: Some(RejectionReason::StartInPast),
        },
        DemoScenario {
            label: "coverage longer than two years",
            request: dated(Some("2025-05-01"), Some("2028-05-01")),
            expected: Some(RejectionReason::RangeTooLong),
        },
        DemoScenario {
            label: "end date without start date",
            request: dated(None, Some("2026-01-01")),
            expected: Some(RejectionReason::RequestMalformed),
        },
        DemoScenario {
            label: "timestamp with impossible offset",
            request: dated(Some("2025-05-01T00:00:00+99:99"), Some("2026-05-01")),
            expected: Some(RejectionReason::InvalidStartDate),
        },
        DemoScenario {
            label: "month 13",
            request: dated(Some("2025-13-01"), Some("2026-01-01")),
            expected: Some(RejectionReason::InvalidStartDate),
        },
        DemoScenario {
            label: "February 30",
            request: dated(Some("2025-02-30"), Some("2026-01-01")),
            expected: Some(RejectionReason::InvalidStartDate),
        },
        DemoScenario {
            label: "exactly two years of coverage",
            request: dated(Some("2025-05-01"), Some("2027-05-01")),
            expected: None,
        },
    ]
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(demo_today);
    let (service, sample) = sample_service(today)?;

    println!("Budget validation demo (evaluated {today})");
    let mut mismatches = 0usize;
    for scenario in demo_scenarios(&sample) {
        let outcome = service.check(&scenario.request)?;
        let verdict = match outcome.rejection() {
            None => "accepted".to_string(),
            Some(reason) => format!("rejected: {} ({})", reason, reason.label()),
        };
        let marker = if outcome.rejection() == scenario.expected {
            "ok"
        } else {
            mismatches += 1;
            "UNEXPECTED"
        };
        println!("- [{marker}] {} -> {verdict}", scenario.label);
    }

    if mismatches > 0 {
        println!("{mismatches} scenario(s) behaved differently on {today}");
        return Err(AppError::ScenarioMismatch {
            mismatched: mismatches,
        });
    }
    Ok(())
}

fn demo_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_else(|| Local::now().date_naive())
}
