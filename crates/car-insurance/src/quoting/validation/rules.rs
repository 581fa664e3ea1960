use chrono::{Months, NaiveDate};

use super::outcome::RejectionReason;

pub(crate) fn check_not_in_past(start: NaiveDate, today: NaiveDate) -> Result<(), RejectionReason> {
    if start < today {
        return Err(RejectionReason::StartInPast);
    }
    Ok(())
}

pub(crate) fn check_ordering(start: NaiveDate, end: NaiveDate) -> Result<(), RejectionReason> {
    if end < start {
        return Err(RejectionReason::EndBeforeStart);
    }
    Ok(())
}

/// Month arithmetic clamps to the end of the month, so a window opened on
/// 2024-02-29 may run until 2026-02-28.
pub(crate) fn check_span(
    start: NaiveDate,
    end: NaiveDate,
    max_months: u32,
) -> Result<(), RejectionReason> {
    match start.checked_add_months(Months::new(max_months)) {
        Some(limit) if end > limit => Err(RejectionReason::RangeTooLong),
        Some(_) | None => Ok(()),
    }
}
