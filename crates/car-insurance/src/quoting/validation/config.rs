use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_COVERAGE_MONTHS: u32 = 24;

/// Limits applied by the budget validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Longest allowed distance between start and end date, in calendar months.
    pub max_coverage_months: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_coverage_months: DEFAULT_MAX_COVERAGE_MONTHS,
        }
    }
}
