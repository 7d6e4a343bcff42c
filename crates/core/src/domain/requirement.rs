use serde::{Deserialize, Serialize};

use crate::domain::offer::LoanType;
use crate::domain::profile::ExistingLoan;

/// How far below the current rate a refinance query aims, in percentage
/// points. The advisory flow targets "1-2% lower"; this is the midpoint.
pub const REFINANCE_RATE_BIAS: f64 = 1.5;

/// The caller's structured ask. Built per query and never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoanRequirement {
    pub loan_type: LoanType,
    pub amount: f64,
    pub tenure_years: u32,
    /// Ceiling the offer's rate band must cover.
    pub desired_rate: f64,
    /// Case-insensitive substring match against the offer's lender name.
    pub preferred_lender: Option<String>,
}

impl LoanRequirement {
    /// Derives the catalog query for refinancing an existing loan: same
    /// type, outstanding balance, remaining tenure rounded up to whole
    /// years, and a rate aimed [`REFINANCE_RATE_BIAS`] below the current one.
    pub fn for_refinance(existing: &ExistingLoan) -> Self {
        Self {
            loan_type: existing.loan_type.clone(),
            amount: existing.current_balance,
            tenure_years: existing.remaining_months.div_ceil(12),
            desired_rate: existing.current_rate - REFINANCE_RATE_BIAS,
            preferred_lender: None,
        }
    }
}
