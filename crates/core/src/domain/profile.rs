use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::offer::LoanType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(pub Uuid);

impl LoanId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for LoanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A loan the user already holds, as reported by the profile gateway.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExistingLoan {
    pub id: LoanId,
    pub lender: String,
    pub loan_type: LoanType,
    pub current_balance: f64,
    /// Percent per annum on the outstanding balance.
    pub current_rate: f64,
    pub remaining_months: u32,
}

/// Supplied by the external profile gateway, keyed by verified phone number.
/// Read-only input to the matching core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub full_name: String,
    pub phone_number: String,
    pub cibil_score: u16,
    pub loans: Vec<ExistingLoan>,
}

impl UserProfile {
    pub fn loan(&self, id: &LoanId) -> Option<&ExistingLoan> {
        self.loans.iter().find(|loan| &loan.id == id)
    }
}
