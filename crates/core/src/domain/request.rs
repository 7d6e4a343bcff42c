use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::offer::{LoanType, OfferId};
use crate::domain::profile::{LoanId, UserId};
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanRequestId(pub Uuid);

impl LoanRequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for LoanRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    NewLoan,
    SwitchLoan,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewLoan => "new_loan",
            Self::SwitchLoan => "switch_loan",
        }
    }
}

impl std::str::FromStr for RequestType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "new_loan" => Ok(Self::NewLoan),
            "switch_loan" => Ok(Self::SwitchLoan),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown request type `{other}`"
            ))),
        }
    }
}

/// `Pending` is the only state the ledger ever writes; the terminal states
/// are set by the external fulfillment process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown request status `{other}`"
            ))),
        }
    }
}

/// The persisted record of a user's decision to originate or switch a loan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub id: LoanRequestId,
    pub user_id: UserId,
    pub request_type: RequestType,
    pub loan_type: LoanType,
    /// Present exactly when `request_type` is `SwitchLoan`.
    pub from_loan_id: Option<LoanId>,
    pub to_loan_id: OfferId,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl LoanRequest {
    pub fn new_loan(user_id: UserId, loan_type: LoanType, to_loan_id: OfferId) -> Self {
        Self {
            id: LoanRequestId::generate(),
            user_id,
            request_type: RequestType::NewLoan,
            loan_type,
            from_loan_id: None,
            to_loan_id,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn switch_loan(
        user_id: UserId,
        loan_type: LoanType,
        from_loan_id: LoanId,
        to_loan_id: OfferId,
    ) -> Self {
        Self {
            id: LoanRequestId::generate(),
            user_id,
            request_type: RequestType::SwitchLoan,
            loan_type,
            from_loan_id: Some(from_loan_id),
            to_loan_id,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Checked when rows come back from the store, not in the ranking path.
    pub fn validate(&self) -> Result<(), DomainError> {
        match (self.request_type, self.from_loan_id) {
            (RequestType::SwitchLoan, None) => Err(DomainError::InvariantViolation(format!(
                "switch request {} is missing from_loan_id",
                self.id
            ))),
            (RequestType::NewLoan, Some(_)) => Err(DomainError::InvariantViolation(format!(
                "new-loan request {} carries a from_loan_id",
                self.id
            ))),
            _ => Ok(()),
        }
    }

    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        matches!(
            (self.status, next),
            (
                RequestStatus::Pending,
                RequestStatus::Approved | RequestStatus::Rejected | RequestStatus::Cancelled
            )
        )
    }

    pub fn transition_to(&mut self, next: RequestStatus) -> Result<(), DomainError> {
        if self.can_transition_to(next) {
            self.status = next;
            return Ok(());
        }

        Err(DomainError::InvalidRequestTransition { from: self.status, to: next })
    }
}
