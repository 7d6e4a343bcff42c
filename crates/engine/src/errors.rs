use thiserror::Error;

use sahiloan_core::domain::offer::OfferId;
use sahiloan_core::domain::request::LoanRequestId;
use sahiloan_core::DomainError;
use sahiloan_db::repositories::RepositoryError;

use crate::gateway::GatewayError;

/// The error surface the caller sees. An empty ranking or analysis result
/// is a success value, never one of these.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Recoverable by the caller: re-prompt for corrected input.
    #[error("{entity} `{id}` was not found")]
    NotFound { entity: &'static str, id: String },
    /// Malformed or logically inconsistent request; never retried.
    #[error("invalid request: {0}")]
    Validation(String),
    /// The target offer is already claimed; carries the existing request so
    /// the caller can short-circuit instead of retrying.
    #[error("offer `{to_loan_id}` is already claimed by request `{existing_request_id}`")]
    DuplicateTarget { to_loan_id: OfferId, existing_request_id: LoanRequestId },
    /// The store failed or timed out. Retry policy belongs to the caller;
    /// the engine is single-attempt.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

// Unique violations are intercepted at the ledger's insert path and turned
// into `DuplicateTarget`; any that reach this blanket mapping came from a
// path where a duplicate is not a defined outcome.
impl From<RepositoryError> for EngineError {
    fn from(error: RepositoryError) -> Self {
        Self::StorageUnavailable(error.to_string())
    }
}

impl From<GatewayError> for EngineError {
    fn from(error: GatewayError) -> Self {
        Self::StorageUnavailable(error.to_string())
    }
}

impl From<DomainError> for EngineError {
    fn from(error: DomainError) -> Self {
        Self::Validation(error.to_string())
    }
}
