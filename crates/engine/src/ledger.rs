use std::sync::Arc;

use tracing::{info, warn};

use sahiloan_core::domain::offer::{LoanType, OfferId};
use sahiloan_core::domain::profile::{LoanId, UserId, UserProfile};
use sahiloan_core::domain::request::{LoanRequest, LoanRequestId};
use sahiloan_db::repositories::{RepositoryError, RequestRepository};

use crate::errors::EngineError;
use crate::gateway::ProfileGateway;

/// Creates `pending` loan requests, enforcing one claim per target offer.
/// The store's unique index is the authoritative duplicate signal; the
/// pre-check here only short-circuits the common case with a better error.
pub struct RequestLedger {
    requests: Arc<dyn RequestRepository>,
    profiles: Arc<dyn ProfileGateway>,
}

impl RequestLedger {
    pub fn new(requests: Arc<dyn RequestRepository>, profiles: Arc<dyn ProfileGateway>) -> Self {
        Self { requests, profiles }
    }

    pub async fn create_new_loan_request(
        &self,
        user_id: &UserId,
        to_offer_id: &OfferId,
        loan_type: LoanType,
    ) -> Result<LoanRequestId, EngineError> {
        info!(
            event_name = "ledger.create_new_loan_request",
            user_id = %user_id,
            to_loan_id = %to_offer_id,
            loan_type = %loan_type,
            "creating new-loan request"
        );

        self.resolve_user(user_id).await?;
        self.ensure_target_free(to_offer_id).await?;

        let request = LoanRequest::new_loan(*user_id, loan_type, *to_offer_id);
        self.persist(request).await
    }

    pub async fn create_switch_request(
        &self,
        user_id: &UserId,
        loan_type: LoanType,
        from_loan_id: Option<LoanId>,
        to_offer_id: &OfferId,
    ) -> Result<LoanRequestId, EngineError> {
        info!(
            event_name = "ledger.create_switch_request",
            user_id = %user_id,
            to_loan_id = %to_offer_id,
            loan_type = %loan_type,
            "creating switch request"
        );

        let profile = self.resolve_user(user_id).await?;
        let from_loan_id = from_loan_id.ok_or_else(|| {
            EngineError::Validation(
                "switch requests must name the existing loan being replaced".to_string(),
            )
        })?;
        if profile.loan(&from_loan_id).is_none() {
            return Err(EngineError::NotFound { entity: "loan", id: from_loan_id.to_string() });
        }
        self.ensure_target_free(to_offer_id).await?;

        let request = LoanRequest::switch_loan(*user_id, loan_type, from_loan_id, *to_offer_id);
        self.persist(request).await
    }

    async fn resolve_user(&self, user_id: &UserId) -> Result<UserProfile, EngineError> {
        self.profiles
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| EngineError::NotFound { entity: "user", id: user_id.to_string() })
    }

    async fn ensure_target_free(&self, to_offer_id: &OfferId) -> Result<(), EngineError> {
        if let Some(existing) = self.requests.find_by_target(to_offer_id).await? {
            return Err(EngineError::DuplicateTarget {
                to_loan_id: *to_offer_id,
                existing_request_id: existing.id,
            });
        }
        Ok(())
    }

    async fn persist(&self, request: LoanRequest) -> Result<LoanRequestId, EngineError> {
        let request_id = request.id;
        match self.requests.insert(&request).await {
            Ok(()) => {
                info!(
                    event_name = "ledger.request_created",
                    request_id = %request_id,
                    to_loan_id = %request.to_loan_id,
                    "loan request created"
                );
                Ok(request_id)
            }
            Err(RepositoryError::UniqueViolation(_)) => {
                // Lost a race after the pre-check; re-read to report the
                // winning request's id.
                warn!(
                    event_name = "ledger.duplicate_target",
                    to_loan_id = %request.to_loan_id,
                    "target offer claimed concurrently"
                );
                match self.requests.find_by_target(&request.to_loan_id).await? {
                    Some(existing) => Err(EngineError::DuplicateTarget {
                        to_loan_id: request.to_loan_id,
                        existing_request_id: existing.id,
                    }),
                    None => Err(EngineError::StorageUnavailable(
                        "conflicting loan request could not be re-read after insert was rejected"
                            .to_string(),
                    )),
                }
            }
            Err(other) => Err(other.into()),
        }
    }
}
