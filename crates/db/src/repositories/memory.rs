use std::collections::HashMap;

use tokio::sync::RwLock;

use sahiloan_core::domain::offer::{MarketOffer, OfferId};
use sahiloan_core::domain::profile::UserId;
use sahiloan_core::domain::request::{LoanRequest, LoanRequestId};
use sahiloan_core::matching::catalog::{filter_offers, OfferQuery};

use super::{OfferRepository, RepositoryError, RequestRepository};

#[derive(Default)]
pub struct InMemoryOfferRepository {
    offers: RwLock<HashMap<OfferId, MarketOffer>>,
}

impl InMemoryOfferRepository {
    pub fn with_offers(offers: Vec<MarketOffer>) -> Self {
        let offers = offers.into_iter().map(|offer| (offer.id, offer)).collect();
        Self { offers: RwLock::new(offers) }
    }
}

#[async_trait::async_trait]
impl OfferRepository for InMemoryOfferRepository {
    async fn query(&self, query: &OfferQuery) -> Result<Vec<MarketOffer>, RepositoryError> {
        let offers = self.offers.read().await;
        let all: Vec<MarketOffer> = offers.values().cloned().collect();
        Ok(filter_offers(&all, query))
    }

    async fn find_by_id(&self, id: &OfferId) -> Result<Option<MarketOffer>, RepositoryError> {
        let offers = self.offers.read().await;
        Ok(offers.get(id).cloned())
    }

    async fn save(&self, offer: MarketOffer) -> Result<(), RepositoryError> {
        offer.validate().map_err(|error| RepositoryError::Decode(error.to_string()))?;
        let mut offers = self.offers.write().await;
        offers.insert(offer.id, offer);
        Ok(())
    }

    async fn list_active(&self) -> Result<Vec<MarketOffer>, RepositoryError> {
        let offers = self.offers.read().await;
        Ok(offers.values().filter(|offer| offer.active).cloned().collect())
    }
}

#[derive(Default)]
pub struct InMemoryRequestRepository {
    requests: RwLock<HashMap<LoanRequestId, LoanRequest>>,
}

#[async_trait::async_trait]
impl RequestRepository for InMemoryRequestRepository {
    async fn insert(&self, request: &LoanRequest) -> Result<(), RepositoryError> {
        // The duplicate check and the insert share one write-lock critical
        // section, matching the atomicity of the SQL unique index.
        let mut requests = self.requests.write().await;
        if requests.values().any(|existing| existing.to_loan_id == request.to_loan_id) {
            return Err(RepositoryError::UniqueViolation(
                "loan_requests.to_loan_id".to_string(),
            ));
        }
        requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &LoanRequestId,
    ) -> Result<Option<LoanRequest>, RepositoryError> {
        let requests = self.requests.read().await;
        Ok(requests.get(id).cloned())
    }

    async fn find_by_target(
        &self,
        to_loan_id: &OfferId,
    ) -> Result<Option<LoanRequest>, RepositoryError> {
        let requests = self.requests.read().await;
        Ok(requests.values().find(|request| &request.to_loan_id == to_loan_id).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<LoanRequest>, RepositoryError> {
        let requests = self.requests.read().await;
        let mut owned: Vec<LoanRequest> =
            requests.values().filter(|request| &request.user_id == user_id).cloned().collect();
        owned.sort_by_key(|request| request.created_at);
        Ok(owned)
    }
}
