use async_trait::async_trait;
use thiserror::Error;

use sahiloan_core::domain::offer::{MarketOffer, OfferId};
use sahiloan_core::domain::profile::UserId;
use sahiloan_core::domain::request::{LoanRequest, LoanRequestId};
use sahiloan_core::matching::catalog::OfferQuery;

pub mod memory;
pub mod offer;
pub mod request;

pub use memory::{InMemoryOfferRepository, InMemoryRequestRepository};
pub use offer::SqlOfferRepository;
pub use request::SqlRequestRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("unique constraint violated on {0}")]
    UniqueViolation(String),
}

/// Range-and-filter queries plus the CRUD surface the catalog ingestion
/// process uses. The matching engine itself only ever calls `query`.
#[async_trait]
pub trait OfferRepository: Send + Sync {
    async fn query(&self, query: &OfferQuery) -> Result<Vec<MarketOffer>, RepositoryError>;
    async fn find_by_id(&self, id: &OfferId) -> Result<Option<MarketOffer>, RepositoryError>;
    async fn save(&self, offer: MarketOffer) -> Result<(), RepositoryError>;
    async fn list_active(&self) -> Result<Vec<MarketOffer>, RepositoryError>;
}

/// Insert honors the store-level uniqueness of `to_loan_id`; a violated
/// constraint surfaces as [`RepositoryError::UniqueViolation`] and is the
/// authoritative duplicate signal.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn insert(&self, request: &LoanRequest) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: &LoanRequestId)
        -> Result<Option<LoanRequest>, RepositoryError>;
    async fn find_by_target(
        &self,
        to_loan_id: &OfferId,
    ) -> Result<Option<LoanRequest>, RepositoryError>;
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<LoanRequest>, RepositoryError>;
}
