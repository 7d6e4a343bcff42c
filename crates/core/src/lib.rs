pub mod config;
pub mod domain;
pub mod errors;
pub mod matching;

pub use domain::offer::{LoanType, MarketOffer, OfferId};
pub use domain::profile::{ExistingLoan, LoanId, UserId, UserProfile};
pub use domain::request::{LoanRequest, LoanRequestId, RequestStatus, RequestType};
pub use domain::requirement::{LoanRequirement, REFINANCE_RATE_BIAS};
pub use errors::DomainError;
pub use matching::catalog::{filter_offers, OfferQuery, MAX_CATALOG_RESULTS};
pub use matching::ranking::{rank_offers, RankedOffer, MAX_RANKED_RESULTS};
pub use matching::refinance::{analyze_refinance, monthly_emi, RefinanceSavings};
