use std::sync::Arc;

use tracing::info;

use sahiloan_core::domain::profile::{ExistingLoan, UserProfile};
use sahiloan_core::domain::requirement::LoanRequirement;
use sahiloan_core::matching::catalog::OfferQuery;
use sahiloan_core::matching::ranking::{rank_offers, RankedOffer};
use sahiloan_core::matching::refinance::analyze_refinance;
use sahiloan_db::repositories::OfferRepository;

use crate::errors::EngineError;

/// Read-only offer matching over an injected catalog store. Safe to share
/// across any number of concurrent requests.
pub struct MatchingService {
    offers: Arc<dyn OfferRepository>,
}

impl MatchingService {
    pub fn new(offers: Arc<dyn OfferRepository>) -> Self {
        Self { offers }
    }

    /// Catalog query plus ranking: at most 3 offers, cheapest headline rate
    /// first. An empty list means no suitable loans, not a failure.
    pub async fn query_offers(
        &self,
        requirement: &LoanRequirement,
    ) -> Result<Vec<RankedOffer>, EngineError> {
        info!(
            event_name = "matching.query_offers",
            loan_type = %requirement.loan_type,
            amount = requirement.amount,
            desired_rate = requirement.desired_rate,
            tenure_years = requirement.tenure_years,
            "querying market offers"
        );

        let candidates = self.offers.query(&OfferQuery::from(requirement)).await?;
        let ranked = rank_offers(candidates);
        info!(
            event_name = "matching.query_offers.done",
            matched = ranked.len(),
            "ranked market offers"
        );
        Ok(ranked)
    }

    /// Refinance comparison for one of the user's existing loans. Only
    /// offers strictly cheaper than the current rate come back, with
    /// savings and break-even attached. Empty means no better rates found.
    pub async fn analyze_refinance(
        &self,
        existing: &ExistingLoan,
        profile: &UserProfile,
    ) -> Result<Vec<RankedOffer>, EngineError> {
        let requirement = LoanRequirement::for_refinance(existing);
        info!(
            event_name = "matching.analyze_refinance",
            user_id = %profile.id,
            cibil_score = profile.cibil_score,
            from_loan = %existing.id,
            current_rate = existing.current_rate,
            target_rate = requirement.desired_rate,
            "analyzing refinance candidates"
        );

        let candidates = self.offers.query(&OfferQuery::from(&requirement)).await?;
        let ranked = analyze_refinance(existing, candidates);
        info!(
            event_name = "matching.analyze_refinance.done",
            retained = ranked.len(),
            "refinance analysis complete"
        );
        Ok(ranked)
    }
}
