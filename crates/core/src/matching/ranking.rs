use serde::{Deserialize, Serialize};

use crate::domain::offer::MarketOffer;
use crate::matching::refinance::RefinanceSavings;

/// Ranked lists presented to the caller hold at most this many offers.
pub const MAX_RANKED_RESULTS: usize = 3;

/// A market offer annotated for presentation. Produced fresh per query and
/// never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedOffer {
    /// 1-based position in the returned list.
    pub rank: u32,
    pub offer: MarketOffer,
    /// Populated only on the refinance path.
    pub savings: Option<RefinanceSavings>,
}

/// Truncates a rate-sorted catalog result to [`MAX_RANKED_RESULTS`] and
/// assigns ranks in input order.
///
/// No creditworthiness cutoff is applied here: eligibility beyond the
/// catalog predicates lives in each offer's free-text criteria and is
/// interpreted downstream. This is the seam where a score-based filter
/// would slot in if one is ever introduced.
pub fn rank_offers(offers: Vec<MarketOffer>) -> Vec<RankedOffer> {
    offers
        .into_iter()
        .take(MAX_RANKED_RESULTS)
        .enumerate()
        .map(|(index, offer)| RankedOffer { rank: index as u32 + 1, offer, savings: None })
        .collect()
}
