use std::cmp::Ordering;

use crate::domain::offer::MarketOffer;
use crate::domain::requirement::LoanRequirement;

/// Catalog queries never return more than this many offers; ranking
/// truncates further.
pub const MAX_CATALOG_RESULTS: usize = 5;

/// Normalized form of a [`LoanRequirement`], as the offer stores consume it.
#[derive(Clone, Debug, PartialEq)]
pub struct OfferQuery {
    /// Matched case-insensitively as a substring of the offer's loan-type
    /// label, so `Personal` matches `"Personal Loan"`.
    pub loan_type_label: String,
    pub amount: f64,
    pub desired_rate: f64,
    pub tenure_years: u32,
    pub lender: Option<String>,
}

impl From<&LoanRequirement> for OfferQuery {
    fn from(requirement: &LoanRequirement) -> Self {
        Self {
            loan_type_label: requirement.loan_type.label().to_string(),
            amount: requirement.amount,
            desired_rate: requirement.desired_rate,
            tenure_years: requirement.tenure_years,
            lender: requirement.preferred_lender.clone(),
        }
    }
}

/// The catalog filter predicate. All bounds are inclusive; the desired rate
/// must fall inside the offer's published band, not merely near it.
pub fn matches(offer: &MarketOffer, query: &OfferQuery) -> bool {
    if !offer.active {
        return false;
    }

    let loan_type_ok = offer
        .loan_type
        .to_lowercase()
        .contains(&query.loan_type_label.to_lowercase());
    let amount_ok = offer.min_amount <= query.amount && query.amount <= offer.max_amount;
    let rate_ok = offer.roi_start <= query.desired_rate && query.desired_rate <= offer.roi_end;
    let tenure_ok = offer.max_tenure_years >= query.tenure_years;
    let lender_ok = query
        .lender
        .as_ref()
        .map_or(true, |needle| offer.lender.to_lowercase().contains(&needle.to_lowercase()));

    loan_type_ok && amount_ok && rate_ok && tenure_ok && lender_ok
}

/// Applies [`matches`], orders ascending by headline rate, and caps the
/// result at [`MAX_CATALOG_RESULTS`]. An empty result is a normal outcome.
pub fn filter_offers(offers: &[MarketOffer], query: &OfferQuery) -> Vec<MarketOffer> {
    let mut hits: Vec<MarketOffer> =
        offers.iter().filter(|offer| matches(offer, query)).cloned().collect();
    hits.sort_by(|a, b| a.roi_start.partial_cmp(&b.roi_start).unwrap_or(Ordering::Equal));
    hits.truncate(MAX_CATALOG_RESULTS);
    hits
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::{filter_offers, matches, OfferQuery, MAX_CATALOG_RESULTS};
    use crate::domain::offer::{LoanType, MarketOffer, OfferId};
    use crate::domain::requirement::LoanRequirement;

    fn personal_offer(roi_start: f64, roi_end: f64) -> MarketOffer {
        MarketOffer {
            id: OfferId::generate(),
            lender: "HDFC Bank".to_string(),
            loan_type: "Personal Loan".to_string(),
            roi_start,
            roi_end,
            min_amount: 50_000.0,
            max_amount: 500_000.0,
            max_tenure_years: 5,
            processing_fee: 2_000.0,
            prepayment_penalty: 0.0,
            eligibility_criteria: String::new(),
            tags: Vec::new(),
            active: true,
            valid_until: None,
        }
    }

    fn query(desired_rate: f64) -> OfferQuery {
        OfferQuery {
            loan_type_label: "Personal".to_string(),
            amount: 100_000.0,
            desired_rate,
            tenure_years: 2,
            lender: None,
        }
    }

    #[test]
    fn offer_inside_all_bounds_is_included() {
        // roi 9-11, amount 50k-500k, tenure up to 5; ask 100k at 10% for 2y.
        let offer = personal_offer(9.0, 11.0);
        assert!(matches(&offer, &query(10.0)));
    }

    #[test]
    fn desired_rate_above_band_excludes_the_offer() {
        let offer = personal_offer(9.0, 11.0);
        assert!(!matches(&offer, &query(12.0)));
    }

    #[test]
    fn bounds_are_inclusive_at_every_edge() {
        let offer = personal_offer(9.0, 11.0);

        assert!(matches(&offer, &query(9.0)));
        assert!(matches(&offer, &query(11.0)));

        let mut at_min = query(10.0);
        at_min.amount = offer.min_amount;
        assert!(matches(&offer, &at_min));

        let mut at_max = query(10.0);
        at_max.amount = offer.max_amount;
        assert!(matches(&offer, &at_max));

        let mut at_tenure = query(10.0);
        at_tenure.tenure_years = offer.max_tenure_years;
        assert!(matches(&offer, &at_tenure));
        at_tenure.tenure_years = offer.max_tenure_years + 1;
        assert!(!matches(&offer, &at_tenure));
    }

    #[test]
    fn loan_type_matches_as_case_insensitive_substring() {
        let offer = personal_offer(9.0, 11.0);
        let mut q = query(10.0);
        q.loan_type_label = "personal".to_string();
        assert!(matches(&offer, &q));
        q.loan_type_label = "Home".to_string();
        assert!(!matches(&offer, &q));
    }

    #[test]
    fn lender_filter_is_substring_and_optional() {
        let offer = personal_offer(9.0, 11.0);
        let mut q = query(10.0);
        q.lender = Some("hdfc".to_string());
        assert!(matches(&offer, &q));
        q.lender = Some("ICICI".to_string());
        assert!(!matches(&offer, &q));
    }

    #[test]
    fn inactive_offers_never_match() {
        let mut offer = personal_offer(9.0, 11.0);
        offer.active = false;
        assert!(!matches(&offer, &query(10.0)));
    }

    #[test]
    fn results_are_rate_sorted_and_capped() {
        let offers: Vec<MarketOffer> =
            (0..8).map(|i| personal_offer(14.0 - i as f64 * 0.5, 18.0)).collect();
        let mut q = query(14.0);
        q.desired_rate = 14.0;

        let hits = filter_offers(&offers, &q);
        assert_eq!(hits.len(), MAX_CATALOG_RESULTS);
        for pair in hits.windows(2) {
            assert!(pair[0].roi_start <= pair[1].roi_start);
        }
    }

    #[test]
    fn empty_catalog_yields_empty_result() {
        assert!(filter_offers(&[], &query(10.0)).is_empty());
    }

    #[test]
    fn requirement_conversion_carries_every_field() {
        let requirement = LoanRequirement {
            loan_type: LoanType::Car,
            amount: 350_000.0,
            tenure_years: 4,
            desired_rate: 9.5,
            preferred_lender: Some("Kotak".to_string()),
        };
        let q = OfferQuery::from(&requirement);
        assert_eq!(q.loan_type_label, "Car");
        assert_eq!(q.amount, 350_000.0);
        assert_eq!(q.tenure_years, 4);
        assert_eq!(q.desired_rate, 9.5);
        assert_eq!(q.lender.as_deref(), Some("Kotak"));
    }

    // Randomized bracketing: nudge each bound one step past the query and
    // check the predicate flips exactly there.
    #[test]
    fn random_offers_match_iff_every_predicate_holds() {
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..500 {
            let roi_start = rng.gen_range(6.0..14.0);
            let mut offer = personal_offer(roi_start, roi_start + rng.gen_range(0.0..6.0));
            offer.min_amount = rng.gen_range(10_000.0..200_000.0);
            offer.max_amount = offer.min_amount + rng.gen_range(0.0..800_000.0);
            offer.max_tenure_years = rng.gen_range(1..10);

            let q = OfferQuery {
                loan_type_label: "Personal".to_string(),
                amount: rng.gen_range(10_000.0..1_000_000.0),
                desired_rate: rng.gen_range(6.0..20.0),
                tenure_years: rng.gen_range(1..10),
                lender: None,
            };

            let expected = offer.min_amount <= q.amount
                && q.amount <= offer.max_amount
                && offer.roi_start <= q.desired_rate
                && q.desired_rate <= offer.roi_end
                && offer.max_tenure_years >= q.tenure_years;
            assert_eq!(matches(&offer, &q), expected);
        }
    }
}
