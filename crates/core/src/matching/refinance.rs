use serde::{Deserialize, Serialize};

use crate::domain::offer::MarketOffer;
use crate::domain::profile::ExistingLoan;
use crate::matching::ranking::{RankedOffer, MAX_RANKED_RESULTS};

/// Comparative math for one refinance candidate, in the loan's currency.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefinanceSavings {
    pub monthly_savings: f64,
    pub total_savings: f64,
    /// Months of savings needed to recover the candidate's processing fee.
    pub break_even_months: f64,
}

/// Standard amortizing-loan EMI: `P * r * (1+r)^n / ((1+r)^n - 1)` with `r`
/// the monthly rate. Degenerates to straight-line repayment at 0%.
pub fn monthly_emi(principal: f64, annual_rate_pct: f64, months: u32) -> f64 {
    if months == 0 {
        return 0.0;
    }
    let monthly_rate = annual_rate_pct / 1200.0;
    if monthly_rate.abs() < f64::EPSILON {
        return principal / f64::from(months);
    }
    let growth = (1.0 + monthly_rate).powi(months as i32);
    principal * monthly_rate * growth / (growth - 1.0)
}

/// Applies the strict-improvement rules to one candidate: the headline rate
/// must be strictly below the current rate, and the EMI delta must come out
/// positive. Returns `None` when the candidate does not qualify.
pub fn evaluate_candidate(existing: &ExistingLoan, offer: &MarketOffer) -> Option<RefinanceSavings> {
    if existing.remaining_months == 0 {
        return None;
    }
    // Stricter than the catalog's band filter, reapplied on purpose.
    if offer.roi_start >= existing.current_rate {
        return None;
    }

    let current_emi =
        monthly_emi(existing.current_balance, existing.current_rate, existing.remaining_months);
    let new_emi =
        monthly_emi(existing.current_balance, offer.roi_start, existing.remaining_months);

    let monthly_savings = current_emi - new_emi;
    if monthly_savings <= 0.0 {
        return None;
    }

    Some(RefinanceSavings {
        monthly_savings,
        total_savings: monthly_savings * f64::from(existing.remaining_months),
        break_even_months: offer.processing_fee / monthly_savings,
    })
}

/// Walks rate-sorted catalog candidates, keeps the ones that strictly beat
/// the existing loan, and returns at most [`MAX_RANKED_RESULTS`] ranked
/// offers with their savings attached. Empty means "no better rates found".
pub fn analyze_refinance(existing: &ExistingLoan, candidates: Vec<MarketOffer>) -> Vec<RankedOffer> {
    let mut ranked = Vec::new();
    for offer in candidates {
        let Some(savings) = evaluate_candidate(existing, &offer) else {
            continue;
        };
        ranked.push(RankedOffer {
            rank: ranked.len() as u32 + 1,
            offer,
            savings: Some(savings),
        });
        if ranked.len() == MAX_RANKED_RESULTS {
            break;
        }
    }
    ranked
}
