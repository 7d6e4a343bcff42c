use chrono::NaiveDate;
use uuid::Uuid;

use sahiloan_core::domain::offer::{MarketOffer, OfferId};

use crate::repositories::{OfferRepository, RepositoryError, SqlOfferRepository};
use crate::DbPool;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub offers_inserted: usize,
}

struct SeedOffer {
    id: u128,
    lender: &'static str,
    loan_type: &'static str,
    roi_start: f64,
    roi_end: f64,
    min_amount: f64,
    max_amount: f64,
    max_tenure_years: u32,
    processing_fee: f64,
    tags: &'static [&'static str],
}

/// Demo catalog shaped after the Indian retail-lending market. Ids are
/// fixed so reseeding stays idempotent.
const SEED_OFFERS: &[SeedOffer] = &[
    SeedOffer {
        id: 0xA1,
        lender: "HDFC Bank",
        loan_type: "Personal Loan",
        roi_start: 10.5,
        roi_end: 14.5,
        min_amount: 50_000.0,
        max_amount: 1_500_000.0,
        max_tenure_years: 5,
        processing_fee: 2_999.0,
        tags: &["instant", "salaried"],
    },
    SeedOffer {
        id: 0xA2,
        lender: "ICICI Bank",
        loan_type: "Personal Loan",
        roi_start: 10.75,
        roi_end: 15.0,
        min_amount: 50_000.0,
        max_amount: 2_000_000.0,
        max_tenure_years: 6,
        processing_fee: 2_499.0,
        tags: &["pre-approved"],
    },
    SeedOffer {
        id: 0xA3,
        lender: "Axis Bank",
        loan_type: "Personal Loan",
        roi_start: 11.0,
        roi_end: 16.0,
        min_amount: 25_000.0,
        max_amount: 1_000_000.0,
        max_tenure_years: 5,
        processing_fee: 1_999.0,
        tags: &["flexible-tenure"],
    },
    SeedOffer {
        id: 0xB1,
        lender: "SBI",
        loan_type: "Home Loan",
        roi_start: 8.5,
        roi_end: 9.65,
        min_amount: 500_000.0,
        max_amount: 50_000_000.0,
        max_tenure_years: 30,
        processing_fee: 10_000.0,
        tags: &["floating-rate"],
    },
    SeedOffer {
        id: 0xB2,
        lender: "Kotak Mahindra Bank",
        loan_type: "Car Loan",
        roi_start: 9.0,
        roi_end: 12.5,
        min_amount: 100_000.0,
        max_amount: 5_000_000.0,
        max_tenure_years: 7,
        processing_fee: 3_500.0,
        tags: &["new-car"],
    },
    SeedOffer {
        id: 0xB3,
        lender: "Bajaj Finserv",
        loan_type: "Business Loan",
        roi_start: 13.0,
        roi_end: 18.0,
        min_amount: 200_000.0,
        max_amount: 8_000_000.0,
        max_tenure_years: 8,
        processing_fee: 5_999.0,
        tags: &["collateral-free"],
    },
];

pub fn demo_offers() -> Vec<MarketOffer> {
    SEED_OFFERS
        .iter()
        .map(|seed| MarketOffer {
            id: OfferId(Uuid::from_u128(seed.id)),
            lender: seed.lender.to_string(),
            loan_type: seed.loan_type.to_string(),
            roi_start: seed.roi_start,
            roi_end: seed.roi_end,
            min_amount: seed.min_amount,
            max_amount: seed.max_amount,
            max_tenure_years: seed.max_tenure_years,
            processing_fee: seed.processing_fee,
            prepayment_penalty: 0.0,
            eligibility_criteria: "Salaried or self-employed, CIBIL 700+".to_string(),
            tags: seed.tags.iter().map(|tag| tag.to_string()).collect(),
            active: true,
            valid_until: NaiveDate::from_ymd_opt(2027, 3, 31),
        })
        .collect()
}

pub async fn seed_market_offers(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
    let repo = SqlOfferRepository::new(pool.clone());
    let offers = demo_offers();
    let offers_inserted = offers.len();
    for offer in offers {
        repo.save(offer).await?;
    }
    Ok(SeedResult { offers_inserted })
}
