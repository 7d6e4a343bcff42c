use std::sync::Arc;

use anyhow::Result;

use sahiloan_core::domain::offer::{LoanType, MarketOffer, OfferId};
use sahiloan_core::domain::profile::{ExistingLoan, LoanId, UserId, UserProfile};
use sahiloan_core::domain::request::{RequestStatus, RequestType};
use sahiloan_core::domain::requirement::LoanRequirement;
use sahiloan_db::repositories::{
    InMemoryOfferRepository, InMemoryRequestRepository, RequestRepository,
};
use sahiloan_engine::{EngineError, MatchingService, RequestLedger, StaticProfileGateway};

fn offer(lender: &str, loan_type: &str, roi_start: f64, roi_end: f64) -> MarketOffer {
    MarketOffer {
        id: OfferId::generate(),
        lender: lender.to_string(),
        loan_type: loan_type.to_string(),
        roi_start,
        roi_end,
        min_amount: 50_000.0,
        max_amount: 1_000_000.0,
        max_tenure_years: 6,
        processing_fee: 2_000.0,
        prepayment_penalty: 0.0,
        eligibility_criteria: String::new(),
        tags: Vec::new(),
        active: true,
        valid_until: None,
    }
}

fn profile_with_loan(existing: ExistingLoan) -> UserProfile {
    UserProfile {
        id: UserId::generate(),
        full_name: "Asha Rao".to_string(),
        phone_number: "+919812345678".to_string(),
        cibil_score: 742,
        loans: vec![existing],
    }
}

fn existing_loan() -> ExistingLoan {
    ExistingLoan {
        id: LoanId::generate(),
        lender: "HDFC Bank".to_string(),
        loan_type: LoanType::Personal,
        current_balance: 200_000.0,
        current_rate: 12.0,
        remaining_months: 24,
    }
}

fn matching_over(offers: Vec<MarketOffer>) -> MatchingService {
    MatchingService::new(Arc::new(InMemoryOfferRepository::with_offers(offers)))
}

fn ledger_for(profile: &UserProfile) -> (RequestLedger, Arc<InMemoryRequestRepository>) {
    let requests = Arc::new(InMemoryRequestRepository::default());
    let ledger = RequestLedger::new(
        Arc::clone(&requests) as Arc<dyn RequestRepository>,
        Arc::new(StaticProfileGateway::new(vec![profile.clone()])),
    );
    (ledger, requests)
}

#[tokio::test]
async fn query_offers_returns_at_most_three_cheapest_first() -> Result<()> {
    let catalog: Vec<MarketOffer> = [11.5, 10.5, 12.0, 10.75, 11.0]
        .iter()
        .map(|roi| offer("HDFC Bank", "Personal Loan", *roi, 16.0))
        .collect();
    let matching = matching_over(catalog);

    let requirement = LoanRequirement {
        loan_type: LoanType::Personal,
        amount: 100_000.0,
        tenure_years: 2,
        desired_rate: 13.0,
        preferred_lender: None,
    };
    let ranked = matching.query_offers(&requirement).await?;

    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].offer.roi_start, 10.5);
    assert_eq!(ranked[0].rank, 1);
    for pair in ranked.windows(2) {
        assert!(pair[0].offer.roi_start <= pair[1].offer.roi_start);
        assert_eq!(pair[1].rank, pair[0].rank + 1);
    }
    assert!(ranked.iter().all(|entry| entry.savings.is_none()));
    Ok(())
}

#[tokio::test]
async fn empty_catalog_is_a_no_match_success() -> Result<()> {
    let matching = matching_over(Vec::new());
    let requirement = LoanRequirement {
        loan_type: LoanType::Personal,
        amount: 100_000.0,
        tenure_years: 2,
        desired_rate: 10.0,
        preferred_lender: None,
    };

    let ranked = matching.query_offers(&requirement).await?;
    assert!(ranked.is_empty());
    Ok(())
}

#[tokio::test]
async fn refinance_keeps_only_strictly_cheaper_offers_with_savings() -> Result<()> {
    let existing = existing_loan();
    let profile = profile_with_loan(existing.clone());
    // 10% beats the current 12%; 12.5% never reaches the analyzer's cut.
    let matching = matching_over(vec![
        offer("ICICI Bank", "Personal Loan", 10.0, 14.0),
        offer("Axis Bank", "Personal Loan", 9.5, 13.0),
    ]);

    let ranked = matching.analyze_refinance(&existing, &profile).await?;
    assert_eq!(ranked.len(), 2);
    for entry in &ranked {
        assert!(entry.offer.roi_start < existing.current_rate);
        let savings = entry.savings.expect("savings populated");
        assert!(savings.monthly_savings > 0.0);
        assert!(savings.total_savings > savings.monthly_savings);
        assert!(savings.break_even_months > 0.0);
    }
    Ok(())
}

#[tokio::test]
async fn refinance_with_no_better_rate_returns_empty() -> Result<()> {
    let existing = existing_loan();
    let profile = profile_with_loan(existing.clone());
    // The derived query aims at 10.5%; both bands start above it, so no
    // candidate survives and the caller presents "no better rates found".
    let matching = matching_over(vec![
        offer("ICICI Bank", "Personal Loan", 10.75, 15.0),
        offer("Axis Bank", "Personal Loan", 12.5, 16.0),
    ]);

    let ranked = matching.analyze_refinance(&existing, &profile).await?;
    assert!(ranked.is_empty());
    Ok(())
}

#[tokio::test]
async fn new_loan_request_persists_pending_without_source_loan() -> Result<()> {
    let profile = profile_with_loan(existing_loan());
    let (ledger, requests) = ledger_for(&profile);
    let target = OfferId::generate();

    let request_id =
        ledger.create_new_loan_request(&profile.id, &target, LoanType::Personal).await?;

    let stored = requests.find_by_id(&request_id).await?.expect("persisted request");
    assert_eq!(stored.request_type, RequestType::NewLoan);
    assert_eq!(stored.status, RequestStatus::Pending);
    assert_eq!(stored.to_loan_id, target);
    assert!(stored.from_loan_id.is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_target_reports_the_existing_request() -> Result<()> {
    let profile = profile_with_loan(existing_loan());
    let (ledger, _requests) = ledger_for(&profile);
    let target = OfferId::generate();

    let winner = ledger.create_new_loan_request(&profile.id, &target, LoanType::Personal).await?;
    let error = ledger
        .create_new_loan_request(&profile.id, &target, LoanType::Personal)
        .await
        .expect_err("second claim");

    match error {
        EngineError::DuplicateTarget { to_loan_id, existing_request_id } => {
            assert_eq!(to_loan_id, target);
            assert_eq!(existing_request_id, winner);
        }
        other => panic!("expected DuplicateTarget, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn concurrent_claims_on_one_offer_admit_exactly_one() -> Result<()> {
    let profile = profile_with_loan(existing_loan());
    let (ledger, _requests) = ledger_for(&profile);
    let ledger = Arc::new(ledger);
    let target = OfferId::generate();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let ledger = Arc::clone(&ledger);
        let user_id = profile.id;
        handles.push(tokio::spawn(async move {
            ledger.create_new_loan_request(&user_id, &target, LoanType::Personal).await
        }));
    }

    let mut winners = Vec::new();
    let mut duplicates = 0;
    for handle in handles {
        match handle.await? {
            Ok(request_id) => winners.push(request_id),
            Err(EngineError::DuplicateTarget { existing_request_id, .. }) => {
                winners.push(existing_request_id);
                duplicates += 1;
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(duplicates, 3);
    winners.dedup();
    assert_eq!(winners.len(), 1, "all callers must observe the same winning request");
    Ok(())
}

#[tokio::test]
async fn switch_request_requires_a_source_loan() -> Result<()> {
    let profile = profile_with_loan(existing_loan());
    let (ledger, _requests) = ledger_for(&profile);

    let error = ledger
        .create_switch_request(&profile.id, LoanType::Personal, None, &OfferId::generate())
        .await
        .expect_err("missing from_loan_id");
    assert!(matches!(error, EngineError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn switch_request_rejects_loans_the_user_does_not_hold() -> Result<()> {
    let profile = profile_with_loan(existing_loan());
    let (ledger, _requests) = ledger_for(&profile);

    let error = ledger
        .create_switch_request(
            &profile.id,
            LoanType::Personal,
            Some(LoanId::generate()),
            &OfferId::generate(),
        )
        .await
        .expect_err("loan not in profile");
    assert!(matches!(error, EngineError::NotFound { entity: "loan", .. }));
    Ok(())
}

#[tokio::test]
async fn switch_request_records_the_replaced_loan() -> Result<()> {
    let existing = existing_loan();
    let profile = profile_with_loan(existing.clone());
    let (ledger, requests) = ledger_for(&profile);
    let target = OfferId::generate();

    let request_id = ledger
        .create_switch_request(&profile.id, LoanType::Personal, Some(existing.id), &target)
        .await?;

    let stored = requests.find_by_id(&request_id).await?.expect("persisted request");
    assert_eq!(stored.request_type, RequestType::SwitchLoan);
    assert_eq!(stored.from_loan_id, Some(existing.id));
    assert_eq!(stored.status, RequestStatus::Pending);
    Ok(())
}

#[tokio::test]
async fn unknown_user_cannot_create_requests() -> Result<()> {
    let profile = profile_with_loan(existing_loan());
    let (ledger, _requests) = ledger_for(&profile);

    let error = ledger
        .create_new_loan_request(&UserId::generate(), &OfferId::generate(), LoanType::Personal)
        .await
        .expect_err("unknown user");
    assert!(matches!(error, EngineError::NotFound { entity: "user", .. }));
    Ok(())
}
