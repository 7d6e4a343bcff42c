use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferId(pub Uuid);

impl OfferId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for OfferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Known loan categories plus an escape hatch for labels the catalog
/// introduces before this enum learns about them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Personal,
    Home,
    Car,
    Business,
    Education,
    Gold,
    Other(String),
}

impl LoanType {
    pub fn label(&self) -> &str {
        match self {
            Self::Personal => "Personal",
            Self::Home => "Home",
            Self::Car => "Car",
            Self::Business => "Business",
            Self::Education => "Education",
            Self::Gold => "Gold",
            Self::Other(label) => label,
        }
    }
}

impl std::fmt::Display for LoanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for LoanType {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "personal" => Self::Personal,
            "home" => Self::Home,
            "car" => Self::Car,
            "business" => Self::Business,
            "education" => Self::Education,
            "gold" => Self::Gold,
            _ => Self::Other(trimmed.to_string()),
        })
    }
}

/// A lender's published loan product. Created and updated by the catalog
/// ingestion process; read-only to the matching engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketOffer {
    pub id: OfferId,
    pub lender: String,
    /// Free-text label as published by the lender, e.g. "Personal Loan".
    pub loan_type: String,
    /// Rate band in percent per annum, `roi_start <= roi_end`.
    pub roi_start: f64,
    pub roi_end: f64,
    pub min_amount: f64,
    pub max_amount: f64,
    pub max_tenure_years: u32,
    pub processing_fee: f64,
    pub prepayment_penalty: f64,
    pub eligibility_criteria: String,
    pub tags: Vec<String>,
    pub active: bool,
    pub valid_until: Option<NaiveDate>,
}

impl MarketOffer {
    /// Checked at the store boundary when rows are decoded, so malformed
    /// catalog entries never reach the ranking logic.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.roi_start > self.roi_end {
            return Err(DomainError::InvariantViolation(format!(
                "offer {} has roi_start {} above roi_end {}",
                self.id, self.roi_start, self.roi_end
            )));
        }
        if self.min_amount > self.max_amount {
            return Err(DomainError::InvariantViolation(format!(
                "offer {} has min_amount {} above max_amount {}",
                self.id, self.min_amount, self.max_amount
            )));
        }
        Ok(())
    }
}
