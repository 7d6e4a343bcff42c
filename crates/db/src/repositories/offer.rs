use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use sahiloan_core::domain::offer::{MarketOffer, OfferId};
use sahiloan_core::matching::catalog::{OfferQuery, MAX_CATALOG_RESULTS};

use super::{OfferRepository, RepositoryError};
use crate::DbPool;

const OFFER_COLUMNS: &str = "id, lender, loan_type, roi_start, roi_end, min_amount, max_amount, \
     max_tenure_years, processing_fee, prepayment_penalty, eligibility_criteria, tags, active, \
     valid_until";

pub struct SqlOfferRepository {
    pool: DbPool,
}

impl SqlOfferRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl OfferRepository for SqlOfferRepository {
    async fn query(&self, query: &OfferQuery) -> Result<Vec<MarketOffer>, RepositoryError> {
        let base = format!(
            "SELECT {OFFER_COLUMNS} FROM market_offers \
             WHERE active = 1 \
               AND lower(loan_type) LIKE '%' || ? || '%' \
               AND min_amount <= ? AND max_amount >= ? \
               AND roi_start <= ? AND roi_end >= ? \
               AND max_tenure_years >= ?"
        );

        let rows = match &query.lender {
            Some(lender) => {
                let sql = format!(
                    "{base} AND lower(lender) LIKE '%' || ? || '%' \
                     ORDER BY roi_start ASC LIMIT ?"
                );
                sqlx::query(&sql)
                    .bind(query.loan_type_label.to_lowercase())
                    .bind(query.amount)
                    .bind(query.amount)
                    .bind(query.desired_rate)
                    .bind(query.desired_rate)
                    .bind(i64::from(query.tenure_years))
                    .bind(lender.to_lowercase())
                    .bind(MAX_CATALOG_RESULTS as i64)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{base} ORDER BY roi_start ASC LIMIT ?");
                sqlx::query(&sql)
                    .bind(query.loan_type_label.to_lowercase())
                    .bind(query.amount)
                    .bind(query.amount)
                    .bind(query.desired_rate)
                    .bind(query.desired_rate)
                    .bind(i64::from(query.tenure_years))
                    .bind(MAX_CATALOG_RESULTS as i64)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(decode_offer).collect()
    }

    async fn find_by_id(&self, id: &OfferId) -> Result<Option<MarketOffer>, RepositoryError> {
        let sql = format!("SELECT {OFFER_COLUMNS} FROM market_offers WHERE id = ?");
        let row = sqlx::query(&sql).bind(id.0.to_string()).fetch_optional(&self.pool).await?;
        row.as_ref().map(decode_offer).transpose()
    }

    async fn save(&self, offer: MarketOffer) -> Result<(), RepositoryError> {
        offer.validate().map_err(|error| RepositoryError::Decode(error.to_string()))?;
        let tags = serde_json::to_string(&offer.tags)
            .map_err(|error| RepositoryError::Decode(error.to_string()))?;

        sqlx::query(
            "INSERT INTO market_offers (id, lender, loan_type, roi_start, roi_end, min_amount, \
             max_amount, max_tenure_years, processing_fee, prepayment_penalty, \
             eligibility_criteria, tags, active, valid_until) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (id) DO UPDATE SET \
               lender = excluded.lender, loan_type = excluded.loan_type, \
               roi_start = excluded.roi_start, roi_end = excluded.roi_end, \
               min_amount = excluded.min_amount, max_amount = excluded.max_amount, \
               max_tenure_years = excluded.max_tenure_years, \
               processing_fee = excluded.processing_fee, \
               prepayment_penalty = excluded.prepayment_penalty, \
               eligibility_criteria = excluded.eligibility_criteria, \
               tags = excluded.tags, active = excluded.active, \
               valid_until = excluded.valid_until",
        )
        .bind(offer.id.0.to_string())
        .bind(&offer.lender)
        .bind(&offer.loan_type)
        .bind(offer.roi_start)
        .bind(offer.roi_end)
        .bind(offer.min_amount)
        .bind(offer.max_amount)
        .bind(i64::from(offer.max_tenure_years))
        .bind(offer.processing_fee)
        .bind(offer.prepayment_penalty)
        .bind(&offer.eligibility_criteria)
        .bind(tags)
        .bind(i64::from(offer.active))
        .bind(offer.valid_until.map(|date| date.to_string()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_active(&self) -> Result<Vec<MarketOffer>, RepositoryError> {
        let sql = format!(
            "SELECT {OFFER_COLUMNS} FROM market_offers WHERE active = 1 ORDER BY roi_start ASC"
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(decode_offer).collect()
    }
}

fn decode_offer(row: &SqliteRow) -> Result<MarketOffer, RepositoryError> {
    let raw_id: String = row.get("id");
    let id = Uuid::parse_str(&raw_id)
        .map_err(|error| RepositoryError::Decode(format!("offer id `{raw_id}`: {error}")))?;

    let raw_tags: String = row.get("tags");
    let tags: Vec<String> = serde_json::from_str(&raw_tags)
        .map_err(|error| RepositoryError::Decode(format!("offer {raw_id} tags: {error}")))?;

    let valid_until: Option<String> = row.get("valid_until");
    let valid_until = valid_until
        .map(|raw| raw.parse::<NaiveDate>())
        .transpose()
        .map_err(|error| RepositoryError::Decode(format!("offer {raw_id} valid_until: {error}")))?;

    let offer = MarketOffer {
        id: OfferId(id),
        lender: row.get("lender"),
        loan_type: row.get("loan_type"),
        roi_start: row.get("roi_start"),
        roi_end: row.get("roi_end"),
        min_amount: row.get("min_amount"),
        max_amount: row.get("max_amount"),
        max_tenure_years: row.get::<i64, _>("max_tenure_years") as u32,
        processing_fee: row.get("processing_fee"),
        prepayment_penalty: row.get("prepayment_penalty"),
        eligibility_criteria: row.get("eligibility_criteria"),
        tags,
        active: row.get::<i64, _>("active") != 0,
        valid_until,
    };
    offer.validate().map_err(|error| RepositoryError::Decode(error.to_string()))?;

    Ok(offer)
}
