use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use sahiloan_core::domain::offer::{LoanType, OfferId};
use sahiloan_core::domain::profile::{LoanId, UserId};
use sahiloan_core::domain::request::{LoanRequest, LoanRequestId, RequestStatus, RequestType};

use super::{RepositoryError, RequestRepository};
use crate::DbPool;

const REQUEST_COLUMNS: &str =
    "id, user_id, request_type, loan_type, from_loan_id, to_loan_id, status, created_at";

pub struct SqlRequestRepository {
    pool: DbPool,
}

impl SqlRequestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RequestRepository for SqlRequestRepository {
    async fn insert(&self, request: &LoanRequest) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO loan_requests (id, user_id, request_type, loan_type, from_loan_id, \
             to_loan_id, status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.id.0.to_string())
        .bind(request.user_id.0.to_string())
        .bind(request.request_type.as_str())
        .bind(request.loan_type.label())
        .bind(request.from_loan_id.map(|id| id.0.to_string()))
        .bind(request.to_loan_id.0.to_string())
        .bind(request.status.as_str())
        .bind(request.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|error| match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::UniqueViolation("loan_requests.to_loan_id".to_string())
            }
            _ => RepositoryError::Database(error),
        })?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &LoanRequestId,
    ) -> Result<Option<LoanRequest>, RepositoryError> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM loan_requests WHERE id = ?");
        let row = sqlx::query(&sql).bind(id.0.to_string()).fetch_optional(&self.pool).await?;
        row.as_ref().map(decode_request).transpose()
    }

    async fn find_by_target(
        &self,
        to_loan_id: &OfferId,
    ) -> Result<Option<LoanRequest>, RepositoryError> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM loan_requests WHERE to_loan_id = ?");
        let row =
            sqlx::query(&sql).bind(to_loan_id.0.to_string()).fetch_optional(&self.pool).await?;
        row.as_ref().map(decode_request).transpose()
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<LoanRequest>, RepositoryError> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM loan_requests WHERE user_id = ? ORDER BY created_at ASC"
        );
        let rows = sqlx::query(&sql).bind(user_id.0.to_string()).fetch_all(&self.pool).await?;
        rows.iter().map(decode_request).collect()
    }
}

fn parse_uuid(raw: &str, field: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(raw)
        .map_err(|error| RepositoryError::Decode(format!("request {field} `{raw}`: {error}")))
}

fn decode_request(row: &SqliteRow) -> Result<LoanRequest, RepositoryError> {
    let id = parse_uuid(&row.get::<String, _>("id"), "id")?;
    let user_id = parse_uuid(&row.get::<String, _>("user_id"), "user_id")?;
    let to_loan_id = parse_uuid(&row.get::<String, _>("to_loan_id"), "to_loan_id")?;
    let from_loan_id = row
        .get::<Option<String>, _>("from_loan_id")
        .map(|raw| parse_uuid(&raw, "from_loan_id"))
        .transpose()?
        .map(LoanId);

    let request_type: RequestType = row
        .get::<String, _>("request_type")
        .parse()
        .map_err(|error: sahiloan_core::DomainError| RepositoryError::Decode(error.to_string()))?;
    let status: RequestStatus = row
        .get::<String, _>("status")
        .parse()
        .map_err(|error: sahiloan_core::DomainError| RepositoryError::Decode(error.to_string()))?;
    let loan_type: LoanType = row
        .get::<String, _>("loan_type")
        .parse()
        .unwrap_or_else(|infallible: std::convert::Infallible| match infallible {});

    let raw_created_at: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&raw_created_at)
        .map_err(|error| {
            RepositoryError::Decode(format!("request created_at `{raw_created_at}`: {error}"))
        })?
        .with_timezone(&Utc);

    let request = LoanRequest {
        id: LoanRequestId(id),
        user_id: UserId(user_id),
        request_type,
        loan_type,
        from_loan_id,
        to_loan_id: OfferId(to_loan_id),
        status,
        created_at,
    };
    request.validate().map_err(|error| RepositoryError::Decode(error.to_string()))?;

    Ok(request)
}
