use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CustomError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: Option<i64>,
    pub owner_id: i64,
    pub initial_value: Decimal,
    pub current_value: Decimal,
    pub creation_date: DateTime<Utc>,
    pub is_active: bool,
    #[serde(skip)]
    pub version: i64,
}

/// Fields for a not-yet-persisted investment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvestment {
    pub owner_id: i64,
    pub initial_value: Decimal,
    pub creation_date: DateTime<Utc>,
}

impl From<NewInvestment> for Investment {
    fn from(fields: NewInvestment) -> Self {
        Investment {
            id: None,
            owner_id: fields.owner_id,
            initial_value: fields.initial_value,
            current_value: fields.initial_value,
            creation_date: fields.creation_date,
            is_active: true,
            version: 0,
        }
    }
}

/// Database shape: decimals as text, timestamps as unix millis, the active
/// flag as 0/1 (the Any driver cannot decode SQLite booleans).
#[derive(Debug, sqlx::FromRow)]
pub struct InvestmentRow {
    pub id: i64,
    pub owner_id: i64,
    pub initial_value: String,
    pub current_value: String,
    pub creation_date: i64,
    pub is_active: i64,
    pub version: i64,
}

impl TryFrom<InvestmentRow> for Investment {
    type Error = sqlx::Error;

    fn try_from(row: InvestmentRow) -> Result<Self, Self::Error> {
        let decimal = |raw: &str| {
            Decimal::from_str(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
        };
        let creation_date = DateTime::from_timestamp_millis(row.creation_date).ok_or_else(|| {
            sqlx::Error::Decode(format!("invalid creation_date {}", row.creation_date).into())
        })?;
        Ok(Investment {
            id: Some(row.id),
            owner_id: row.owner_id,
            initial_value: decimal(&row.initial_value)?,
            current_value: decimal(&row.current_value)?,
            creation_date,
            is_active: row.is_active != 0,
            version: row.version,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvestmentFilter {
    pub owner_id: i64,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: i64,
    pub take: i64,
}

impl Pagination {
    pub fn from_page(page: i64, limit: i64) -> Result<Self, CustomError> {
        if page < 1 || limit < 1 {
            return Err(CustomError::InvalidArgument(
                "page and limit must be at least 1".to_string(),
            ));
        }
        let skip = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| CustomError::InvalidArgument("page out of range".to_string()))?;
        Ok(Pagination { skip, take: limit })
    }
}

/// `"active"` and `"inactive"` filter on the flag; anything else lists both.
pub fn status_filter(status: Option<&str>) -> Option<bool> {
    match status {
        Some("active") => Some(true),
        Some("inactive") => Some(false),
        _ => None,
    }
}

#[derive(Serialize, Debug, PartialEq)]
pub struct InvestmentPage {
    pub investments: Vec<Investment>,
    pub total: i64,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestmentRequest {
    pub owner: i64,
    pub creation_date: Option<String>,
    pub initial_value: Decimal,
}

#[derive(Deserialize, Debug)]
pub struct WithdrawalRequest {
    pub amount: Decimal,
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_creation_date(raw: &str) -> Result<DateTime<Utc>, CustomError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CustomError::InvalidArgument(format!("invalid creationDate '{}'", raw)))
}
