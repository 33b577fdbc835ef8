use async_trait::async_trait;

use super::model::{Investment, InvestmentFilter, InvestmentRow, NewInvestment, Pagination};
use crate::error::CustomError;

const SELECT_COLUMNS: &str =
    "SELECT id, owner_id, initial_value, current_value, creation_date, is_active, version FROM investments";

#[async_trait]
pub trait InvestmentStore: Send + Sync {
    /// Builds the entity without persisting it; `save` assigns the id.
    fn create(&self, fields: NewInvestment) -> Investment {
        fields.into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Investment>, CustomError>;

    /// Inserts when `id` is `None`, otherwise updates guarded by `version`.
    /// A stale version fails with `CustomError::Conflict`.
    async fn save(&self, investment: Investment) -> Result<Investment, CustomError>;

    async fn find_and_count(
        &self,
        filter: InvestmentFilter,
        pagination: Pagination,
    ) -> Result<(Vec<Investment>, i64), CustomError>;
}

pub struct InvestmentRepository {
    pool: sqlx::AnyPool,
}

impl InvestmentRepository {
    pub fn new(pool: sqlx::AnyPool) -> Self {
        InvestmentRepository { pool }
    }

    async fn insert(&self, investment: Investment) -> Result<Investment, CustomError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO investments (owner_id, initial_value, current_value, creation_date, is_active, version)
            VALUES ($1, $2, $3, $4, $5, 0)
            RETURNING id"#,
        )
        .bind(investment.owner_id)
        .bind(investment.initial_value.to_string())
        .bind(investment.current_value.to_string())
        .bind(investment.creation_date.timestamp_millis())
        .bind(i64::from(investment.is_active))
        .fetch_one(&self.pool)
        .await?;

        Ok(Investment {
            id: Some(id),
            version: 0,
            ..investment
        })
    }

    async fn update(&self, id: i64, investment: Investment) -> Result<Investment, CustomError> {
        let result = sqlx::query(
            r#"
            UPDATE investments
            SET current_value = $1, is_active = $2, version = version + 1
            WHERE id = $3 AND version = $4"#,
        )
        .bind(investment.current_value.to_string())
        .bind(i64::from(investment.is_active))
        .bind(id)
        .bind(investment.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CustomError::Conflict(id));
        }
        Ok(Investment {
            version: investment.version + 1,
            ..investment
        })
    }
}

#[async_trait]
impl InvestmentStore for InvestmentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Investment>, CustomError> {
        let row = sqlx::query_as::<_, InvestmentRow>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Investment::try_from).transpose()?)
    }

    async fn save(&self, investment: Investment) -> Result<Investment, CustomError> {
        match investment.id {
            None => self.insert(investment).await,
            Some(id) => self.update(id, investment).await,
        }
    }

    async fn find_and_count(
        &self,
        filter: InvestmentFilter,
        pagination: Pagination,
    ) -> Result<(Vec<Investment>, i64), CustomError> {
        let condition = if filter.is_active.is_some() {
            "WHERE owner_id = $1 AND is_active = $2"
        } else {
            "WHERE owner_id = $1"
        };
        let next = if filter.is_active.is_some() { 3 } else { 2 };

        let list_sql = format!(
            "{} {} ORDER BY id LIMIT ${} OFFSET ${}",
            SELECT_COLUMNS,
            condition,
            next,
            next + 1
        );
        let mut list = sqlx::query_as::<_, InvestmentRow>(&list_sql).bind(filter.owner_id);
        if let Some(active) = filter.is_active {
            list = list.bind(i64::from(active));
        }
        let rows = list
            .bind(pagination.take)
            .bind(pagination.skip)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM investments {}", condition);
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql).bind(filter.owner_id);
        if let Some(active) = filter.is_active {
            count = count.bind(i64::from(active));
        }
        let total = count.fetch_one(&self.pool).await?;

        let investments = rows
            .into_iter()
            .map(Investment::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((investments, total))
    }
}
