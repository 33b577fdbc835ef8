use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{
    clock::Clock,
    model::{Investment, InvestmentFilter, InvestmentPage, NewInvestment, Pagination, status_filter},
    repository::InvestmentStore,
    withdrawal::WithdrawalEngine,
};
use crate::error::CustomError;

pub struct InvestmentService<S: InvestmentStore> {
    store: S,
    engine: WithdrawalEngine,
    clock: Arc<dyn Clock>,
}

impl<S: InvestmentStore> InvestmentService<S> {
    pub fn new(store: S, engine: WithdrawalEngine, clock: Arc<dyn Clock>) -> Self {
        InvestmentService {
            store,
            engine,
            clock,
        }
    }

    pub async fn create(
        &self,
        owner_id: i64,
        initial_value: Decimal,
        creation_date: Option<DateTime<Utc>>,
    ) -> Result<Investment, CustomError> {
        if initial_value < Decimal::ZERO {
            return Err(CustomError::InvalidArgument(
                "initial value cannot be negative".to_string(),
            ));
        }
        let investment = self.store.create(NewInvestment {
            owner_id,
            initial_value,
            creation_date: creation_date.unwrap_or_else(|| self.clock.now()),
        });
        let saved = self.store.save(investment).await?;
        tracing::info!(id = ?saved.id, owner_id, %initial_value, "investment created");
        Ok(saved)
    }

    pub async fn get(&self, id: i64) -> Result<Investment, CustomError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(CustomError::NotFound("Investment"))
    }

    pub async fn withdraw(&self, id: i64, amount: Decimal) -> Result<Investment, CustomError> {
        let withdrawal = self
            .engine
            .withdraw(&self.store, id, amount, self.clock.now())
            .await?;
        Ok(withdrawal.investment)
    }

    pub async fn list(
        &self,
        owner_id: i64,
        status: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<InvestmentPage, CustomError> {
        let filter = InvestmentFilter {
            owner_id,
            is_active: status_filter(status),
        };
        let (investments, total) = self
            .store
            .find_and_count(filter, Pagination::from_page(page, limit)?)
            .await?;
        Ok(InvestmentPage { investments, total })
    }

    /// Gains accrued as of the service clock, for display next to the balance.
    pub fn accrued_gains(&self, investment: &Investment) -> Result<Decimal, CustomError> {
        self.engine.gains().accrued_gains(
            investment.initial_value,
            investment.creation_date,
            self.clock.now(),
        )
    }
}
