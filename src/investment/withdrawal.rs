//! Withdrawal of accrued gains.
//!
//! A withdrawal may never exceed the gains accrued since creation, so the
//! principal is never withdrawable. The age-based tax rate reduces the
//! amount debited from the balance: the caller is credited the full
//! requested amount while `current_value` only drops by
//! `amount * (1 - tax_rate)`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{
    gains::GainsCalculator, model::Investment, repository::InvestmentStore, tax::TaxPolicy,
};
use crate::error::CustomError;

#[derive(Debug, Clone, PartialEq)]
pub struct Withdrawal {
    pub investment: Investment,
    pub requested: Decimal,
    pub available: Decimal,
    pub tax_rate: Decimal,
    pub debited: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct WithdrawalEngine {
    gains: GainsCalculator,
    tax: TaxPolicy,
}

impl WithdrawalEngine {
    pub fn new(gains: GainsCalculator, tax: TaxPolicy) -> Self {
        WithdrawalEngine { gains, tax }
    }

    pub fn gains(&self) -> &GainsCalculator {
        &self.gains
    }

    /// Validates the request against `investment` and computes the updated
    /// record. Nothing is persisted.
    pub fn settle(
        &self,
        investment: Investment,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Withdrawal, CustomError> {
        if amount <= Decimal::ZERO {
            return Err(CustomError::InvalidArgument(
                "withdrawal amount must be positive".to_string(),
            ));
        }

        let available =
            self.gains
                .accrued_gains(investment.initial_value, investment.creation_date, now)?;
        if amount > available {
            return Err(CustomError::InsufficientFunds {
                requested: amount,
                available,
            });
        }

        let tax_rate = self
            .tax
            .tax_rate(self.tax.age_in_years(investment.creation_date, now));
        let debited = amount
            .checked_mul(Decimal::ONE - tax_rate)
            .ok_or_else(|| out_of_range("debited amount"))?;
        let current_value = investment
            .current_value
            .checked_sub(debited)
            .ok_or_else(|| out_of_range("balance"))?;

        Ok(Withdrawal {
            investment: Investment {
                current_value,
                ..investment
            },
            requested: amount,
            available,
            tax_rate,
            debited,
        })
    }

    pub async fn withdraw<S>(
        &self,
        store: &S,
        investment_id: i64,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Withdrawal, CustomError>
    where
        S: InvestmentStore + ?Sized,
    {
        let investment = store
            .find_by_id(investment_id)
            .await?
            .ok_or(CustomError::NotFound("Investment"))?;

        let withdrawal = self.settle(investment, amount, now)?;
        let saved = store.save(withdrawal.investment.clone()).await?;

        tracing::info!(
            investment_id,
            requested = %withdrawal.requested,
            tax_rate = %withdrawal.tax_rate,
            debited = %withdrawal.debited,
            current_value = %saved.current_value,
            "withdrawal settled"
        );
        Ok(Withdrawal {
            investment: saved,
            ..withdrawal
        })
    }
}

fn out_of_range(what: &str) -> CustomError {
    CustomError::InvalidArgument(format!("{} exceeds the supported range", what))
}
