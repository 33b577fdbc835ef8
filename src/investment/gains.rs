use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, MathematicalOps, prelude::ToPrimitive};
use rust_decimal_macros::dec;

use super::clock::elapsed_millis;
use crate::{constants::MILLIS_PER_DAY, error::CustomError};

/// Monthly compound interest over whole elapsed months.
///
/// Months have a fixed average length (30.44 days by default); a partial
/// month accrues nothing. Elapsed time before `creation_date` counts as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct GainsCalculator {
    pub monthly_rate: Decimal,
    pub month_length_days: Decimal,
}

impl Default for GainsCalculator {
    fn default() -> Self {
        GainsCalculator {
            monthly_rate: dec!(0.0052),
            month_length_days: dec!(30.44),
        }
    }
}

impl GainsCalculator {
    pub fn new(monthly_rate: Decimal) -> Self {
        GainsCalculator {
            monthly_rate,
            ..Default::default()
        }
    }

    pub fn months_elapsed(&self, creation_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        let month_millis = self.month_length_days * Decimal::from(MILLIS_PER_DAY);
        if month_millis <= Decimal::ZERO {
            return 0;
        }
        let elapsed = Decimal::from(elapsed_millis(creation_date, now));
        (elapsed / month_millis).floor().to_i64().unwrap_or(i64::MAX)
    }

    /// `initial_value * ((1 + rate)^months - 1)`. Gains that do not fit in a
    /// `Decimal` are rejected rather than clamped.
    pub fn accrued_gains(
        &self,
        initial_value: Decimal,
        creation_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Decimal, CustomError> {
        let months = self.months_elapsed(creation_date, now);
        if months == 0 {
            return Ok(Decimal::ZERO);
        }
        (Decimal::ONE + self.monthly_rate)
            .checked_powi(months)
            .and_then(|growth| growth.checked_sub(Decimal::ONE))
            .and_then(|factor| initial_value.checked_mul(factor))
            .ok_or_else(|| {
                CustomError::InvalidArgument("accrued gains exceed the supported range".to_string())
            })
    }
}
