use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::clock::elapsed_millis;
use crate::{constants::MILLIS_PER_DAY, error::CustomError};

/// Applies to ages strictly below `below_years`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxBracket {
    pub below_years: Decimal,
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaxPolicy {
    brackets: Vec<TaxBracket>,
    long_term_rate: Decimal,
    year_length_days: Decimal,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        TaxPolicy {
            brackets: vec![
                TaxBracket {
                    below_years: dec!(1),
                    rate: dec!(0.225),
                },
                TaxBracket {
                    below_years: dec!(2),
                    rate: dec!(0.185),
                },
            ],
            long_term_rate: dec!(0.15),
            year_length_days: dec!(365.25),
        }
    }
}

impl TaxPolicy {
    /// Brackets must be strictly ascending and every rate within `[0, 1]`.
    pub fn new(brackets: Vec<TaxBracket>, long_term_rate: Decimal) -> Result<Self, CustomError> {
        let valid_rate = |rate: Decimal| rate >= Decimal::ZERO && rate <= Decimal::ONE;
        if !valid_rate(long_term_rate) || brackets.iter().any(|b| !valid_rate(b.rate)) {
            return Err(CustomError::InvalidArgument(
                "tax rates must be between 0 and 1".to_string(),
            ));
        }
        if brackets
            .windows(2)
            .any(|pair| pair[0].below_years >= pair[1].below_years)
        {
            return Err(CustomError::InvalidArgument(
                "tax brackets must be in ascending order".to_string(),
            ));
        }
        Ok(TaxPolicy {
            brackets,
            long_term_rate,
            ..Default::default()
        })
    }

    pub fn age_in_years(&self, creation_date: DateTime<Utc>, now: DateTime<Utc>) -> Decimal {
        let year_millis = self.year_length_days * Decimal::from(MILLIS_PER_DAY);
        Decimal::from(elapsed_millis(creation_date, now)) / year_millis
    }

    pub fn tax_rate(&self, age_years: Decimal) -> Decimal {
        self.brackets
            .iter()
            .find(|bracket| age_years < bracket.below_years)
            .map(|bracket| bracket.rate)
            .unwrap_or(self.long_term_rate)
    }
}
