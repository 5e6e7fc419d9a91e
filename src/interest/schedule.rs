use chrono::NaiveDate;

use crate::config::LoanConfiguration;
use crate::decimal::Rate;
use crate::errors::{MortgageError, Result};
use crate::types::RateType;

/// resolves the annual rate that applies on a given date
///
/// Fixed wins when both rates are configured without a fixed period. With a
/// fixed period, fixed applies strictly before `variable_from` and variable on
/// and after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSchedule {
    Single { rate: Rate, rate_type: RateType },
    Split { fixed: Rate, variable: Rate, variable_from: NaiveDate },
}

impl RateSchedule {
    pub fn from_config(config: &LoanConfiguration) -> Result<Self> {
        let variable_from = config.variable_start_date()?;

        match (config.fixed_rate, config.variable_rate, variable_from) {
            (Some(fixed), Some(variable), Some(variable_from)) => Ok(RateSchedule::Split {
                fixed,
                variable,
                variable_from,
            }),
            (Some(fixed), variable, _) => {
                if variable.is_some() {
                    log::warn!(
                        "both fixed and variable rates configured without a fixed period; \
                         applying fixed rate for the full term"
                    );
                }
                Ok(RateSchedule::Single { rate: fixed, rate_type: RateType::Fixed })
            }
            (None, Some(variable), _) => {
                Ok(RateSchedule::Single { rate: variable, rate_type: RateType::Variable })
            }
            (None, None, _) => Err(MortgageError::configuration(
                "at least one of fixed rate or variable rate is required",
            )),
        }
    }

    pub fn rate_on(&self, date: NaiveDate) -> (Rate, RateType) {
        match *self {
            RateSchedule::Single { rate, rate_type } => (rate, rate_type),
            RateSchedule::Split { fixed, variable, variable_from } => {
                if date < variable_from {
                    (fixed, RateType::Fixed)
                } else {
                    (variable, RateType::Variable)
                }
            }
        }
    }

    pub fn annual_rate_on(&self, date: NaiveDate) -> Rate {
        self.rate_on(date).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn builder() -> crate::config::LoanConfigurationBuilder {
        LoanConfiguration::builder()
            .principal(Money::from_major(200_000))
            .start_date(date(2024, 3, 1))
            .tenure_years(25)
    }

    #[test]
    fn test_fixed_only() {
        let config = builder().fixed_rate(Rate::from_percent(dec!(4.5))).build().unwrap();
        let schedule = RateSchedule::from_config(&config).unwrap();

        assert_eq!(
            schedule.rate_on(date(2040, 1, 1)),
            (Rate::from_percent(dec!(4.5)), RateType::Fixed)
        );
    }

    #[test]
    fn test_variable_only() {
        let config = builder().variable_rate(Rate::from_percent(dec!(6.99))).build().unwrap();
        let schedule = RateSchedule::from_config(&config).unwrap();

        assert_eq!(schedule.rate_on(date(2024, 3, 1)).1, RateType::Variable);
    }

    #[test]
    fn test_fixed_precedence_without_period() {
        let config = builder()
            .fixed_rate(Rate::from_percent(dec!(4.5)))
            .variable_rate(Rate::from_percent(dec!(6.99)))
            .build()
            .unwrap();
        let schedule = RateSchedule::from_config(&config).unwrap();

        assert_eq!(schedule.rate_on(date(2048, 12, 31)).1, RateType::Fixed);
    }

    #[test]
    fn test_switch_on_anniversary() {
        let config = builder()
            .fixed_rate(Rate::from_percent(dec!(4.5)))
            .variable_rate(Rate::from_percent(dec!(6.99)))
            .fixed_tenure_years(2)
            .build()
            .unwrap();
        let schedule = RateSchedule::from_config(&config).unwrap();

        assert_eq!(schedule.rate_on(date(2026, 2, 28)).1, RateType::Fixed);
        assert_eq!(schedule.rate_on(date(2026, 3, 1)).1, RateType::Variable);
        assert_eq!(schedule.annual_rate_on(date(2026, 3, 1)), Rate::from_percent(dec!(6.99)));
    }
}
