use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// days in the accrual year under the default convention
pub const DAYS_IN_YEAR: u32 = 365;

/// day count convention for converting an annual rate into a daily one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// annual rate / 365 on every day, leap years included
    #[default]
    Actual365,
    /// annual rate / actual days in the accrual day's year
    ActualActual,
}

/// engine for accruing interest one day at a time
#[derive(Debug, Clone, Copy)]
pub struct AccrualEngine {
    pub convention: DayCountConvention,
}

impl AccrualEngine {
    pub fn new(convention: DayCountConvention) -> Self {
        Self { convention }
    }

    /// get year basis for the convention
    pub fn year_basis(&self, year: i32) -> u32 {
        match self.convention {
            DayCountConvention::Actual365 => DAYS_IN_YEAR,
            DayCountConvention::ActualActual => {
                if is_leap_year(year) { 366 } else { 365 }
            }
        }
    }

    /// daily rate applied on `date`
    pub fn daily_rate(&self, annual_rate: Rate, date: NaiveDate) -> Rate {
        annual_rate.per_day(self.year_basis(date.year()))
    }

    /// interest accrued on `balance` for the single day `date`
    pub fn daily_interest(&self, balance: Money, annual_rate: Rate, date: NaiveDate) -> Money {
        balance.interest_at(self.daily_rate(annual_rate, date))
    }

    /// interest accrued over `days` consecutive days starting at `from`,
    /// each day's interest joining the balance before the next day accrues
    pub fn compounded_interest<F>(
        &self,
        balance: Money,
        from: NaiveDate,
        days: u32,
        rate_on: F,
    ) -> Money
    where
        F: Fn(NaiveDate) -> Rate,
    {
        let mut running = balance;
        let mut date = from;
        for _ in 0..days {
            running += self.daily_interest(running, rate_on(date), date);
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        running - balance
    }
}

/// check if year is a leap year
fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_leap_year() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
    }

    #[test]
    fn test_year_basis() {
        let fixed = AccrualEngine::new(DayCountConvention::Actual365);
        let actual = AccrualEngine::new(DayCountConvention::ActualActual);

        assert_eq!(fixed.year_basis(2024), 365);
        assert_eq!(actual.year_basis(2024), 366);
        assert_eq!(actual.year_basis(2025), 365);
    }

    #[test]
    fn test_daily_interest() {
        let engine = AccrualEngine::new(DayCountConvention::Actual365);
        let principal = Money::from_major(300_000);
        let rate = Rate::from_percent(dec!(3.5));

        // 300000 * 0.035 / 365
        let interest = engine.daily_interest(principal, rate, date(2024, 1, 1));
        assert_eq!(interest.round_dp(2), Money::from_str_exact("28.77").unwrap());
    }

    #[test]
    fn test_leap_year_daily_rate() {
        let engine = AccrualEngine::new(DayCountConvention::ActualActual);
        let rate = Rate::from_percentage(5);

        let expected = Rate::from_decimal(rate.as_decimal() / dec!(366));
        assert_eq!(engine.daily_rate(rate, date(2024, 2, 29)), expected);
    }

    #[test]
    fn test_compounded_interest_matches_repeated_daily() {
        let engine = AccrualEngine::new(DayCountConvention::Actual365);
        let rate = Rate::from_percent(dec!(4.55));
        let start = date(2024, 11, 15);

        let mut balance = Money::from_major(331_794);
        let mut day = start;
        for _ in 0..31 {
            balance += engine.daily_interest(balance, rate, day);
            day = day.succ_opt().unwrap();
        }

        let interest = engine.compounded_interest(Money::from_major(331_794), start, 31, |_| rate);
        assert_eq!(Money::from_major(331_794) + interest, balance);
    }

    #[test]
    fn test_zero_days_accrue_nothing() {
        let engine = AccrualEngine::new(DayCountConvention::Actual365);
        let interest = engine.compounded_interest(
            Money::from_major(1_000),
            date(2024, 1, 1),
            0,
            |_| Rate::from_percentage(5),
        );
        assert_eq!(interest, Money::ZERO);
    }
}
