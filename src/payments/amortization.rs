use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LoanConfiguration;
use crate::decimal::{Money, Rate};
use crate::errors::{MortgageError, Result};
use crate::types::RateType;

/// one month of a repayment schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    pub month: u32,
    pub payment_date: NaiveDate,
    pub rate: Rate,
    pub rate_type: RateType,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub paid_to_date: Money,
    pub interest_to_date: Money,
    pub principal_to_date: Money,
    pub balance: Money,
    /// share of the loan repaid so far
    pub equity: Decimal,
}

/// monthly repayment schedule over the full tenure
#[derive(Debug, Clone)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub start_date: NaiveDate,
    pub term_months: u32,
    pub payments: Vec<ScheduledPayment>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl AmortizationSchedule {
    /// generate the contractual schedule for a loan
    ///
    /// The payment is sized on the principal over the whole term. When a
    /// variable period follows a fixed one, the payment is resized on the
    /// remaining balance over the remaining months.
    pub fn generate(config: &LoanConfiguration) -> Result<Self> {
        config.validate()?;
        let periods = RatePeriods::from_config(config);
        let mut ledger = ScheduleLedger::new(config.principal, config.start_date);

        let mut balance = config.principal;
        let mut payment = Money::ZERO;

        for month in 1..=periods.tenure_months {
            let (rate, rate_type) = periods.rate_for_month(month);
            if let Some(remaining) = periods.period_starting(month) {
                payment = calculate_monthly_payment(balance, rate, remaining);
                log::debug!(
                    "month {}: {} payment {} over {} months",
                    month,
                    rate_type,
                    payment,
                    remaining
                );
            }

            let interest = balance.interest_at(rate.monthly_rate());
            balance -= payment - interest;
            ledger.record(month, rate, rate_type, payment, interest, balance)?;
        }

        // fold rounding residue into the last payment
        if let Some(last) = ledger.rows.last_mut() {
            if last.balance.is_positive() && last.balance < Money::ONE {
                last.principal += last.balance;
                last.payment += last.balance;
                last.paid_to_date += last.balance;
                last.principal_to_date += last.balance;
                last.balance = Money::ZERO;
            }
        }

        Ok(ledger.into_schedule(periods.tenure_months))
    }

    /// get payment for a 1-based month
    pub fn get_payment(&self, month: u32) -> Option<&ScheduledPayment> {
        month
            .checked_sub(1)
            .and_then(|index| self.payments.get(index as usize))
    }

    /// remaining balance after the given month
    pub fn balance_after_payment(&self, month: u32) -> Money {
        self.get_payment(month)
            .map(|p| p.balance)
            .unwrap_or(self.principal)
    }

    /// contractual payment in the first month
    pub fn initial_payment(&self) -> Money {
        self.payments
            .first()
            .map(|p| p.payment)
            .unwrap_or(Money::ZERO)
    }

    pub fn final_balance(&self) -> Money {
        self.payments
            .last()
            .map(|p| p.balance)
            .unwrap_or(self.principal)
    }

    /// total repaid per unit borrowed, to 2 dp
    pub fn repayment_ratio(&self) -> Option<Decimal> {
        self.total_payment
            .ratio_to(self.principal)
            .map(|ratio| ratio.round_dp(2))
    }
}

/// level monthly payment that clears `principal` over `months`
///
/// EMI = P * r * (1 + r)^n / ((1 + r)^n - 1) with r the monthly rate;
/// a zero rate falls back to equal principal instalments.
pub fn calculate_monthly_payment(principal: Money, annual_rate: Rate, months: u32) -> Money {
    if months == 0 {
        return principal;
    }

    let r = annual_rate.monthly_rate().as_decimal();

    if r.is_zero() {
        return principal / Decimal::from(months);
    }

    let mut compound = Decimal::ONE;
    let base = Decimal::ONE + r;
    for _ in 0..months {
        compound *= base;
    }

    let numerator = principal.as_decimal() * r * compound;
    let denominator = compound - Decimal::ONE;

    Money::from_decimal(numerator / denominator)
}

/// fixed months first, then variable for the rest of the term
#[derive(Debug, Clone, Copy)]
pub(crate) struct RatePeriods {
    fixed: Rate,
    variable: Rate,
    pub(crate) fixed_months: u32,
    pub(crate) tenure_months: u32,
}

impl RatePeriods {
    pub(crate) fn from_config(config: &LoanConfiguration) -> Self {
        let fixed = config.fixed_rate.unwrap_or(Rate::ZERO);
        Self {
            fixed,
            variable: config.variable_rate.unwrap_or(fixed),
            fixed_months: config.fixed_months().min(config.tenure_months()),
            tenure_months: config.tenure_months(),
        }
    }

    /// months past the term keep the rate of the final period
    pub(crate) fn rate_for_month(&self, month: u32) -> (Rate, RateType) {
        if month <= self.fixed_months || self.fixed_months >= self.tenure_months {
            (self.fixed, RateType::Fixed)
        } else {
            (self.variable, RateType::Variable)
        }
    }

    /// months left in the term when a rate period begins at `month`
    pub(crate) fn period_starting(&self, month: u32) -> Option<u32> {
        let switches = self.fixed_months > 0 && self.fixed_months < self.tenure_months;
        if month == 1 || (switches && month == self.fixed_months + 1) {
            Some(self.tenure_months.saturating_sub(month - 1))
        } else {
            None
        }
    }
}

/// accumulates rows and running totals for a monthly schedule
#[derive(Debug)]
pub(crate) struct ScheduleLedger {
    principal: Money,
    start_date: NaiveDate,
    pub(crate) rows: Vec<ScheduledPayment>,
    paid: Money,
    interest: Money,
    repaid: Money,
}

impl ScheduleLedger {
    pub(crate) fn new(principal: Money, start_date: NaiveDate) -> Self {
        Self {
            principal,
            start_date,
            rows: Vec::new(),
            paid: Money::ZERO,
            interest: Money::ZERO,
            repaid: Money::ZERO,
        }
    }

    pub(crate) fn record(
        &mut self,
        month: u32,
        rate: Rate,
        rate_type: RateType,
        payment: Money,
        interest: Money,
        balance: Money,
    ) -> Result<()> {
        let payment_date = self
            .start_date
            .checked_add_months(Months::new(month))
            .ok_or_else(|| {
                MortgageError::date_arithmetic(format!(
                    "{} plus {} months is out of range",
                    self.start_date, month
                ))
            })?;
        let principal = payment - interest;

        self.paid += payment;
        self.interest += interest;
        self.repaid += principal;

        self.rows.push(ScheduledPayment {
            month,
            payment_date,
            rate,
            rate_type,
            payment,
            interest,
            principal,
            paid_to_date: self.paid,
            interest_to_date: self.interest,
            principal_to_date: self.repaid,
            balance: balance.max(Money::ZERO),
            equity: self.repaid.ratio_to(self.principal).unwrap_or(Decimal::ZERO),
        });

        Ok(())
    }

    pub(crate) fn into_schedule(self, term_months: u32) -> AmortizationSchedule {
        let total_interest = self.rows.iter().map(|p| p.interest).sum();
        let total_payment = self.rows.iter().map(|p| p.payment).sum();

        AmortizationSchedule {
            principal: self.principal,
            start_date: self.start_date,
            term_months,
            payments: self.rows,
            total_interest,
            total_payment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed_config(principal: i64, rate: Decimal, years: u32) -> LoanConfiguration {
        LoanConfiguration::builder()
            .principal(Money::from_major(principal))
            .fixed_rate(Rate::from_percent(rate))
            .start_date(date(2024, 1, 1))
            .tenure_years(years)
            .build()
            .unwrap()
    }

    #[test]
    fn test_monthly_payment() {
        let emi =
            calculate_monthly_payment(Money::from_major(100_000), Rate::from_percentage(12), 12);
        assert_eq!(emi.to_pence(), Money::from_str_exact("8884.88").unwrap());

        let emi =
            calculate_monthly_payment(Money::from_major(200_000), Rate::from_percentage(6), 360);
        assert_eq!(emi.to_pence(), Money::from_str_exact("1199.10").unwrap());
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let emi = calculate_monthly_payment(Money::from_major(120_000), Rate::ZERO, 120);
        assert_eq!(emi, Money::from_major(1_000));
    }

    #[test]
    fn test_fixed_schedule_reaches_zero() {
        let schedule = AmortizationSchedule::generate(&fixed_config(200_000, dec!(6), 30)).unwrap();

        assert_eq!(schedule.payments.len(), 360);
        assert_eq!(schedule.final_balance(), Money::ZERO);
        assert_eq!(
            schedule.initial_payment().to_pence(),
            Money::from_str_exact("1199.10").unwrap()
        );

        let first = schedule.get_payment(1).unwrap();
        assert_eq!(first.payment_date, date(2024, 2, 1));
        assert_eq!(first.interest, Money::from_major(1_000));
        assert_eq!(first.rate_type, RateType::Fixed);

        let last = schedule.get_payment(360).unwrap();
        assert_eq!(last.payment_date, date(2054, 1, 1));
        assert!((last.equity - Decimal::ONE).abs() < dec!(0.000001));
        assert!((last.principal_to_date - schedule.principal).abs() < Money::PENNY);
        assert_eq!(schedule.total_payment, last.paid_to_date);
        assert!(schedule.get_payment(0).is_none());
    }

    #[test]
    fn test_interest_declines_each_month() {
        let schedule = AmortizationSchedule::generate(&fixed_config(100_000, dec!(12), 1)).unwrap();
        for pair in schedule.payments.windows(2) {
            assert!(pair[1].interest < pair[0].interest);
        }
        assert_eq!(schedule.repayment_ratio(), Some(dec!(1.07)));
    }

    #[test]
    fn test_variable_period_resizes_payment() {
        let config = LoanConfiguration::builder()
            .principal(Money::from_major(200_000))
            .fixed_rate(Rate::from_percentage(6))
            .variable_rate(Rate::from_percentage(8))
            .fixed_tenure_years(2)
            .start_date(date(2024, 1, 1))
            .tenure_years(30)
            .build()
            .unwrap();

        let schedule = AmortizationSchedule::generate(&config).unwrap();
        let fixed_payment = schedule.initial_payment();

        for payment in &schedule.payments[..24] {
            assert_eq!(payment.rate_type, RateType::Fixed);
            assert_eq!(payment.payment, fixed_payment);
        }

        let switch = schedule.get_payment(25).unwrap();
        let expected = calculate_monthly_payment(
            schedule.balance_after_payment(24),
            Rate::from_percentage(8),
            336,
        );
        assert_eq!(switch.rate_type, RateType::Variable);
        assert_eq!(switch.rate, Rate::from_percentage(8));
        assert_eq!(switch.payment, expected);
        assert!(switch.payment > fixed_payment);
        assert_eq!(schedule.final_balance(), Money::ZERO);
    }

    #[test]
    fn test_variable_only_loan() {
        let config = LoanConfiguration::builder()
            .principal(Money::from_major(100_000))
            .variable_rate(Rate::from_percentage(5))
            .start_date(date(2024, 1, 1))
            .tenure_years(10)
            .build()
            .unwrap();

        let schedule = AmortizationSchedule::generate(&config).unwrap();
        assert!(schedule.payments.iter().all(|p| p.rate_type == RateType::Variable));
        assert_eq!(schedule.final_balance(), Money::ZERO);
    }
}
