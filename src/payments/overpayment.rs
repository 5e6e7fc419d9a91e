use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LoanConfiguration;
use crate::decimal::Money;
use crate::errors::{MortgageError, Result};

use super::amortization::{
    calculate_monthly_payment, AmortizationSchedule, RatePeriods, ScheduleLedger,
};

/// repayment schedule with a constant monthly overpayment on top of the
/// contractual payment
#[derive(Debug, Clone)]
pub struct OverpaymentSchedule {
    pub overpayment: Money,
    pub schedule: AmortizationSchedule,
}

impl OverpaymentSchedule {
    /// run the loan down month by month until the balance drops to a penny
    ///
    /// Each payment is the lesser of what is owed and the contractual payment
    /// plus `overpayment`, rounded to pence.
    pub fn generate(config: &LoanConfiguration, overpayment: Money) -> Result<Self> {
        config.validate()?;
        if overpayment.is_negative() {
            return Err(MortgageError::configuration(format!(
                "overpayment must not be negative, got {}",
                overpayment
            )));
        }

        let periods = RatePeriods::from_config(config);
        let mut ledger = ScheduleLedger::new(config.principal, config.start_date);

        let mut balance = config.principal;
        let mut contractual = Money::ZERO;
        let mut month = 0;

        while balance > Money::PENNY {
            month += 1;
            let (rate, rate_type) = periods.rate_for_month(month);
            if let Some(remaining) = periods.period_starting(month) {
                contractual = calculate_monthly_payment(balance, rate, remaining);
                log::debug!(
                    "month {}: {} payment {} plus overpayment {}",
                    month,
                    rate_type,
                    contractual,
                    overpayment
                );
            }

            let interest = balance.interest_at(rate.monthly_rate());
            let payment = (balance + interest).min(contractual + overpayment).to_pence();
            if payment <= interest {
                return Err(MortgageError::configuration(format!(
                    "payment of {} in month {} does not cover interest of {}",
                    payment, month, interest
                )));
            }

            balance -= payment - interest;
            ledger.record(month, rate, rate_type, payment, interest, balance)?;
        }

        log::info!("paid off after {} months with overpayment {}", month, overpayment);

        Ok(Self {
            overpayment,
            schedule: ledger.into_schedule(periods.tenure_months),
        })
    }

    /// months until the loan is cleared
    pub fn months(&self) -> u32 {
        self.schedule.payments.len() as u32
    }

    pub fn total_interest(&self) -> Money {
        self.schedule.total_interest
    }

    /// measure this schedule against the contractual one
    pub fn compare(&self, standard: &AmortizationSchedule) -> OverpaymentComparison {
        let months = self.months();
        let standard_months = standard.payments.len() as u32;

        OverpaymentComparison {
            monthly_overpayment: self.overpayment,
            standard_months,
            overpayment_months: months,
            years: months / 12,
            months: months % 12,
            months_saved: standard_months.saturating_sub(months),
            interest_saved: (standard.total_interest - self.schedule.total_interest).to_pence(),
            standard_ratio: standard.repayment_ratio(),
            overpayment_ratio: self.schedule.repayment_ratio(),
        }
    }
}

/// effect of overpaying, against the contractual schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverpaymentComparison {
    pub monthly_overpayment: Money,
    pub standard_months: u32,
    pub overpayment_months: u32,
    /// term with overpayment, as whole years plus months
    pub years: u32,
    pub months: u32,
    pub months_saved: u32,
    pub interest_saved: Money,
    pub standard_ratio: Option<Decimal>,
    pub overpayment_ratio: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::types::RateType;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn config() -> LoanConfiguration {
        LoanConfiguration::builder()
            .principal(Money::from_major(200_000))
            .fixed_rate(Rate::from_percentage(6))
            .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .tenure_years(30)
            .build()
            .unwrap()
    }

    #[test]
    fn test_overpayment_shortens_term() {
        let schedule = OverpaymentSchedule::generate(&config(), Money::from_major(200)).unwrap();

        assert_eq!(schedule.months(), 252);
        assert!(schedule.schedule.final_balance() <= Money::PENNY);

        let first = &schedule.schedule.payments[0];
        assert_eq!(first.payment, Money::from_str_exact("1399.10").unwrap());

        // final payment only clears what is owed
        let last = schedule.schedule.payments.last().unwrap();
        assert!(last.payment < first.payment);
        assert!(schedule.schedule.payments.iter().all(|p| p.payment == p.payment.to_pence()));
    }

    #[test]
    fn test_comparison_against_standard() {
        let config = config();
        let standard = AmortizationSchedule::generate(&config).unwrap();
        let overpaid = OverpaymentSchedule::generate(&config, Money::from_major(200)).unwrap();

        let comparison = overpaid.compare(&standard);
        assert_eq!(comparison.years, 21);
        assert_eq!(comparison.months, 0);
        assert_eq!(comparison.months_saved, 108);
        assert!(comparison.interest_saved > Money::from_major(75_000));
        assert!(comparison.overpayment_ratio < comparison.standard_ratio);
        assert_eq!(comparison.standard_ratio, Some(Decimal::new(216, 2)));
    }

    #[test]
    fn test_overpayment_across_rate_switch() {
        let config = LoanConfiguration::builder()
            .principal(Money::from_major(150_000))
            .fixed_rate(Rate::from_percentage(4))
            .variable_rate(Rate::from_percentage(7))
            .fixed_tenure_years(5)
            .start_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .tenure_years(25)
            .build()
            .unwrap();

        let schedule = OverpaymentSchedule::generate(&config, Money::from_major(100)).unwrap();
        let payments = &schedule.schedule.payments;

        assert_eq!(payments[59].rate_type, RateType::Fixed);
        assert_eq!(payments[60].rate_type, RateType::Variable);
        assert!(payments[60].payment > payments[59].payment);
        assert!(schedule.months() < 300);
        assert!(schedule.schedule.final_balance() <= Money::PENNY);
    }

    #[test]
    fn test_negative_overpayment_rejected() {
        let result = OverpaymentSchedule::generate(&config(), Money::from_major(-1));
        assert!(matches!(result, Err(MortgageError::InvalidConfiguration { .. })));
    }
}
