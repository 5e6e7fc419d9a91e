use crate::balance::BalanceSchedule;
use crate::config::LoanConfiguration;
use crate::decimal::Money;
use crate::errors::{MortgageError, Result};
use crate::events::{Event, EventStore};
use crate::interest::{AccrualEngine, RateSchedule};
use crate::payments::PaymentSchedule;
use crate::types::{DailyBalanceEntry, PaymentRecord};

/// computes the balance for every calendar day of a loan
///
/// Each day accrues one day's interest on the running balance, then applies
/// the payments effective that day in input order. The run stops on the day
/// the balance reaches zero or on the tenure end date, whichever comes first.
pub struct DailyBalanceEngine;

impl DailyBalanceEngine {
    pub fn compute(
        config: &LoanConfiguration,
        payments: &[PaymentRecord],
    ) -> Result<BalanceSchedule> {
        config.validate()?;
        let schedule = PaymentSchedule::new(config.start_date, payments.iter().copied())?;
        let maturity_date = config.maturity_date()?;
        let rates = RateSchedule::from_config(config)?;
        let accrual = AccrualEngine::new(config.day_count);

        let horizon_days = (maturity_date - config.start_date).num_days() + 1;
        let mut entries = Vec::with_capacity(horizon_days as usize);
        let mut events = EventStore::new();
        let mut cursor = schedule.cursor();

        let mut date = config.start_date;
        let mut balance = config.principal;
        let mut total_interest = Money::ZERO;
        let mut absorbed_excess = Money::ZERO;
        let mut payoff_date = None;

        let (mut current_rate, mut current_type) = rates.rate_on(date);
        events.emit(Event::SimulationStarted {
            principal: balance,
            rate: current_rate,
            rate_type: current_type,
            date,
        });
        log::info!(
            "simulating {} from {} to {} at {} ({} payments)",
            config.principal,
            config.start_date,
            maturity_date,
            current_rate,
            schedule.len()
        );

        loop {
            let (rate, rate_type) = rates.rate_on(date);
            if rate_type != current_type || rate != current_rate {
                events.emit(Event::RateChanged {
                    old_rate: current_rate,
                    new_rate: rate,
                    rate_type,
                    date,
                });
                current_rate = rate;
                current_type = rate_type;
            }

            let opening_balance = balance;
            let interest = accrual.daily_interest(balance, rate, date);
            balance += interest;
            total_interest += interest;

            let mut paid = Money::ZERO;
            for payment in cursor.due_on(date) {
                balance -= payment.amount;
                paid += payment.amount;
                events.emit(Event::PaymentApplied {
                    amount: payment.amount,
                    balance_after: balance.max(Money::ZERO),
                    date,
                });
            }

            let paid_off = !balance.is_positive();
            if paid_off {
                if balance.is_negative() {
                    absorbed_excess = -balance;
                    events.emit(Event::OverpaymentAbsorbed { excess: absorbed_excess, date });
                }
                balance = Money::ZERO;
                payoff_date = Some(date);
                events.emit(Event::LoanPaidOff { total_interest, date });
            }

            entries.push(DailyBalanceEntry {
                date,
                opening_balance,
                rate,
                rate_type,
                interest,
                payment: paid,
                balance,
            });

            if paid_off {
                break;
            }

            if date >= maturity_date {
                events.emit(Event::TenureEnded { outstanding_balance: balance, date });
                break;
            }

            date = date.succ_opt().ok_or_else(|| {
                MortgageError::date_arithmetic(format!("no calendar day after {}", date))
            })?;
        }

        let unapplied_payments = cursor.remaining().to_vec();
        for payment in &unapplied_payments {
            log::warn!(
                "payment of {} on {} falls after the simulation ended on {}",
                payment.amount,
                payment.effective_date,
                date
            );
            events.emit(Event::PaymentIgnored {
                amount: payment.amount,
                date: payment.effective_date,
            });
        }

        match payoff_date {
            Some(paid_on) => {
                log::info!("loan paid off on {} after {} days", paid_on, entries.len())
            }
            None => log::info!("tenure ended on {} with {} outstanding", date, balance.to_pence()),
        }

        Ok(BalanceSchedule {
            config: config.clone(),
            entries,
            events: events.take_events(),
            maturity_date,
            payoff_date,
            absorbed_excess,
            unapplied_payments,
        })
    }

    /// trajectory with no payments at all
    pub fn baseline(config: &LoanConfiguration) -> Result<BalanceSchedule> {
        Self::compute(config, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::interest::DayCountConvention;
    use crate::types::RateType;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scenario_config() -> LoanConfiguration {
        LoanConfiguration::builder()
            .principal(Money::from_major(300_000))
            .fixed_rate(Rate::from_percent(dec!(3.5)))
            .start_date(date(2024, 1, 1))
            .tenure_years(25)
            .build()
            .unwrap()
    }

    fn scenario_payments() -> Vec<PaymentRecord> {
        vec![
            PaymentRecord::new(date(2024, 12, 16), Money::from_str_exact("2350.98").unwrap()),
            PaymentRecord::new(date(2025, 1, 2), Money::from_str_exact("1691.02").unwrap()),
        ]
    }

    fn short_config(principal: i64, percent: Decimal) -> LoanConfiguration {
        LoanConfiguration::builder()
            .principal(Money::from_major(principal))
            .fixed_rate(Rate::from_percent(percent))
            .start_date(date(2024, 1, 1))
            .tenure_years(1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_scenario_payment_dates() {
        let config = scenario_config();
        let schedule = DailyBalanceEngine::compute(&config, &scenario_payments()).unwrap();
        let baseline = DailyBalanceEngine::baseline(&config).unwrap();

        // balance drops across each payment date
        let balance_on = |d: NaiveDate| schedule.balance_on(d).unwrap();
        assert!(balance_on(date(2024, 12, 16)) < balance_on(date(2024, 12, 15)));
        assert!(balance_on(date(2025, 1, 2)) < balance_on(date(2025, 1, 1)));

        // and stays below the interest-only trajectory afterwards
        for d in [date(2024, 12, 16), date(2025, 1, 1), date(2025, 1, 2), date(2030, 6, 1)] {
            assert!(schedule.balance_on(d).unwrap() < baseline.balance_on(d).unwrap());
        }

        // 02/01/2025 = 01/01/2025 + one day's interest - 1691.02
        let accrual = AccrualEngine::new(DayCountConvention::Actual365);
        let previous = schedule.balance_on(date(2025, 1, 1)).unwrap();
        let interest =
            accrual.daily_interest(previous, Rate::from_percent(dec!(3.5)), date(2025, 1, 2));
        let expected = previous + interest - Money::from_str_exact("1691.02").unwrap();
        assert_eq!(schedule.balance_on(date(2025, 1, 2)).unwrap(), expected);

        let entry = schedule.entry_on(date(2025, 1, 2)).unwrap();
        assert_eq!(entry.opening_balance, previous);
        assert_eq!(entry.interest, interest);
        assert!(entry.has_payment());
    }

    #[test]
    fn test_one_entry_per_day() {
        let schedule =
            DailyBalanceEngine::compute(&scenario_config(), &scenario_payments()).unwrap();

        // 25 years from 2024 include 7 leap days, both ends inclusive
        assert_eq!(schedule.len(), 25 * 365 + 7 + 1);
        assert_eq!(schedule.entries()[0].date, date(2024, 1, 1));
        assert_eq!(schedule.end_date(), date(2049, 1, 1));

        for pair in schedule.entries().windows(2) {
            assert_eq!(pair[0].date.succ_opt().unwrap(), pair[1].date);
            assert_eq!(pair[0].balance, pair[1].opening_balance);
        }
    }

    #[test]
    fn test_determinism() {
        let config = scenario_config();
        let first = DailyBalanceEngine::compute(&config, &scenario_payments()).unwrap();
        let second = DailyBalanceEngine::compute(&config, &scenario_payments()).unwrap();

        assert_eq!(first.entries(), second.entries());
        assert_eq!(first.summary(), second.summary());
    }

    #[test]
    fn test_baseline_compounds_daily() {
        let config = short_config(10_000, dec!(5));
        let schedule = DailyBalanceEngine::baseline(&config).unwrap();
        let daily_rate = dec!(0.05) / dec!(365);

        // day index i (start date = 0) has accrued i + 1 days
        let mut factor = Decimal::ONE;
        for entry in schedule.entries() {
            factor *= Decimal::ONE + daily_rate;
            let expected = dec!(10000) * factor;
            let diff = (entry.balance.as_decimal() - expected).abs();
            assert!(diff < dec!(0.0001), "{}: {} vs {}", entry.date, entry.balance, expected);
        }

        assert!(!schedule.is_paid_off());
        assert_eq!(schedule.len(), 367);
    }

    #[test]
    fn test_balance_never_negative() {
        let config = short_config(5_000, dec!(4));
        let payments: Vec<PaymentRecord> = (1..=12)
            .map(|m| PaymentRecord::new(date(2024, m, 1), Money::from_major(800)))
            .collect();

        let schedule = DailyBalanceEngine::compute(&config, &payments).unwrap();
        assert!(schedule.entries().iter().all(|e| !e.balance.is_negative()));
        assert!(schedule.is_paid_off());
        assert_eq!(schedule.payoff_date(), Some(date(2024, 7, 1)));
        // payments after payoff are not applied
        assert_eq!(schedule.unapplied_payments().len(), 5);
    }

    #[test]
    fn test_full_overpayment_terminates_same_day() {
        let config = short_config(1_000, dec!(5));
        let payments = vec![
            PaymentRecord::new(date(2024, 1, 10), Money::from_major(5_000)),
            PaymentRecord::new(date(2024, 2, 1), Money::from_major(100)),
        ];

        let schedule = DailyBalanceEngine::compute(&config, &payments).unwrap();
        let last = schedule.entries().last().unwrap();

        assert_eq!(last.date, date(2024, 1, 10));
        assert_eq!(last.balance, Money::ZERO);
        assert_eq!(schedule.len(), 10);
        assert_eq!(schedule.payoff_date(), Some(date(2024, 1, 10)));

        let owed = last.opening_balance + last.interest;
        assert_eq!(schedule.absorbed_excess(), Money::from_major(5_000) - owed);
        assert!(schedule.events().iter().any(|e| matches!(e, Event::OverpaymentAbsorbed { .. })));
        assert!(schedule.events().iter().any(|e| matches!(e, Event::PaymentIgnored { .. })));
    }

    #[test]
    fn test_exact_payoff() {
        let config = short_config(1_000, dec!(0));
        let payments = vec![PaymentRecord::new(date(2024, 1, 1), Money::from_major(1_000))];

        let schedule = DailyBalanceEngine::compute(&config, &payments).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.final_balance(), Money::ZERO);
        assert_eq!(schedule.absorbed_excess(), Money::ZERO);
        assert_eq!(schedule.payoff_date(), Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_same_day_payments_apply_in_order() {
        let config = short_config(10_000, dec!(3));
        let payments = vec![
            PaymentRecord::new(date(2024, 3, 1), Money::from_major(700)),
            PaymentRecord::new(date(2024, 3, 1), Money::from_major(300)),
        ];

        let schedule = DailyBalanceEngine::compute(&config, &payments).unwrap();
        let entry = schedule.entry_on(date(2024, 3, 1)).unwrap();
        assert_eq!(entry.payment, Money::from_major(1_000));

        let applied: Vec<Money> = schedule
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::PaymentApplied { amount, .. } => Some(*amount),
                _ => None,
            })
            .collect();
        assert_eq!(applied, vec![Money::from_major(700), Money::from_major(300)]);
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let mut config = scenario_config();
        config.principal = Money::from_major(-1);
        let result = DailyBalanceEngine::compute(&config, &[]);
        assert!(matches!(result, Err(MortgageError::InvalidConfiguration { .. })));

        let mut config = scenario_config();
        config.tenure_years = 0;
        let result = DailyBalanceEngine::compute(&config, &[]);
        assert!(matches!(result, Err(MortgageError::InvalidConfiguration { .. })));

        let mut config = scenario_config();
        config.fixed_rate = None;
        let result = DailyBalanceEngine::compute(&config, &[]);
        assert!(matches!(result, Err(MortgageError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_payment_before_start_rejected() {
        let payments = vec![PaymentRecord::new(date(2023, 12, 31), Money::from_major(100))];
        let result = DailyBalanceEngine::compute(&scenario_config(), &payments);
        assert!(matches!(result, Err(MortgageError::InvalidPaymentSchedule { .. })));
    }

    #[test]
    fn test_fixed_to_variable_switch() {
        let config = LoanConfiguration::builder()
            .principal(Money::from_major(100_000))
            .fixed_rate(Rate::from_percent(dec!(2)))
            .variable_rate(Rate::from_percent(dec!(5)))
            .fixed_tenure_years(1)
            .start_date(date(2024, 1, 1))
            .tenure_years(2)
            .build()
            .unwrap();

        let schedule = DailyBalanceEngine::baseline(&config).unwrap();
        let before = schedule.entry_on(date(2024, 12, 31)).unwrap();
        let after = schedule.entry_on(date(2025, 1, 1)).unwrap();

        assert_eq!(before.rate_type, RateType::Fixed);
        assert_eq!(after.rate_type, RateType::Variable);
        assert!(after.interest > before.interest);

        let changes: Vec<&Event> = schedule
            .events()
            .iter()
            .filter(|e| matches!(e, Event::RateChanged { .. }))
            .collect();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].date(), date(2025, 1, 1));
    }

    #[test]
    fn test_tenure_end_leaves_balance() {
        let config = short_config(10_000, dec!(5));
        let payments = vec![
            PaymentRecord::new(date(2024, 6, 1), Money::from_major(500)),
            PaymentRecord::new(date(2025, 6, 1), Money::from_major(500)),
        ];

        let schedule = DailyBalanceEngine::compute(&config, &payments).unwrap();
        assert_eq!(schedule.end_date(), date(2025, 1, 1));
        assert!(schedule.final_balance().is_positive());
        assert_eq!(schedule.unapplied_payments().len(), 1);
        assert!(schedule.events().iter().any(|e| matches!(e, Event::TenureEnded { .. })));
    }

    #[test]
    fn test_comparison_against_baseline() {
        let config = scenario_config();
        let schedule = DailyBalanceEngine::compute(&config, &scenario_payments()).unwrap();
        let baseline = DailyBalanceEngine::baseline(&config).unwrap();

        let comparison = schedule.compare(&baseline);
        assert!(comparison.interest_saved.is_positive());
        assert!(comparison.balance_reduction.is_positive());
        assert_eq!(comparison.days_saved, 0);
        assert_eq!(comparison.payoff_date, None);

        let summary = schedule.summary();
        assert_eq!(summary.total_payments, Money::from_major(4_042));
        assert_eq!(summary.total_days, schedule.len() as u32);
    }
}
