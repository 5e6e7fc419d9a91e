use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::LoanConfiguration;
use crate::decimal::{Money, Rate};
use crate::errors::{MortgageError, Result};
use crate::interest::{AccrualEngine, RateSchedule};
use crate::payments::PaymentSchedule;
use crate::types::{PaymentRecord, RateType};

/// one row per payment, with interest accrued since the previous row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDayEntry {
    pub date: NaiveDate,
    pub opening_balance: Money,
    /// calendar days of interest included in this row
    pub days_accrued: u32,
    pub rate: Rate,
    pub rate_type: RateType,
    pub payment: Money,
    pub interest: Money,
    pub principal_repaid: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone)]
pub struct PaymentDaySchedule {
    pub entries: Vec<PaymentDayEntry>,
    pub as_of: NaiveDate,
    pub payoff_date: Option<NaiveDate>,
}

impl PaymentDaySchedule {
    pub fn final_balance(&self) -> Money {
        self.entries
            .last()
            .map(|entry| entry.closing_balance)
            .unwrap_or(Money::ZERO)
    }

    pub fn total_interest(&self) -> Money {
        self.entries.iter().map(|entry| entry.interest).sum()
    }
}

/// balance rolled forward from payment to payment instead of day by day
///
/// Every calendar day from the start date is accrued exactly once, so closing
/// balances agree with the daily engine on each payment date.
pub struct PaymentDayEngine;

impl PaymentDayEngine {
    /// roll the balance through every payment up to `as_of`, then add a final
    /// row on `as_of` carrying `as_of_payment` (which may be zero)
    pub fn compute(
        config: &LoanConfiguration,
        payments: &[PaymentRecord],
        as_of: NaiveDate,
        as_of_payment: Money,
    ) -> Result<PaymentDaySchedule> {
        config.validate()?;
        let schedule = PaymentSchedule::new(config.start_date, payments.iter().copied())?;
        let maturity_date = config.maturity_date()?;
        let rates = RateSchedule::from_config(config)?;
        let accrual = AccrualEngine::new(config.day_count);

        if as_of < config.start_date {
            return Err(MortgageError::schedule(format!(
                "balance date {} precedes loan start {}",
                as_of, config.start_date
            )));
        }
        if as_of_payment.is_negative() {
            return Err(MortgageError::schedule(format!(
                "payment on {} must not be negative, got {}",
                as_of, as_of_payment
            )));
        }

        let as_of = if as_of > maturity_date {
            log::warn!("balance date {} is past maturity; using {}", as_of, maturity_date);
            maturity_date
        } else {
            as_of
        };

        let mut rows: Vec<PaymentRecord> = schedule
            .records()
            .iter()
            .copied()
            .filter(|record| record.effective_date <= as_of)
            .collect();
        let skipped = schedule.len() - rows.len();
        if skipped > 0 {
            log::debug!("{} payments dated after {} left out", skipped, as_of);
        }
        rows.push(PaymentRecord {
            effective_date: as_of,
            amount: as_of_payment,
        });

        let mut entries = Vec::with_capacity(rows.len());
        let mut balance = config.principal;
        let mut accrue_from = config.start_date;
        let mut payoff_date = None;

        for row in rows {
            let days = ((row.effective_date - accrue_from).num_days() + 1).max(0) as u32;
            let interest = accrual
                .compounded_interest(balance, accrue_from, days, |d| rates.annual_rate_on(d));
            let (rate, rate_type) = rates.rate_on(row.effective_date);

            let opening_balance = balance;
            let mut closing_balance = opening_balance + interest - row.amount;
            if !closing_balance.is_positive() {
                closing_balance = Money::ZERO;
                payoff_date = Some(row.effective_date);
            }

            entries.push(PaymentDayEntry {
                date: row.effective_date,
                opening_balance,
                days_accrued: days,
                rate,
                rate_type,
                payment: row.amount,
                interest,
                principal_repaid: row.amount - interest,
                closing_balance,
            });

            if payoff_date.is_some() {
                break;
            }

            balance = closing_balance;
            if days > 0 {
                accrue_from = row
                    .effective_date
                    .succ_opt()
                    .ok_or_else(|| {
                        MortgageError::date_arithmetic(format!(
                            "no calendar day after {}",
                            row.effective_date
                        ))
                    })?;
            }
        }

        Ok(PaymentDaySchedule {
            entries,
            as_of,
            payoff_date,
        })
    }
}
