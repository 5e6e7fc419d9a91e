pub mod daily;
pub mod payment_day;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::LoanConfiguration;
use crate::decimal::Money;
use crate::events::Event;
use crate::types::{DailyBalanceEntry, PaymentRecord};

pub use daily::DailyBalanceEngine;
pub use payment_day::{PaymentDayEngine, PaymentDayEntry, PaymentDaySchedule};

/// the day-by-day balance trajectory produced by one simulation run
#[derive(Debug, Clone)]
pub struct BalanceSchedule {
    pub(crate) config: LoanConfiguration,
    pub(crate) entries: Vec<DailyBalanceEntry>,
    pub(crate) events: Vec<Event>,
    pub(crate) maturity_date: NaiveDate,
    pub(crate) payoff_date: Option<NaiveDate>,
    pub(crate) absorbed_excess: Money,
    pub(crate) unapplied_payments: Vec<PaymentRecord>,
}

impl BalanceSchedule {
    pub fn config(&self) -> &LoanConfiguration {
        &self.config
    }

    pub fn entries(&self) -> &[DailyBalanceEntry] {
        &self.entries
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.config.start_date
    }

    /// date of the last recorded entry
    pub fn end_date(&self) -> NaiveDate {
        self.entries
            .last()
            .map(|entry| entry.date)
            .unwrap_or(self.config.start_date)
    }

    pub fn maturity_date(&self) -> NaiveDate {
        self.maturity_date
    }

    pub fn payoff_date(&self) -> Option<NaiveDate> {
        self.payoff_date
    }

    pub fn is_paid_off(&self) -> bool {
        self.payoff_date.is_some()
    }

    pub fn final_balance(&self) -> Money {
        self.entries
            .last()
            .map(|entry| entry.balance)
            .unwrap_or(self.config.principal)
    }

    /// entry for `date`, if the trajectory covers it
    pub fn entry_on(&self, date: NaiveDate) -> Option<&DailyBalanceEntry> {
        let offset = (date - self.config.start_date).num_days();
        if offset < 0 {
            return None;
        }
        self.entries.get(offset as usize)
    }

    pub fn balance_on(&self, date: NaiveDate) -> Option<Money> {
        self.entry_on(date).map(|entry| entry.balance)
    }

    pub fn total_interest(&self) -> Money {
        self.entries.iter().map(|entry| entry.interest).sum()
    }

    /// sum of payments applied, including any absorbed excess
    pub fn total_payments(&self) -> Money {
        self.entries.iter().map(|entry| entry.payment).sum()
    }

    /// portion of the final payment that exceeded the balance
    pub fn absorbed_excess(&self) -> Money {
        self.absorbed_excess
    }

    /// payments dated after payoff or after the tenure horizon
    pub fn unapplied_payments(&self) -> &[PaymentRecord] {
        &self.unapplied_payments
    }

    pub fn summary(&self) -> BalanceSummary {
        BalanceSummary {
            principal: self.config.principal,
            start_date: self.start_date(),
            end_date: self.end_date(),
            maturity_date: self.maturity_date,
            payoff_date: self.payoff_date,
            total_days: self.entries.len() as u32,
            total_interest: self.total_interest().to_pence(),
            total_payments: self.total_payments().to_pence(),
            absorbed_excess: self.absorbed_excess.to_pence(),
            final_balance: self.final_balance().to_pence(),
            unapplied_payments: self.unapplied_payments.len() as u32,
        }
    }

    /// effect of this run's payments measured against `baseline`
    pub fn compare(&self, baseline: &BalanceSchedule) -> ScheduleComparison {
        ScheduleComparison {
            interest_saved: (baseline.total_interest() - self.total_interest()).to_pence(),
            days_saved: baseline.entries.len() as i64 - self.entries.len() as i64,
            balance_reduction: (baseline.final_balance() - self.final_balance()).to_pence(),
            payoff_date: self.payoff_date,
            baseline_payoff_date: baseline.payoff_date,
        }
    }
}

/// headline figures for a balance run, rounded to pence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub principal: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub payoff_date: Option<NaiveDate>,
    pub total_days: u32,
    pub total_interest: Money,
    pub total_payments: Money,
    pub absorbed_excess: Money,
    pub final_balance: Money,
    pub unapplied_payments: u32,
}

/// difference between a run with payments and a baseline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleComparison {
    pub interest_saved: Money,
    pub days_saved: i64,
    pub balance_reduction: Money,
    pub payoff_date: Option<NaiveDate>,
    pub baseline_payoff_date: Option<NaiveDate>,
}
