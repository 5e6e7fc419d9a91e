pub mod amortization;
pub mod overpayment;

use chrono::NaiveDate;

use crate::decimal::Money;
use crate::errors::{MortgageError, Result};
use crate::types::PaymentRecord;

pub use amortization::{calculate_monthly_payment, AmortizationSchedule, ScheduledPayment};
pub use overpayment::{OverpaymentComparison, OverpaymentSchedule};

/// validated, date-ordered payment sequence for one loan
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSchedule {
    records: Vec<PaymentRecord>,
}

impl PaymentSchedule {
    /// validate against the loan start and order by date
    ///
    /// The sort is stable, so payments sharing a date keep their input order.
    pub fn new(
        start_date: NaiveDate,
        records: impl IntoIterator<Item = PaymentRecord>,
    ) -> Result<Self> {
        let mut records: Vec<PaymentRecord> = records.into_iter().collect();

        for (index, record) in records.iter().enumerate() {
            if record.effective_date < start_date {
                return Err(MortgageError::schedule(format!(
                    "payment {} of {} dated {} falls before loan start {}",
                    index + 1,
                    record.amount,
                    record.effective_date,
                    start_date
                )));
            }
            if !record.amount.is_positive() {
                return Err(MortgageError::schedule(format!(
                    "payment {} dated {} has non-positive amount {}",
                    index + 1,
                    record.effective_date,
                    record.amount
                )));
            }
        }

        records.sort_by_key(|record| record.effective_date);

        Ok(Self { records })
    }

    pub fn records(&self) -> &[PaymentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total(&self) -> Money {
        self.records.iter().map(|record| record.amount).sum()
    }

    pub fn cursor(&self) -> PaymentCursor<'_> {
        PaymentCursor {
            records: &self.records,
            position: 0,
        }
    }
}

/// walks a schedule forward one date at a time
#[derive(Debug)]
pub struct PaymentCursor<'a> {
    records: &'a [PaymentRecord],
    position: usize,
}

impl<'a> PaymentCursor<'a> {
    /// payments effective on `date`, in schedule order
    ///
    /// Dates must be visited in ascending order; records dated before `date`
    /// that were never visited are skipped.
    pub fn due_on(&mut self, date: NaiveDate) -> &'a [PaymentRecord] {
        let records = self.records;
        let dated = |position: usize| records.get(position).map(|r| r.effective_date);

        while matches!(dated(self.position), Some(d) if d < date) {
            self.position += 1;
        }

        let start = self.position;
        while dated(self.position) == Some(date) {
            self.position += 1;
        }

        &self.records[start..self.position]
    }

    /// payments not yet handed out
    pub fn remaining(&self) -> &'a [PaymentRecord] {
        &self.records[self.position..]
    }
}
