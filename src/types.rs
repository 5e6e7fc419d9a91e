use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::{Money, Rate};

/// which side of the fixed/variable split a rate belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateType {
    Fixed,
    Variable,
}

impl fmt::Display for RateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateType::Fixed => write!(f, "Fixed"),
            RateType::Variable => write!(f, "Variable"),
        }
    }
}

/// a single payment reducing the outstanding balance on its effective date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub effective_date: NaiveDate,
    pub amount: Money,
}

impl PaymentRecord {
    pub fn new(effective_date: NaiveDate, amount: Money) -> Self {
        Self { effective_date, amount }
    }
}

/// one calendar day of the balance trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBalanceEntry {
    pub date: NaiveDate,
    /// balance brought forward from the previous day
    pub opening_balance: Money,
    /// annual rate applied on this day
    pub rate: Rate,
    pub rate_type: RateType,
    pub interest: Money,
    /// sum of all payments effective on this day
    pub payment: Money,
    /// balance carried forward, never negative
    pub balance: Money,
}

impl DailyBalanceEntry {
    /// payment net of the day's interest
    pub fn principal_repaid(&self) -> Money {
        self.payment - self.interest
    }

    pub fn has_payment(&self) -> bool {
        self.payment.is_positive()
    }
}
