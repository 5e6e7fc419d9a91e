//! csv views of computed schedules, using the column headings of the
//! spreadsheet exports the tool has always produced

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

use crate::balance::{BalanceSchedule, PaymentDaySchedule};
use crate::config::DATE_FORMAT;
use crate::decimal::Money;
use crate::errors::Result;
use crate::payments::AmortizationSchedule;
use crate::types::RateType;

/// serializable view of one day of a balance schedule
#[derive(Debug, Serialize)]
pub struct BalanceRowView {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Total Loan Balance B/F")]
    pub opening_balance: Money,
    #[serde(rename = "Rate")]
    pub rate: Decimal,
    #[serde(rename = "Transaction")]
    pub payment: Money,
    #[serde(rename = "Description")]
    pub description: &'static str,
    #[serde(rename = "Mortgage Interest")]
    pub interest: Money,
    #[serde(rename = "Principal repaid")]
    pub principal_repaid: Money,
    #[serde(rename = "Total Loan Balance C/F")]
    pub closing_balance: Money,
}

#[derive(Debug, Serialize)]
pub struct PaymentDayRowView {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Total Loan Balance B/F")]
    pub opening_balance: Money,
    #[serde(rename = "Number of days since last payment")]
    pub days: u32,
    #[serde(rename = "Rate")]
    pub rate: Decimal,
    #[serde(rename = "Transaction")]
    pub payment: Money,
    #[serde(rename = "Mortgage Interest")]
    pub interest: Money,
    #[serde(rename = "Principal repaid")]
    pub principal_repaid: Money,
    #[serde(rename = "Total Loan Balance C/F")]
    pub closing_balance: Money,
}

#[derive(Debug, Serialize)]
pub struct AmortizationRowView {
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Rate")]
    pub rate: Decimal,
    #[serde(rename = "Rate type")]
    pub rate_type: RateType,
    #[serde(rename = "Payment")]
    pub payment: Money,
    #[serde(rename = "Interest charged")]
    pub interest: Money,
    #[serde(rename = "Principal repaid")]
    pub principal: Money,
    #[serde(rename = "Paid to date")]
    pub paid_to_date: Money,
    #[serde(rename = "Interest charged to date")]
    pub interest_to_date: Money,
    #[serde(rename = "Principal repaid to date")]
    pub principal_to_date: Money,
    #[serde(rename = "Loan balance")]
    pub balance: Money,
    /// percentage of the loan repaid
    #[serde(rename = "Equity")]
    pub equity: Decimal,
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn write_rows<W: Write, T: Serialize>(writer: W, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// write the daily trajectory, amounts rounded to pence
pub fn write_balance_csv<W: Write>(schedule: &BalanceSchedule, writer: W) -> Result<()> {
    let rows = schedule.entries().iter().map(|entry| BalanceRowView {
        date: format_date(entry.date),
        opening_balance: entry.opening_balance.to_pence(),
        rate: entry.rate.as_percentage().normalize(),
        payment: entry.payment.to_pence(),
        description: if entry.has_payment() { "Payment" } else { "" },
        interest: entry.interest.to_pence(),
        principal_repaid: entry.principal_repaid().to_pence(),
        closing_balance: entry.balance.to_pence(),
    });
    write_rows(writer, rows)
}

pub fn write_payment_day_csv<W: Write>(schedule: &PaymentDaySchedule, writer: W) -> Result<()> {
    let rows = schedule.entries.iter().map(|entry| PaymentDayRowView {
        date: format_date(entry.date),
        opening_balance: entry.opening_balance.to_pence(),
        days: entry.days_accrued,
        rate: entry.rate.as_percentage().normalize(),
        payment: entry.payment.to_pence(),
        interest: entry.interest.to_pence(),
        principal_repaid: entry.principal_repaid.to_pence(),
        closing_balance: entry.closing_balance.to_pence(),
    });
    write_rows(writer, rows)
}

/// write an amortisation or overpayment schedule
pub fn write_amortization_csv<W: Write>(schedule: &AmortizationSchedule, writer: W) -> Result<()> {
    let rows = schedule.payments.iter().map(|p| AmortizationRowView {
        month: p.month,
        date: format_date(p.payment_date),
        rate: p.rate.as_percentage().normalize(),
        rate_type: p.rate_type,
        payment: p.payment.to_pence(),
        interest: p.interest.to_pence(),
        principal: p.principal.to_pence(),
        paid_to_date: p.paid_to_date.to_pence(),
        interest_to_date: p.interest_to_date.to_pence(),
        principal_to_date: p.principal_to_date.to_pence(),
        balance: p.balance.to_pence(),
        equity: (p.equity * Decimal::ONE_HUNDRED).round_dp(2).normalize(),
    });
    write_rows(writer, rows)
}
