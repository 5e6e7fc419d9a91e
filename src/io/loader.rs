//! Load payment schedules from `payment_date,amount` csv files

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::config::parse_date;
use crate::decimal::Money;
use crate::errors::{MortgageError, Result};
use crate::types::PaymentRecord;

/// parse an amount as written in a bank export, e.g. `£1,691.02`
pub fn parse_amount(value: &str) -> std::result::Result<Money, String> {
    let cleaned: String = value
        .trim()
        .trim_start_matches('£')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    Decimal::from_str(cleaned.trim())
        .map(Money::from_decimal)
        .map_err(|e| format!("invalid amount '{}': {}", value, e))
}

/// Load all payments from a csv file
pub fn load_payments<P: AsRef<Path>>(path: P) -> Result<Vec<PaymentRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let payments = read_payments(file)?;
    log::info!("loaded {} payments from {}", payments.len(), path.display());
    Ok(payments)
}

/// Load payments from any reader (e.g., string buffer, network stream)
///
/// The first row is a header and is skipped whatever it says; columns are
/// taken by position. Rows come back in file order.
pub fn read_payments<R: Read>(reader: R) -> Result<Vec<PaymentRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut payments = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        payments.push(to_payment(&record)?);
    }

    Ok(payments)
}

fn to_payment(record: &StringRecord) -> Result<PaymentRecord> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let invalid = |message: String| MortgageError::InvalidRecord { line, message };

    if record.len() < 2 {
        return Err(invalid(format!(
            "expected payment_date and amount, got {} field(s)",
            record.len()
        )));
    }

    let effective_date = parse_date(&record[0]).map_err(|e| invalid(e.to_string()))?;
    let amount = parse_amount(&record[1]).map_err(invalid)?;

    Ok(PaymentRecord::new(effective_date, amount))
}
