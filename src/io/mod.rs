//! Reading payment schedules and writing schedules out as csv.

pub mod export;
pub mod loader;

pub use export::{write_amortization_csv, write_balance_csv, write_payment_day_csv};
pub use loader::{load_payments, parse_amount, read_payments};
