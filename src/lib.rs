pub mod balance;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod io;
pub mod payments;
pub mod report;
pub mod types;

// re-export key types
pub use balance::{
    BalanceSchedule, BalanceSummary, DailyBalanceEngine, PaymentDayEngine, PaymentDayEntry,
    PaymentDaySchedule, ScheduleComparison,
};
pub use config::{
    parse_date, LoanConfiguration, LoanConfigurationBuilder, LoanSettings, DATE_FORMAT,
};
pub use decimal::{Money, Rate};
pub use errors::{MortgageError, Result};
pub use events::{Event, EventStore};
pub use interest::{AccrualEngine, DayCountConvention, RateSchedule, DAYS_IN_YEAR};
pub use io::{load_payments, read_payments};
pub use payments::{
    calculate_monthly_payment, AmortizationSchedule, OverpaymentComparison, OverpaymentSchedule,
    PaymentSchedule, ScheduledPayment,
};
pub use types::{DailyBalanceEntry, PaymentRecord, RateType};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
