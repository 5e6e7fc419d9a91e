pub mod accrual;
pub mod schedule;

pub use accrual::{AccrualEngine, DayCountConvention, DAYS_IN_YEAR};
pub use schedule::RateSchedule;
