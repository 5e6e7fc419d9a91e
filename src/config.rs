use chrono::{Months, NaiveDate};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::decimal::{Money, Rate};
use crate::errors::{MortgageError, Result};
use crate::interest::DayCountConvention;

/// date format used by payment schedules and configuration files
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// parse a `DD/MM/YYYY` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        MortgageError::configuration(format!(
            "invalid date '{}': {} (expected DD/MM/YYYY)",
            value, e
        ))
    })
}

/// immutable loan terms for a single simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanConfiguration {
    pub principal: Money,
    pub fixed_rate: Option<Rate>,
    pub variable_rate: Option<Rate>,
    /// length of the fixed-rate period; variable applies afterwards
    pub fixed_tenure_years: Option<u32>,
    pub start_date: NaiveDate,
    pub tenure_years: u32,
    #[serde(default)]
    pub day_count: DayCountConvention,
}

impl LoanConfiguration {
    pub fn builder() -> LoanConfigurationBuilder {
        LoanConfigurationBuilder::new()
    }

    /// check the loan invariants
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(MortgageError::configuration(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }

        if self.tenure_years == 0 {
            return Err(MortgageError::configuration("tenure must be at least one year"));
        }

        if self.fixed_rate.is_none() && self.variable_rate.is_none() {
            return Err(MortgageError::configuration(
                "at least one of fixed rate or variable rate is required",
            ));
        }

        for rate in [self.fixed_rate, self.variable_rate].into_iter().flatten() {
            if rate.is_negative() {
                return Err(MortgageError::configuration(format!(
                    "interest rate must not be negative, got {}",
                    rate
                )));
            }
        }

        if let Some(fixed_years) = self.fixed_tenure_years {
            if fixed_years > self.tenure_years {
                return Err(MortgageError::configuration(format!(
                    "fixed period of {} years exceeds tenure of {} years",
                    fixed_years, self.tenure_years
                )));
            }
        }

        // the whole term has to land on a representable calendar date
        self.maturity_date()?;

        Ok(())
    }

    /// last calendar day covered by the tenure
    pub fn maturity_date(&self) -> Result<NaiveDate> {
        add_years(self.start_date, self.tenure_years)
    }

    /// first day of the variable-rate period, if a split is configured
    pub fn variable_start_date(&self) -> Result<Option<NaiveDate>> {
        match (self.fixed_rate, self.variable_rate, self.fixed_tenure_years) {
            (Some(_), Some(_), Some(years)) => add_years(self.start_date, years).map(Some),
            _ => Ok(None),
        }
    }

    /// saturates for tenures `validate` would reject
    pub fn tenure_months(&self) -> u32 {
        self.tenure_years.saturating_mul(12)
    }

    /// months charged at the fixed rate before switching to variable
    pub fn fixed_months(&self) -> u32 {
        match (self.fixed_rate, self.variable_rate) {
            (Some(_), None) => self.tenure_months(),
            (None, Some(_)) => 0,
            (Some(_), Some(_)) => self
                .fixed_tenure_years
                .map(|years| years.saturating_mul(12))
                .unwrap_or_else(|| self.tenure_months()),
            (None, None) => 0,
        }
    }

    /// read a json settings file using the mortgage tool's field names
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let settings: LoanSettings = serde_json::from_str(contents)?;
        settings.into_configuration()
    }
}

fn add_years(date: NaiveDate, years: u32) -> Result<NaiveDate> {
    let out_of_range = || {
        MortgageError::date_arithmetic(format!("{} plus {} years is out of range", date, years))
    };
    let months = years.checked_mul(12).ok_or_else(out_of_range)?;
    date.checked_add_months(Months::new(months)).ok_or_else(out_of_range)
}

/// settings as written by a user: percentages and `DD/MM/YYYY` dates
#[derive(Debug, Clone, Deserialize)]
pub struct LoanSettings {
    pub loan_amount: Decimal,
    #[serde(default)]
    pub fixed_rate: Option<Decimal>,
    #[serde(default)]
    pub variable_rate: Option<Decimal>,
    #[serde(default)]
    pub fixed_tenure: Option<u32>,
    pub start_date: String,
    pub tenure: u32,
    #[serde(default)]
    pub day_count: DayCountConvention,
    /// path to the payment schedule csv, resolved by the caller
    #[serde(default)]
    pub payment_schedule: Option<String>,
}

impl LoanSettings {
    pub fn into_configuration(self) -> Result<LoanConfiguration> {
        let mut builder = LoanConfiguration::builder()
            .principal(Money::from_decimal(self.loan_amount))
            .start_date(parse_date(&self.start_date)?)
            .tenure_years(self.tenure)
            .day_count(self.day_count);

        if let Some(rate) = self.fixed_rate {
            builder = builder.fixed_rate(Rate::from_percent(rate));
        }
        if let Some(rate) = self.variable_rate {
            builder = builder.variable_rate(Rate::from_percent(rate));
        }
        if let Some(years) = self.fixed_tenure {
            builder = builder.fixed_tenure_years(years);
        }

        builder.build()
    }
}

/// builder for loan configurations
#[derive(Debug, Default)]
pub struct LoanConfigurationBuilder {
    principal: Option<Money>,
    fixed_rate: Option<Rate>,
    variable_rate: Option<Rate>,
    fixed_tenure_years: Option<u32>,
    start_date: Option<NaiveDate>,
    tenure_years: Option<u32>,
    day_count: DayCountConvention,
}

impl LoanConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, amount: Money) -> Self {
        self.principal = Some(amount);
        self
    }

    pub fn fixed_rate(mut self, rate: Rate) -> Self {
        self.fixed_rate = Some(rate);
        self
    }

    pub fn variable_rate(mut self, rate: Rate) -> Self {
        self.variable_rate = Some(rate);
        self
    }

    pub fn fixed_tenure_years(mut self, years: u32) -> Self {
        self.fixed_tenure_years = Some(years);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn tenure_years(mut self, years: u32) -> Self {
        self.tenure_years = Some(years);
        self
    }

    pub fn day_count(mut self, convention: DayCountConvention) -> Self {
        self.day_count = convention;
        self
    }

    /// build with the system clock supplying a missing start date
    pub fn build(self) -> Result<LoanConfiguration> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.build_with_time(&time)
    }

    /// build with an explicit time provider supplying a missing start date
    pub fn build_with_time(self, time_provider: &SafeTimeProvider) -> Result<LoanConfiguration> {
        let principal = self
            .principal
            .ok_or_else(|| MortgageError::configuration("loan amount required"))?;

        let tenure_years = self
            .tenure_years
            .ok_or_else(|| MortgageError::configuration("tenure required"))?;

        let start_date = self
            .start_date
            .unwrap_or_else(|| time_provider.now().date_naive());

        let config = LoanConfiguration {
            principal,
            fixed_rate: self.fixed_rate,
            variable_rate: self.variable_rate,
            fixed_tenure_years: self.fixed_tenure_years,
            start_date,
            tenure_years,
            day_count: self.day_count,
        };

        config.validate()?;
        Ok(config)
    }
}
