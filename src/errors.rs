use thiserror::Error;

#[derive(Error, Debug)]
pub enum MortgageError {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid payment schedule: {message}")]
    InvalidPaymentSchedule {
        message: String,
    },

    #[error("date arithmetic error: {message}")]
    DateArithmetic {
        message: String,
    },

    #[error("invalid record on line {line}: {message}")]
    InvalidRecord {
        line: u64,
        message: String,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MortgageError {
    pub fn configuration(message: impl Into<String>) -> Self {
        MortgageError::InvalidConfiguration { message: message.into() }
    }

    pub fn schedule(message: impl Into<String>) -> Self {
        MortgageError::InvalidPaymentSchedule { message: message.into() }
    }

    pub fn date_arithmetic(message: impl Into<String>) -> Self {
        MortgageError::DateArithmetic { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, MortgageError>;
