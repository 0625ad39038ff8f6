use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmortizationError {
    #[error("invalid loan terms: {message}")]
    InvalidTerms {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    Configuration {
        message: String,
    },

    #[error("sub-loans start on different dates: commercial {commercial}, housing fund {housing_fund}")]
    MismatchedStart {
        commercial: NaiveDate,
        housing_fund: NaiveDate,
    },

    #[error("inconsistent schedule: {message}")]
    Inconsistent {
        message: String,
    },

    #[error("serialization error: {message}")]
    Serialization {
        message: String,
    },
}

impl AmortizationError {
    pub(crate) fn invalid_terms(message: impl Into<String>) -> Self {
        AmortizationError::InvalidTerms {
            message: message.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        AmortizationError::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn inconsistent(message: impl Into<String>) -> Self {
        AmortizationError::Inconsistent {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for AmortizationError {
    fn from(e: serde_json::Error) -> Self {
        AmortizationError::Serialization {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AmortizationError>;
