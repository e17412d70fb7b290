//! Errors raised by length formatting and parsing

use furlong_core::{FurlongError, NumberError};
use thiserror::Error;
use crate::LengthUnit;

/// Errors that can occur while formatting or parsing a length
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Negative, NaN or infinite input to a format call
    #[error("invalid length value: {0}")]
    InvalidValue(String),

    /// Input text could not be read as a length
    #[error("cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: String },

    /// Neither the requested locale nor the default locale has data
    #[error("no locale data for unit '{unit}' in locale '{locale}'")]
    UnsupportedUnit { unit: LengthUnit, locale: String },

    #[error("invalid locale identifier: {0}")]
    InvalidLocale(String),

    #[error("invalid formatter configuration: {0}")]
    InvalidConfig(String),
}

impl FormatError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        FormatError::Parse { input: input.to_string(), reason: reason.into() }
    }
}

impl From<NumberError> for FormatError {
    fn from(err: NumberError) -> Self {
        FormatError::InvalidValue(err.to_string())
    }
}

impl From<FormatError> for FurlongError {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::InvalidValue(v) => FurlongError::invalid_value(v),
            FormatError::Parse { input, reason } => {
                FurlongError::parse_error(reason).with_input(input)
            }
            FormatError::UnsupportedUnit { unit, locale } => {
                FurlongError::unsupported_unit(unit.name(), &locale)
            }
            FormatError::InvalidLocale(tag) => {
                FurlongError::domain_error(format!("invalid locale identifier: {}", tag))
                    .with_suggestion("Use a tag such as \"en\", \"en_US\" or \"de-AT\"")
            }
            FormatError::InvalidConfig(details) => FurlongError::domain_error(details),
        }
    }
}
