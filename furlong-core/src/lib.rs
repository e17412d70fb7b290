//! Furlong Core - Fundamental types
//!
//! This crate provides the core types used throughout Furlong:
//! - `Number`: Arbitrary precision decimal numbers
//! - `Value`: Runtime values (numbers, text, objects, errors)
//! - `FurlongError`: Structured errors with machine-readable codes
//! - `Formatter`: The trait every value formatter implements

mod number;
mod value;
mod error;
mod formatter;

pub use number::{Number, NumberError, RoundingMode, MAX_EXPONENT};
pub use value::Value;
pub use error::{FurlongError, ErrorContext, Severity, codes};
pub use formatter::Formatter;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Number, Value, FurlongError, Severity, Formatter, RoundingMode};
    pub use crate::error::codes;
}
