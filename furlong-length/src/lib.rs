//! Furlong Length - Localized length formatting
//!
//! Formats lengths given in meters as localized text with an automatically
//! chosen unit, and parses such text back:
//!
//! ```
//! use furlong_length::{FormatStyle, LengthFormatter, LengthUnit, UnitSystem};
//!
//! let f = LengthFormatter::for_locale("en").unwrap();
//! assert_eq!(f.format(1500.0, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), "1.5 km");
//! assert_eq!(f.parse("3 ft").unwrap(), (3.0, LengthUnit::Foot));
//! ```
//!
//! Locale data comes from a [`LocaleProvider`]; the built-in table covers
//! en, en_US, en_GB, de, de_CH, fr, es and it. Lookups that only the default
//! locale can answer are returned marked as degraded.

mod unit;
mod error;
mod style;
mod locale;
mod data;
mod numeric;
mod parse;
mod config;
mod formatter;
mod helpers;
mod functions;

pub use unit::{LengthUnit, MeasurementSystem, UnitSystem};
pub use error::FormatError;
pub use style::{FormatStyle, UnitStyle};
pub use locale::{
    resolve, Locale, LocaleProvider, Localized, NumberSymbols, PluralCategory, PluralRule,
    Resolution, DEFAULT_LANGUAGE,
};
pub use data::{builtin_provider, BuiltinLocales};
pub use numeric::{NumberOptions, MAX_FRACTION_DIGITS};
pub use parse::parse_length;
pub use config::{FormatterConfig, LOCALE_ENV_VARS};
pub use formatter::{FormattedResult, LengthFormatter};

use furlong_plugin::PluginRegistry;

/// Load length functions into registry
pub fn load_length_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Formatting (2 functions)
        .with_function(functions::FormatLength)
        .with_function(functions::FormatLengthIn)

        // Parsing (1 function)
        .with_function(functions::ParseLength)

        // Inspection (2 functions)
        .with_function(functions::LengthUnitString)
        .with_function(functions::ConvertLength)
}
