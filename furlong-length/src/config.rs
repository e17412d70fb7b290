//! Formatter configuration
//!
//! `FormatterConfig` is the whole persisted state of a `LengthFormatter`.

use serde::{Serialize, Deserialize};
use tracing::debug;
use crate::locale::Locale;
use crate::numeric::NumberOptions;
use crate::{FormatError, FormatStyle, UnitSystem};

/// Environment variables consulted for the locale, in priority order
pub const LOCALE_ENV_VARS: [&str; 4] = ["FURLONG_LOCALE", "LC_ALL", "LC_MEASUREMENT", "LANG"];

/// Locale, style, unit system and number options of a formatter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub locale: Locale,
    pub style: FormatStyle,
    /// `None` means the locale's preferred system
    pub unit_system: Option<UnitSystem>,
    pub number: NumberOptions,
}

impl FormatterConfig {
    pub fn new(locale: Locale) -> Self {
        FormatterConfig { locale, ..Default::default() }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_style(mut self, style: impl Into<FormatStyle>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_unit_system(mut self, unit_system: UnitSystem) -> Self {
        self.unit_system = Some(unit_system);
        self
    }

    pub fn with_number_options(mut self, number: NumberOptions) -> Self {
        self.number = number;
        self
    }

    /// Configuration with the locale taken from the process environment
    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable lookup.
    ///
    /// The first variable holding a usable locale wins; empty or malformed
    /// values are skipped. Falls back to the default locale.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        for var in LOCALE_ENV_VARS {
            let Some(raw) = lookup(var) else { continue };
            if raw.trim().is_empty() {
                continue;
            }
            match Locale::parse(&raw) {
                Ok(locale) => {
                    debug!(var, locale = %locale, "locale from environment");
                    return Self::new(locale);
                }
                Err(e) => debug!(var, value = %raw, error = %e, "ignoring locale variable"),
            }
        }
        Self::default()
    }

    pub fn to_json(&self) -> Result<String, FormatError> {
        serde_json::to_string(self).map_err(|e| FormatError::InvalidConfig(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        serde_json::from_str(json).map_err(|e| FormatError::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::UnitStyle;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_priority() {
        let config = FormatterConfig::from_env_with(env(&[
            ("LANG", "fr_FR.UTF-8"),
            ("LC_ALL", "de_AT"),
        ]));
        assert_eq!(config.locale.tag(), "de_AT");

        let config = FormatterConfig::from_env_with(env(&[
            ("FURLONG_LOCALE", "en-US"),
            ("LC_ALL", "de_AT"),
        ]));
        assert_eq!(config.locale.tag(), "en_US");
    }

    #[test]
    fn test_env_skips_bad_values() {
        let config = FormatterConfig::from_env_with(env(&[
            ("LC_ALL", ""),
            ("LC_MEASUREMENT", "not a locale"),
            ("LANG", "es_ES.UTF-8"),
        ]));
        assert_eq!(config.locale.tag(), "es_ES");
    }

    #[test]
    fn test_env_empty_gives_default() {
        let config = FormatterConfig::from_env_with(env(&[]));
        assert_eq!(config, FormatterConfig::default());

        let config = FormatterConfig::from_env_with(env(&[("LANG", "C.UTF-8")]));
        assert!(config.locale.is_default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = FormatterConfig::new(Locale::parse("de").unwrap())
            .with_style(UnitStyle::Long)
            .with_unit_system(UnitSystem::PersonHeight)
            .with_number_options(NumberOptions::default().with_max_fraction_digits(3));

        let json = config.to_json().unwrap();
        assert!(json.contains("\"locale\":\"de\""));
        assert!(json.contains("\"person_height\""));
        assert_eq!(FormatterConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_json_partial_and_invalid() {
        let config = FormatterConfig::from_json(r#"{"locale":"fr"}"#).unwrap();
        assert_eq!(config.locale.tag(), "fr");
        assert_eq!(config.number, NumberOptions::default());

        let err = FormatterConfig::from_json(r#"{"locale":"???"}"#).unwrap_err();
        assert!(matches!(err, FormatError::InvalidConfig(_)));
    }
}
