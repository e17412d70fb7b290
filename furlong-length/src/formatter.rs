//! The length formatter
//!
//! Turns meters into localized text ("1.5 km", "1,5 Kilometer",
//! "5 ft 11 in") and reads such text back.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use serde::{Serialize, Deserialize};
use tracing::{debug, warn};
use furlong_core::{Formatter, FurlongError, Number, Value};
use crate::config::FormatterConfig;
use crate::data::builtin_provider;
use crate::locale::{
    resolve, Locale, LocaleProvider, Localized, NumberSymbols, PluralCategory, PluralRule,
    DEFAULT_LANGUAGE,
};
use crate::numeric::{render, NumberOptions};
use crate::parse::{parse_length, to_finite_f64};
use crate::{FormatError, FormatStyle, LengthUnit, MeasurementSystem, UnitStyle, UnitSystem};

/// Inches per foot, for person height
const INCHES_PER_FOOT: i64 = 12;

/// Result of a format call: the text plus the unit and rounded magnitude
/// it shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedResult {
    pub text: String,
    pub unit: LengthUnit,
    /// Displayed magnitude in `unit`, after rounding
    pub value: f64,
}

impl fmt::Display for FormattedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Localized length formatter.
///
/// Immutable after construction. Clones share the locale provider, and
/// serialization stores only the configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct LengthFormatter {
    #[serde(flatten)]
    config: FormatterConfig,
    #[serde(skip, default = "builtin_provider")]
    provider: Arc<dyn LocaleProvider>,
}

impl LengthFormatter {
    /// Formatter over the built-in locale table
    pub fn new(config: FormatterConfig) -> Self {
        Self::with_provider(config, builtin_provider())
    }

    pub fn with_provider(config: FormatterConfig, provider: Arc<dyn LocaleProvider>) -> Self {
        LengthFormatter { config, provider }
    }

    /// Formatter with default options for a locale tag
    pub fn for_locale(tag: &str) -> Result<Self, FormatError> {
        Ok(Self::new(FormatterConfig::new(Locale::parse(tag)?)))
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    pub fn locale(&self) -> &Locale {
        &self.config.locale
    }

    // ========== Formatting ==========

    /// Format a length given in meters with an explicit unit system and style
    pub fn format(&self, meters: f64, unit_system: UnitSystem, style: FormatStyle) -> Result<String, FormatError> {
        self.format_with(meters, unit_system, style).map(|result| result.text)
    }

    /// Format with the configured unit system (or the locale's) and style
    pub fn format_meters(&self, meters: f64) -> Result<FormattedResult, FormatError> {
        let system = self.config.unit_system
            .unwrap_or_else(|| self.preferred_system().into());
        self.format_with(meters, system, self.config.style)
    }

    /// Structured form of [`format`](Self::format)
    pub fn format_with(&self, meters: f64, unit_system: UnitSystem, style: FormatStyle) -> Result<FormattedResult, FormatError> {
        let meters = validate(meters)?;
        match unit_system {
            UnitSystem::Metric => self.format_auto(&meters, MeasurementSystem::Metric, style.unit_style),
            UnitSystem::Imperial => self.format_auto(&meters, MeasurementSystem::Imperial, style.unit_style),
            UnitSystem::PersonHeight => self.format_person_height(&meters, style.unit_style),
        }
    }

    /// Format a value already expressed in `unit`; no unit selection
    pub fn format_in_unit(&self, value: f64, unit: LengthUnit, style: FormatStyle) -> Result<String, FormatError> {
        let value = validate(value)?;
        self.format_quantity(&value, unit, style.unit_style).map(|result| result.text)
    }

    fn format_auto(&self, meters: &Number, system: MeasurementSystem, style: UnitStyle) -> Result<FormattedResult, FormatError> {
        let unit = select_unit(meters, system, &self.config.number)?;
        let value = unit.from_meters(meters)?;
        self.format_quantity(&value, unit, style)
    }

    /// Render "<number> <unit>" for a value in `unit`
    fn format_quantity(&self, value: &Number, unit: LengthUnit, style: UnitStyle) -> Result<FormattedResult, FormatError> {
        let options = &self.config.number;
        let (number, rounded) = self.render_number(value, options);
        let label = self.unit_label(unit, style, self.plural_category(&rounded, options))?;

        Ok(FormattedResult {
            text: format!("{} {}", number, label.value),
            unit,
            value: to_display_f64(&rounded)?,
        })
    }

    /// Whole centimeters in metric locales, feet and inches in imperial ones
    fn format_person_height(&self, meters: &Number, style: UnitStyle) -> Result<FormattedResult, FormatError> {
        if self.preferred_system() == MeasurementSystem::Metric {
            let cm = LengthUnit::Centimeter.from_meters(meters)?;
            return self.format_quantity(&cm, LengthUnit::Centimeter, style);
        }

        let options = &self.config.number;
        // Round once in inches so 71.999 becomes 6 ft rather than 5 ft 12 in
        let total_inches = options.round(&LengthUnit::Inch.from_meters(meters)?);
        let per_foot = Number::from_i64(INCHES_PER_FOOT);
        let feet = total_inches.checked_div(&per_foot)?.floor();
        let inches = total_inches.sub(&feet.mul(&per_foot));

        let mut parts = Vec::new();
        if !feet.is_zero() {
            let whole = NumberOptions { min_fraction_digits: 0, ..*options };
            let (number, _) = self.render_number(&feet, &whole);
            let label = self.unit_label(LengthUnit::Foot, style, self.plural_category(&feet, &whole))?;
            parts.push(format!("{} {}", number, label.value));
        }
        if !inches.is_zero() || feet.is_zero() {
            let (number, rounded) = self.render_number(&inches, options);
            let label = self.unit_label(LengthUnit::Inch, style, self.plural_category(&rounded, options))?;
            parts.push(format!("{} {}", number, label.value));
        }

        let (unit, value) = if feet.is_zero() {
            (LengthUnit::Inch, total_inches)
        } else {
            (LengthUnit::Foot, total_inches.checked_div(&per_foot)?)
        };
        debug!(meters = %meters, feet = %feet, inches = %inches, "person height");

        Ok(FormattedResult {
            text: parts.join(" "),
            unit,
            value: to_display_f64(&value)?,
        })
    }

    /// Rounded number text plus the rounded value it shows
    fn render_number(&self, value: &Number, options: &NumberOptions) -> (String, Number) {
        let rounded = options.round(value);
        (render(&rounded, options, &self.number_symbols()), rounded)
    }

    // ========== Parsing ==========

    /// Parse "<number> <unit>" text in this formatter's locale.
    ///
    /// Returns the value in the (first) unit named by the text.
    pub fn parse(&self, text: &str) -> Result<(f64, LengthUnit), FormatError> {
        let (value, unit) = parse_length(text, self.provider.as_ref(), &self.config.locale)?;
        Ok((to_finite_f64(text, &value)?, unit))
    }

    // ========== Unit names ==========

    /// Localized label for a unit; the long style uses the plural form.
    ///
    /// Falls back to the default locale (marked degraded) when the locale
    /// chain lacks the entry.
    pub fn unit_string(&self, unit: LengthUnit, style: FormatStyle) -> Result<Localized<String>, FormatError> {
        self.unit_label(unit, style.unit_style, PluralCategory::Other)
    }

    /// Label agreeing with a displayed value: "1 foot", "2 feet"
    pub fn unit_string_for_value(&self, value: f64, unit: LengthUnit, style: FormatStyle) -> Result<Localized<String>, FormatError> {
        let value = validate(value)?;
        let options = &self.config.number;
        let rounded = options.round(&value);
        self.unit_label(unit, style.unit_style, self.plural_category(&rounded, options))
    }

    fn unit_label(&self, unit: LengthUnit, style: UnitStyle, plural: PluralCategory) -> Result<Localized<String>, FormatError> {
        let locale = &self.config.locale;
        let label = resolve(locale, |l| {
            self.provider.unit_name(l, unit, style, plural).map(str::to_string)
        })
        .ok_or_else(|| FormatError::UnsupportedUnit { unit, locale: locale.tag() })?;

        if label.is_degraded() {
            warn!(
                unit = unit.name(),
                locale = %locale,
                fallback = DEFAULT_LANGUAGE,
                "no unit name for locale, using default locale"
            );
        }
        Ok(label)
    }

    // ========== Locale conventions ==========

    /// Measurement system customary in the formatter's locale
    pub fn preferred_system(&self) -> MeasurementSystem {
        resolve(&self.config.locale, |l| self.provider.measurement_system(l))
            .map(Localized::into_value)
            .unwrap_or(MeasurementSystem::Metric)
    }

    /// Decimal and grouping separators of the formatter's locale
    pub fn number_symbols(&self) -> NumberSymbols {
        match resolve(&self.config.locale, |l| self.provider.number_symbols(l)) {
            Some(symbols) => {
                if symbols.is_degraded() {
                    debug!(locale = %self.config.locale, "no number symbols for locale, using default locale");
                }
                symbols.into_value()
            }
            None => NumberSymbols::default(),
        }
    }

    fn plural_category(&self, rounded: &Number, options: &NumberOptions) -> PluralCategory {
        let rule = resolve(&self.config.locale, |l| self.provider.plural_rule(l))
            .map(Localized::into_value)
            .unwrap_or(PluralRule::ExactlyOne);
        rule.category(rounded, options.visible_fraction_digits(rounded))
    }
}

impl Default for LengthFormatter {
    fn default() -> Self {
        Self::new(FormatterConfig::default())
    }
}

impl fmt::Debug for LengthFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LengthFormatter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PartialEq for LengthFormatter {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
    }
}

impl Formatter for LengthFormatter {
    fn name(&self) -> &'static str {
        "length"
    }

    fn format_value(&self, value: &Value) -> Value {
        let meters = match value {
            Value::Number(n) => n.clone(),
            Value::Object(_) => match quantity_to_meters(value) {
                Ok(m) => m,
                Err(e) => return Value::Error(e),
            },
            Value::Error(e) => return Value::Error(e.clone()),
            other => return Value::Error(FurlongError::type_error("Number", other.type_name())),
        };
        let Some(meters) = meters.to_f64() else {
            return Value::Error(FurlongError::overflow());
        };
        match self.format_meters(meters) {
            Ok(result) => Value::Text(result.text),
            Err(e) => Value::Error(FurlongError::from(e).with_locale(self.config.locale.tag())),
        }
    }

    fn parse_text(&self, text: &str) -> Value {
        match parse_length(text, self.provider.as_ref(), &self.config.locale) {
            Ok((value, unit)) => {
                let mut result = HashMap::new();
                result.insert("value".to_string(), Value::Number(value));
                result.insert("unit".to_string(), Value::Text(unit.name().to_string()));
                Value::Object(result)
            }
            Err(e) => Value::Error(FurlongError::from(e).with_locale(self.config.locale.tag())),
        }
    }
}

/// Meters in a parsed `{ value, unit }` object
fn quantity_to_meters(quantity: &Value) -> Result<Number, FurlongError> {
    let value = quantity.get("value");
    let value = value
        .as_number()
        .ok_or_else(|| FurlongError::type_error("Number", value.type_name()))?;
    let unit = quantity.get("unit");
    let unit: LengthUnit = unit
        .as_text()
        .ok_or_else(|| FurlongError::type_error("Text", unit.type_name()))?
        .parse()?;
    Ok(unit.to_meters(value))
}

/// Lengths must be finite and non-negative
fn validate(value: f64) -> Result<Number, FormatError> {
    if !value.is_finite() || value < 0.0 {
        return Err(FormatError::InvalidValue(value.to_string()));
    }
    Ok(Number::from_f64(value)?)
}

/// Largest unit of the system whose displayed (rounded) value is at least
/// 1, else the smallest
fn select_unit(meters: &Number, system: MeasurementSystem, options: &NumberOptions) -> Result<LengthUnit, FormatError> {
    let candidates = system.auto_units();
    let one = Number::from_i64(1);
    for &unit in candidates {
        if options.round(&unit.from_meters(meters)?) >= one {
            debug!(meters = %meters, unit = %unit, "selected unit");
            return Ok(unit);
        }
    }
    let smallest = candidates
        .last()
        .copied()
        .ok_or_else(|| FormatError::InvalidConfig("measurement system without units".to_string()))?;
    debug!(meters = %meters, unit = %smallest, "below every unit, using smallest");
    Ok(smallest)
}

fn to_display_f64(value: &Number) -> Result<f64, FormatError> {
    value.to_f64().ok_or_else(|| FormatError::InvalidValue(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use furlong_core::{codes, RoundingMode};

    fn formatter(tag: &str) -> LengthFormatter {
        LengthFormatter::for_locale(tag).unwrap()
    }

    #[test]
    fn test_metric_selection() {
        let f = formatter("en");
        assert_eq!(f.format(1500.0, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), "1.5 km");
        assert_eq!(f.format(0.5, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), "50 cm");
        assert_eq!(f.format(1.0, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), "1 m");
        assert_eq!(f.format(0.004, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), "4 mm");
        assert_eq!(f.format(0.0, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), "0 mm");
    }

    #[test]
    fn test_selection_uses_displayed_value() {
        let f = formatter("en");
        // 0.999999 km shows as 1
        assert_eq!(f.format(999.999, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), "1 km");

        let truncating = LengthFormatter::new(FormatterConfig::default()
            .with_number_options(NumberOptions::default().with_rounding(RoundingMode::Down)));
        assert_eq!(truncating.format(999.999, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), "999.99 m");
    }

    #[test]
    fn test_imperial_selection() {
        let f = formatter("en");
        assert_eq!(f.format(1609.344, UnitSystem::Imperial, FormatStyle::SHORT).unwrap(), "1 mi");
        assert_eq!(f.format(0.9144, UnitSystem::Imperial, FormatStyle::SHORT).unwrap(), "3 ft");
        assert_eq!(f.format(0.0254, UnitSystem::Imperial, FormatStyle::SHORT).unwrap(), "1 in");
    }

    #[test]
    fn test_long_style_plurals() {
        let f = formatter("en");
        assert_eq!(f.format(1000.0, UnitSystem::Metric, FormatStyle::LONG).unwrap(), "1 kilometer");
        assert_eq!(f.format(1500.0, UnitSystem::Metric, FormatStyle::LONG).unwrap(), "1.5 kilometers");
        assert_eq!(f.format(0.6096, UnitSystem::Imperial, FormatStyle::LONG).unwrap(), "2 feet");
    }

    #[test]
    fn test_invalid_values() {
        let f = formatter("en");
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = f.format(bad, UnitSystem::Metric, FormatStyle::SHORT).unwrap_err();
            assert!(matches!(err, FormatError::InvalidValue(_)), "{}", bad);
        }
    }

    #[test]
    fn test_grouping_in_large_values() {
        let f = formatter("en");
        assert_eq!(f.format(1_234_567.0, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), "1,234.57 km");
    }

    #[test]
    fn test_german_rendering() {
        let f = formatter("de");
        assert_eq!(f.format(1500.0, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), "1,5 km");
        assert_eq!(f.format(1500.0, UnitSystem::Metric, FormatStyle::LONG).unwrap(), "1,5 Kilometer");
        assert_eq!(f.format(2_500_000.0, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), "2.500 km");
    }

    #[test]
    fn test_french_rendering() {
        let f = formatter("fr_CA");
        assert_eq!(f.format(1500.0, UnitSystem::Metric, FormatStyle::LONG).unwrap(), "1,5 kilomètre");
        assert_eq!(f.format(2500.0, UnitSystem::Metric, FormatStyle::LONG).unwrap(), "2,5 kilomètres");
        assert_eq!(f.format(0.3048, UnitSystem::Imperial, FormatStyle::SHORT).unwrap(), "1 pi");
    }

    #[test]
    fn test_format_meters_uses_locale_system() {
        let us = formatter("en_US");
        let result = us.format_meters(0.9144).unwrap();
        assert_eq!(result.text, "3 ft");
        assert_eq!(result.unit, LengthUnit::Foot);
        assert_eq!(result.value, 3.0);

        let gb = formatter("en_GB");
        let result = gb.format_meters(1500.0).unwrap();
        assert_eq!(result.text, "1.5 km");
        assert_eq!(result.unit, LengthUnit::Kilometer);
    }

    #[test]
    fn test_format_meters_uses_configured_system_and_style() {
        let config = FormatterConfig::new(Locale::parse("en_GB").unwrap())
            .with_unit_system(UnitSystem::Imperial)
            .with_style(UnitStyle::Long);
        let f = LengthFormatter::new(config);
        assert_eq!(f.format_meters(1609.344).unwrap().text, "1 mile");
    }

    #[test]
    fn test_format_in_unit() {
        let f = formatter("en_GB");
        assert_eq!(f.format_in_unit(3.0, LengthUnit::Yard, FormatStyle::SHORT).unwrap(), "3 yd");
        assert_eq!(f.format_in_unit(0.5, LengthUnit::Meter, FormatStyle::LONG).unwrap(), "0.5 metres");
        assert!(f.format_in_unit(-2.0, LengthUnit::Meter, FormatStyle::SHORT).is_err());
    }

    #[test]
    fn test_number_options() {
        let options = NumberOptions::default()
            .with_max_fraction_digits(3)
            .with_min_fraction_digits(1)
            .with_rounding(RoundingMode::Down);
        let f = LengthFormatter::new(FormatterConfig::default().with_number_options(options));
        assert_eq!(f.format(1234.5678, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), "1.234 km");
        assert_eq!(f.format(2000.0, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), "2.0 km");
        // "1.0" is not singular
        assert_eq!(f.format(1000.0, UnitSystem::Metric, FormatStyle::LONG).unwrap(), "1.0 kilometers");
    }

    #[test]
    fn test_person_height_imperial() {
        let f = formatter("en_US");
        assert_eq!(f.format(1.8034, UnitSystem::PersonHeight, FormatStyle::SHORT).unwrap(), "5 ft 11 in");
        assert_eq!(f.format(1.8288, UnitSystem::PersonHeight, FormatStyle::SHORT).unwrap(), "6 ft");
        assert_eq!(f.format(0.254, UnitSystem::PersonHeight, FormatStyle::SHORT).unwrap(), "10 in");
        assert_eq!(
            f.format(1.8034, UnitSystem::PersonHeight, FormatStyle::LONG).unwrap(),
            "5 feet 11 inches"
        );
        assert_eq!(
            f.format(0.3302, UnitSystem::PersonHeight, FormatStyle::LONG).unwrap(),
            "1 foot 1 inch"
        );
    }

    #[test]
    fn test_person_height_rounds_before_splitting() {
        let f = formatter("en_US");
        // 71.999 in
        let result = f.format_with(1.8287746, UnitSystem::PersonHeight, FormatStyle::SHORT).unwrap();
        assert_eq!(result.text, "6 ft");
        assert_eq!(result.unit, LengthUnit::Foot);
        assert_eq!(result.value, 6.0);
    }

    #[test]
    fn test_person_height_metric() {
        let f = formatter("de");
        assert_eq!(f.format(1.8, UnitSystem::PersonHeight, FormatStyle::SHORT).unwrap(), "180 cm");
    }

    #[test]
    fn test_parse() {
        let f = formatter("en");
        assert_eq!(f.parse("3 ft").unwrap(), (3.0, LengthUnit::Foot));
        assert_eq!(f.parse("1.5 km").unwrap(), (1.5, LengthUnit::Kilometer));
        assert!(matches!(f.parse("abc"), Err(FormatError::Parse { .. })));
        assert!(matches!(f.parse("1e400 m"), Err(FormatError::Parse { .. })));
    }

    #[test]
    fn test_parse_german() {
        let f = formatter("de");
        assert_eq!(f.parse("1.234,5 m").unwrap(), (1234.5, LengthUnit::Meter));
    }

    #[test]
    fn test_format_then_parse() {
        let f = formatter("en");
        let text = f.format(1500.0, UnitSystem::Metric, FormatStyle::SHORT).unwrap();
        let (value, unit) = f.parse(&text).unwrap();
        assert_eq!(unit.to_meters(&Number::from_f64(value).unwrap()).to_f64(), Some(1500.0));
    }

    #[test]
    fn test_unit_string() {
        let f = formatter("en");
        let label = f.unit_string(LengthUnit::Foot, FormatStyle::LONG).unwrap();
        assert_eq!(label.as_str(), "feet");
        assert!(!label.is_degraded());

        let label = f.unit_string(LengthUnit::Foot, FormatStyle::SHORT).unwrap();
        assert_eq!(label.as_str(), "ft");
    }

    #[test]
    fn test_unit_string_inherited_is_not_degraded() {
        let f = formatter("de_AT");
        let label = f.unit_string(LengthUnit::Mile, FormatStyle::LONG).unwrap();
        assert_eq!(label.as_str(), "Meilen");
        assert!(!label.is_degraded());
    }

    #[test]
    fn test_unit_string_degraded_for_missing_locale() {
        let f = formatter("ja");
        let label = f.unit_string(LengthUnit::Kilometer, FormatStyle::LONG).unwrap();
        assert_eq!(label.as_str(), "kilometers");
        assert!(label.is_degraded());
    }

    #[test]
    fn test_unit_string_for_value() {
        let f = formatter("en");
        assert_eq!(f.unit_string_for_value(1.0, LengthUnit::Foot, FormatStyle::LONG).unwrap().as_str(), "foot");
        assert_eq!(f.unit_string_for_value(2.0, LengthUnit::Foot, FormatStyle::LONG).unwrap().as_str(), "feet");
        // 1.001 shows as "1"
        assert_eq!(f.unit_string_for_value(1.001, LengthUnit::Inch, FormatStyle::LONG).unwrap().as_str(), "inch");
    }

    struct EmptyProvider;

    impl LocaleProvider for EmptyProvider {
        fn unit_name(&self, _: &Locale, _: LengthUnit, _: UnitStyle, _: PluralCategory) -> Option<&str> {
            None
        }
        fn aliases(&self, _: &Locale, _: LengthUnit) -> Vec<&str> {
            Vec::new()
        }
        fn number_symbols(&self, _: &Locale) -> Option<NumberSymbols> {
            None
        }
        fn measurement_system(&self, _: &Locale) -> Option<MeasurementSystem> {
            None
        }
        fn plural_rule(&self, _: &Locale) -> Option<PluralRule> {
            None
        }
    }

    #[test]
    fn test_unsupported_unit_without_any_data() {
        let f = LengthFormatter::with_provider(FormatterConfig::default(), Arc::new(EmptyProvider));
        let err = f.unit_string(LengthUnit::Meter, FormatStyle::SHORT).unwrap_err();
        assert_eq!(err, FormatError::UnsupportedUnit { unit: LengthUnit::Meter, locale: "en".to_string() });

        // parsing still understands the canonical symbols
        assert_eq!(f.parse("2 m").unwrap(), (2.0, LengthUnit::Meter));
    }

    #[test]
    fn test_formatter_trait() {
        let f = formatter("en");
        let text = f.format_value(&Value::Number(Number::from_i64(1500)));
        assert_eq!(text.as_text(), Some("1.5 km"));

        let parsed = f.parse_text("3 ft");
        assert_eq!(parsed.get("unit").as_text(), Some("foot"));
        assert_eq!(parsed.get("value").as_number(), Some(&Number::from_i64(3)));

        let err = f.parse_text("1e400 m");
        assert_eq!(err.as_error().map(|e| e.code.as_str()), Some(codes::PARSE_ERROR));

        let err = f.format_value(&Value::Number(Number::from_i64(-1)));
        assert_eq!(err.as_error().map(|e| e.code.as_str()), Some(codes::INVALID_VALUE));

        let err = f.format_value(&Value::Text("1 m".to_string()));
        assert_eq!(err.as_error().map(|e| e.code.as_str()), Some(codes::TYPE_ERROR));

        let dyn_formatter: &dyn Formatter = &f;
        assert_eq!(dyn_formatter.normalize("1500 m").as_text(), Some("1.5 km"));
    }

    #[test]
    fn test_clone_and_equality() {
        let f = formatter("de");
        let copy = f.clone();
        assert_eq!(f, copy);
        assert_ne!(f, formatter("fr"));
    }

    #[test]
    fn test_serde_round_trip() {
        let config = FormatterConfig::new(Locale::parse("en_US").unwrap())
            .with_style(UnitStyle::Long)
            .with_unit_system(UnitSystem::PersonHeight);
        let f = LengthFormatter::new(config);

        let json = serde_json::to_string(&f).unwrap();
        let back: LengthFormatter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
        assert_eq!(back.format_meters(1.8034).unwrap().text, "5 feet 11 inches");
    }

    #[test]
    fn test_concurrent_formatting() {
        let f = formatter("en");
        let values: Vec<f64> = (0..64).map(|i| i as f64 * 37.5).collect();
        let expected: Vec<String> = values
            .iter()
            .map(|v| f.format(*v, UnitSystem::Metric, FormatStyle::SHORT).unwrap())
            .collect();

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for (v, want) in values.iter().zip(&expected) {
                        assert_eq!(&f.format(*v, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), want);
                    }
                });
            }
        });
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_degraded_lookup_is_logged() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let f = formatter("ja");
            assert_eq!(f.format(1500.0, UnitSystem::Metric, FormatStyle::SHORT).unwrap(), "1.5 km");
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "{}", output);
        assert!(output.contains("no unit name for locale, using default locale"), "{}", output);
        assert!(output.contains("locale=ja"), "{}", output);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn format_then_parse_is_within_half_a_step(meters in 0.0f64..1.0e9) {
                let f = formatter("en");
                let result = f.format_with(meters, UnitSystem::Metric, FormatStyle::SHORT).unwrap();
                let (value, unit) = f.parse(&result.text).unwrap();
                prop_assert_eq!(unit, result.unit);

                let back = unit.to_meters(&Number::from_f64(value).unwrap()).to_f64().unwrap();
                let step = unit.meters_per_unit().to_f64().unwrap() * f.config().number.tolerance();
                prop_assert!((back - meters).abs() <= step * (1.0 + 1e-9) + 1e-12,
                    "{} -> {} -> {}", meters, result.text, back);
            }

            #[test]
            fn german_round_trip_keeps_unit(meters in 0.0f64..1.0e7) {
                let f = formatter("de");
                let result = f.format_with(meters, UnitSystem::Metric, FormatStyle::LONG).unwrap();
                let (_, unit) = f.parse(&result.text).unwrap();
                prop_assert_eq!(unit, result.unit);
            }
        }
    }
}
