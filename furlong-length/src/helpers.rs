//! Argument handling shared by the length functions

use furlong_core::{FurlongError, Number, Value};
use furlong_plugin::EvalContext;
use crate::config::FormatterConfig;
use crate::locale::Locale;
use crate::numeric::NumberOptions;
use crate::parse::UnitLexicon;
use crate::data::BuiltinLocales;
use crate::{FormatStyle, LengthFormatter, LengthUnit, UnitStyle, UnitSystem};

/// Extract a Number from a Value, returning error context
pub fn extract_number(value: &Value, func: &str, arg: &str) -> Result<Number, FurlongError> {
    match value {
        Value::Number(n) => Ok(n.clone()),
        Value::Null => Err(FurlongError::arg_type(func, arg, "Number", "Null")),
        Value::Error(e) => Err(e.clone()),
        other => Err(FurlongError::arg_type(func, arg, "Number", other.type_name())),
    }
}

/// Extract a Text string from a Value
pub fn extract_text(value: &Value, func: &str, arg: &str) -> Result<String, FurlongError> {
    match value {
        Value::Text(s) => Ok(s.clone()),
        Value::Null => Err(FurlongError::arg_type(func, arg, "Text", "Null")),
        Value::Error(e) => Err(e.clone()),
        other => Err(FurlongError::arg_type(func, arg, "Text", other.type_name())),
    }
}

/// Extract optional Text (missing or Null gives None)
pub fn extract_optional_text(args: &[Value], index: usize, func: &str, arg: &str) -> Result<Option<String>, FurlongError> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => extract_text(value, func, arg).map(Some),
    }
}

/// Number argument as f64 for the formatter
pub fn number_to_f64(value: &Number, func: &str) -> Result<f64, FurlongError> {
    value.to_f64().ok_or_else(|| FurlongError::overflow().in_function(func))
}

/// Formatter for the locale and precision of the evaluation context
pub fn formatter_for(ctx: &EvalContext, func: &str) -> Result<LengthFormatter, FurlongError> {
    let locale = Locale::parse(&ctx.locale)
        .map_err(|e| FurlongError::from(e).in_function(func))?;
    let number = NumberOptions::default().with_max_fraction_digits(ctx.precision);
    Ok(LengthFormatter::new(FormatterConfig::new(locale).with_number_options(number)))
}

/// Unit named by an argument: canonical spellings, then the locale's own
pub fn parse_unit(text: &str, locale: &Locale, func: &str) -> Result<LengthUnit, FurlongError> {
    if let Ok(unit) = text.parse::<LengthUnit>() {
        return Ok(unit);
    }
    UnitLexicon::for_locale(&BuiltinLocales, locale)
        .lookup(text.trim())
        .ok_or_else(|| {
            FurlongError::parse_error(format!("unknown length unit '{}'", text))
                .in_function(func)
                .with_input(text)
                .with_suggestion("Use a unit such as \"m\", \"km\", \"ft\" or \"mi\"")
        })
}

pub fn parse_style(text: Option<String>, func: &str) -> Result<FormatStyle, FurlongError> {
    match text {
        None => Ok(FormatStyle::default()),
        Some(s) => s.parse::<UnitStyle>()
            .map(FormatStyle::from)
            .map_err(|e| FurlongError::from(e).in_function(func)),
    }
}

pub fn parse_system(text: Option<String>, func: &str) -> Result<Option<UnitSystem>, FurlongError> {
    text.map(|s| s.parse::<UnitSystem>())
        .transpose()
        .map_err(|e| FurlongError::from(e).in_function(func))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use furlong_core::codes;
    use furlong_plugin::PluginRegistry;

    fn ctx(locale: &str) -> EvalContext {
        EvalContext::new(Arc::new(PluginRegistry::new())).with_locale(locale)
    }

    #[test]
    fn test_extract_number() {
        let val = Value::Number(Number::from_i64(42));
        assert_eq!(extract_number(&val, "test", "arg").unwrap(), Number::from_i64(42));

        let err = extract_number(&Value::Text("x".into()), "test", "arg").unwrap_err();
        assert_eq!(err.code, codes::ARG_TYPE);
    }

    #[test]
    fn test_extract_text_passes_errors_through() {
        let err = extract_text(&Value::Error(FurlongError::div_zero()), "test", "arg").unwrap_err();
        assert_eq!(err.code, codes::DIV_ZERO);
    }

    #[test]
    fn test_optional_text() {
        let args = vec![Value::Null];
        assert_eq!(extract_optional_text(&args, 0, "f", "a").unwrap(), None);
        assert_eq!(extract_optional_text(&args, 3, "f", "a").unwrap(), None);

        let args = vec![Value::Text("long".into())];
        assert_eq!(extract_optional_text(&args, 0, "f", "a").unwrap().as_deref(), Some("long"));
    }

    #[test]
    fn test_formatter_for_context() {
        let f = formatter_for(&ctx("de-DE").with_precision(1), "f").unwrap();
        assert_eq!(f.locale().tag(), "de_DE");
        assert_eq!(f.config().number.max_fraction_digits, 1);

        let err = formatter_for(&ctx("???"), "f").unwrap_err();
        assert_eq!(err.code, codes::DOMAIN_ERROR);
    }

    #[test]
    fn test_parse_unit_uses_locale_names() {
        let de = Locale::parse("de").unwrap();
        assert_eq!(parse_unit("km", &de, "f").unwrap(), LengthUnit::Kilometer);
        assert_eq!(parse_unit("Meilen", &de, "f").unwrap(), LengthUnit::Mile);
        assert_eq!(parse_unit("parsec", &de, "f").unwrap_err().code, codes::PARSE_ERROR);
    }

    #[test]
    fn test_parse_style_and_system() {
        assert_eq!(parse_style(None, "f").unwrap(), FormatStyle::SHORT);
        assert_eq!(parse_style(Some("long".into()), "f").unwrap(), FormatStyle::LONG);
        assert!(parse_style(Some("fancy".into()), "f").is_err());

        assert_eq!(parse_system(Some("imperial".into()), "f").unwrap(), Some(UnitSystem::Imperial));
        assert_eq!(parse_system(None, "f").unwrap(), None);
    }
}
