//! Length functions exposed through the plugin registry

use std::collections::HashMap;
use furlong_plugin::prelude::*;
use crate::helpers::{
    extract_number, extract_optional_text, extract_text, formatter_for, number_to_f64,
    parse_style, parse_system, parse_unit,
};

fn error_in(func: &str, e: impl Into<FurlongError>) -> Value {
    Value::Error(e.into().in_function(func))
}

// ============ format_length ============

pub struct FormatLength;

static FORMAT_LENGTH_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("meters", "Number", "Length in meters"),
    ArgMeta::optional("system", "Text", "\"metric\", \"imperial\" or \"person_height\"", "locale preference"),
    ArgMeta::optional("style", "Text", "\"short\" (symbol) or \"long\" (name)", "short"),
];

static FORMAT_LENGTH_EXAMPLES: [&str; 3] = [
    "format_length(1500) → \"1.5 km\"",
    "format_length(0.5, \"metric\", \"long\") → \"50 centimeters\"",
    "format_length(1.8034, \"person_height\") → \"5 ft 11 in\" (en_US)",
];

static FORMAT_LENGTH_RELATED: [&str; 2] = ["format_length_in", "parse_length"];

impl FunctionPlugin for FormatLength {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "format_length",
            description: "Format a length in meters with an automatically chosen unit",
            usage: "format_length(meters, [system], [style])",
            args: &FORMAT_LENGTH_ARGS,
            returns: "Text",
            examples: &FORMAT_LENGTH_EXAMPLES,
            category: "length",
            related: &FORMAT_LENGTH_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const NAME: &str = "format_length";
        if args.is_empty() || args.len() > 3 {
            return Value::Error(FurlongError::arg_count(NAME, 1, args.len()));
        }

        let meters = match extract_number(&args[0], NAME, "meters") {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };
        let system = match extract_optional_text(args, 1, NAME, "system").and_then(|s| parse_system(s, NAME)) {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };
        let style = match extract_optional_text(args, 2, NAME, "style").and_then(|s| parse_style(s, NAME)) {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };
        let meters = match number_to_f64(&meters, NAME) {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };
        let formatter = match formatter_for(ctx, NAME) {
            Ok(f) => f,
            Err(e) => return Value::Error(e),
        };

        let system = system.unwrap_or_else(|| formatter.preferred_system().into());
        match formatter.format(meters, system, style) {
            Ok(text) => Value::Text(text),
            Err(e) => error_in(NAME, e),
        }
    }
}

// ============ format_length_in ============

pub struct FormatLengthIn;

static FORMAT_LENGTH_IN_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("value", "Number", "Length expressed in `unit`"),
    ArgMeta::required("unit", "Text", "Unit of the value (e.g., \"ft\")"),
    ArgMeta::optional("style", "Text", "\"short\" or \"long\"", "short"),
];

static FORMAT_LENGTH_IN_EXAMPLES: [&str; 2] = [
    "format_length_in(3, \"yd\") → \"3 yd\"",
    "format_length_in(2, \"ft\", \"long\") → \"2 feet\"",
];

static FORMAT_LENGTH_IN_RELATED: [&str; 2] = ["format_length", "convert_length"];

impl FunctionPlugin for FormatLengthIn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "format_length_in",
            description: "Format a length in a fixed unit, without unit selection",
            usage: "format_length_in(value, unit, [style])",
            args: &FORMAT_LENGTH_IN_ARGS,
            returns: "Text",
            examples: &FORMAT_LENGTH_IN_EXAMPLES,
            category: "length",
            related: &FORMAT_LENGTH_IN_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const NAME: &str = "format_length_in";
        if args.len() < 2 || args.len() > 3 {
            return Value::Error(FurlongError::arg_count(NAME, 2, args.len()));
        }

        let result = (|| {
            let value = extract_number(&args[0], NAME, "value")?;
            let unit_text = extract_text(&args[1], NAME, "unit")?;
            let style = parse_style(extract_optional_text(args, 2, NAME, "style")?, NAME)?;
            let formatter = formatter_for(ctx, NAME)?;
            let unit = parse_unit(&unit_text, formatter.locale(), NAME)?;
            formatter
                .format_in_unit(number_to_f64(&value, NAME)?, unit, style)
                .map_err(|e| FurlongError::from(e).in_function(NAME))
        })();

        match result {
            Ok(text) => Value::Text(text),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ parse_length ============

pub struct ParseLength;

static PARSE_LENGTH_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("text", "Text", "Localized length such as \"1.5 km\" or \"5 ft 11 in\""),
];

static PARSE_LENGTH_EXAMPLES: [&str; 3] = [
    "parse_length(\"3 ft\") → {value: 3, unit: \"foot\"}",
    "parse_length(\"1,5 km\") → {value: 1.5, unit: \"kilometer\"} (de)",
    "parse_length(\"5 ft 6 in\") → {value: 5.5, unit: \"foot\"}",
];

static PARSE_LENGTH_RELATED: [&str; 1] = ["format_length"];

impl FunctionPlugin for ParseLength {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "parse_length",
            description: "Parse localized length text into a value and its unit",
            usage: "parse_length(text)",
            args: &PARSE_LENGTH_ARGS,
            returns: "Object",
            examples: &PARSE_LENGTH_EXAMPLES,
            category: "length",
            related: &PARSE_LENGTH_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const NAME: &str = "parse_length";
        if args.len() != 1 {
            return Value::Error(FurlongError::arg_count(NAME, 1, args.len()));
        }

        let text = match extract_text(&args[0], NAME, "text") {
            Ok(t) => t,
            Err(e) => return Value::Error(e),
        };
        let formatter = match formatter_for(ctx, NAME) {
            Ok(f) => f,
            Err(e) => return Value::Error(e),
        };

        match formatter.parse_text(&text) {
            Value::Error(e) => Value::Error(e.in_function(NAME)),
            parsed => parsed,
        }
    }
}

// ============ length_unit_string ============

pub struct LengthUnitString;

static LENGTH_UNIT_STRING_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("unit", "Text", "Unit (e.g., \"km\", \"foot\")"),
    ArgMeta::optional("style", "Text", "\"short\" or \"long\"", "short"),
];

static LENGTH_UNIT_STRING_EXAMPLES: [&str; 2] = [
    "length_unit_string(\"ft\", \"long\") → {text: \"feet\", degraded: false}",
    "length_unit_string(\"mi\", \"long\") → {text: \"Meilen\", degraded: false} (de)",
];

static LENGTH_UNIT_STRING_RELATED: [&str; 1] = ["format_length_in"];

impl FunctionPlugin for LengthUnitString {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "length_unit_string",
            description: "Localized label of a length unit, flagged when it comes from the default locale",
            usage: "length_unit_string(unit, [style])",
            args: &LENGTH_UNIT_STRING_ARGS,
            returns: "Object",
            examples: &LENGTH_UNIT_STRING_EXAMPLES,
            category: "length",
            related: &LENGTH_UNIT_STRING_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const NAME: &str = "length_unit_string";
        if args.is_empty() || args.len() > 2 {
            return Value::Error(FurlongError::arg_count(NAME, 1, args.len()));
        }

        let result = (|| {
            let unit_text = extract_text(&args[0], NAME, "unit")?;
            let style = parse_style(extract_optional_text(args, 1, NAME, "style")?, NAME)?;
            let formatter = formatter_for(ctx, NAME)?;
            let unit = parse_unit(&unit_text, formatter.locale(), NAME)?;
            let label = formatter
                .unit_string(unit, style)
                .map_err(|e| FurlongError::from(e).in_function(NAME))?;
            Ok::<_, FurlongError>((label, unit, formatter.locale().tag()))
        })();

        let (label, unit, locale) = match result {
            Ok(pair) => pair,
            Err(e) => return Value::Error(e),
        };

        let degraded = label.is_degraded();
        let mut object = HashMap::new();
        if degraded {
            let warning = FurlongError::degraded(format!("no {} label for {}", unit.name(), locale))
                .in_function(NAME)
                .with_locale(locale);
            object.insert("warning".to_string(), Value::Error(warning));
        }
        object.insert("text".to_string(), Value::Text(label.into_value()));
        object.insert("degraded".to_string(), Value::Bool(degraded));
        Value::Object(object)
    }
}

// ============ convert_length ============

pub struct ConvertLength;

static CONVERT_LENGTH_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("value", "Number", "Value to convert"),
    ArgMeta::required("from_unit", "Text", "Source unit (e.g., \"km\")"),
    ArgMeta::required("to_unit", "Text", "Target unit (e.g., \"mi\")"),
];

static CONVERT_LENGTH_EXAMPLES: [&str; 2] = [
    "convert_length(3, \"ft\", \"in\") → 36",
    "convert_length(1, \"mi\", \"km\") → 1.61",
];

static CONVERT_LENGTH_RELATED: [&str; 1] = ["format_length_in"];

impl FunctionPlugin for ConvertLength {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert_length",
            description: "Convert a length between units, rounded to the context precision",
            usage: "convert_length(value, from_unit, to_unit)",
            args: &CONVERT_LENGTH_ARGS,
            returns: "Number",
            examples: &CONVERT_LENGTH_EXAMPLES,
            category: "length",
            related: &CONVERT_LENGTH_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const NAME: &str = "convert_length";
        if args.len() != 3 {
            return Value::Error(FurlongError::arg_count(NAME, 3, args.len()));
        }

        let result = (|| {
            let value = extract_number(&args[0], NAME, "value")?;
            let from_text = extract_text(&args[1], NAME, "from_unit")?;
            let to_text = extract_text(&args[2], NAME, "to_unit")?;
            let formatter = formatter_for(ctx, NAME)?;
            let from = parse_unit(&from_text, formatter.locale(), NAME)?;
            let to = parse_unit(&to_text, formatter.locale(), NAME)?;
            let converted = from.convert(&value, to)
                .map_err(|e| FurlongError::from(e).in_function(NAME))?;
            Ok::<_, FurlongError>(formatter.config().number.round(&converted))
        })();

        match result {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e),
        }
    }
}
