//! Parsing of localized length strings like "1.5 km", "1,5 Kilometer" or
//! "5 ft 11 in"

use furlong_core::{Number, NumberError};
use tracing::debug;
use crate::locale::{resolve, Locale, LocaleProvider, Localized, NumberSymbols, PluralCategory};
use crate::{FormatError, LengthUnit, UnitStyle};

/// Every spelling of every unit known to a locale, most specific first
pub(crate) struct UnitLexicon<'p> {
    entries: Vec<(&'p str, LengthUnit)>,
}

impl<'p> UnitLexicon<'p> {
    /// Spellings from the locale chain, then the default locale, then the
    /// canonical symbols and names
    pub(crate) fn for_locale(provider: &'p dyn LocaleProvider, locale: &Locale) -> Self {
        let mut sources = locale.chain();
        let default = Locale::default_locale();
        if !sources.contains(&default) {
            sources.push(default);
        }

        let mut entries = Vec::new();
        for source in &sources {
            for unit in LengthUnit::ALL {
                for (style, plural) in [
                    (UnitStyle::Short, PluralCategory::Other),
                    (UnitStyle::Long, PluralCategory::One),
                    (UnitStyle::Long, PluralCategory::Other),
                ] {
                    if let Some(name) = provider.unit_name(source, unit, style, plural) {
                        entries.push((name, unit));
                    }
                }
                entries.extend(provider.aliases(source, unit).into_iter().map(|alias| (alias, unit)));
            }
        }
        for unit in LengthUnit::ALL {
            entries.push((unit.symbol(), unit));
            entries.push((unit.name(), unit));
        }

        UnitLexicon { entries }
    }

    /// Exact match first, then case-insensitive, then without a trailing
    /// abbreviation dot ("ft.")
    pub(crate) fn lookup(&self, token: &str) -> Option<LengthUnit> {
        if let Some((_, unit)) = self.entries.iter().find(|(name, _)| *name == token) {
            return Some(*unit);
        }
        if let Some((_, unit)) = self.entries.iter().find(|(name, _)| eq_ignore_case(name, token)) {
            return Some(*unit);
        }
        match token.strip_suffix('.') {
            Some(stripped) if !stripped.is_empty() => self.lookup(stripped),
            _ => None,
        }
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}

/// A parsed value as a finite `f64`, or a parse error naming the input
pub(crate) fn to_finite_f64(input: &str, value: &Number) -> Result<f64, FormatError> {
    value
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FormatError::parse(input, "numeric literal out of range"))
}

/// Parse a length into its value (in the first unit mentioned) and that unit.
///
/// Compound input such as "5 ft 11 in" is summed into the first unit.
pub fn parse_length(
    text: &str,
    provider: &dyn LocaleProvider,
    locale: &Locale,
) -> Result<(Number, LengthUnit), FormatError> {
    if text.trim().is_empty() {
        return Err(FormatError::parse(text, "empty input"));
    }

    let symbols = resolve(locale, |l| provider.number_symbols(l))
        .map(Localized::into_value)
        .unwrap_or_default();
    let lexicon = UnitLexicon::for_locale(provider, locale);

    let (mut total, unit, mut rest) = parse_component(text, text, &symbols, &lexicon, locale)?;

    while !rest.trim().is_empty() {
        let (value, part_unit, remaining) = parse_component(text, rest, &symbols, &lexicon, locale)?;
        let converted = part_unit.convert(&value, unit)
            .map_err(|e| FormatError::parse(text, e.to_string()))?;
        total = total.add(&converted);
        rest = remaining;
    }
    to_finite_f64(text, &total)?;

    debug!(input = text, unit = %unit, value = %total, "parsed length");
    Ok((total, unit))
}

/// One "<number> <unit>" component; returns the unparsed remainder
fn parse_component<'a>(
    input: &str,
    text: &'a str,
    symbols: &NumberSymbols,
    lexicon: &UnitLexicon,
    locale: &Locale,
) -> Result<(Number, LengthUnit, &'a str), FormatError> {
    let text = text.trim_start();
    let (literal, rest) = scan_literal(text, symbols)
        .ok_or_else(|| FormatError::parse(input, "no numeric literal found"))?;

    let value = Number::from_str(&literal).map_err(|e| match e {
        NumberError::Overflow => FormatError::parse(input, "numeric literal out of range"),
        _ => FormatError::parse(input, format!("malformed numeric literal '{}'", literal)),
    })?;

    let rest = rest.trim_start();
    let token_end = rest
        .char_indices()
        .find(|(_, c)| c.is_whitespace() || c.is_ascii_digit())
        .map_or(rest.len(), |(i, _)| i);
    let token = rest[..token_end].trim_end_matches(',');
    if token.is_empty() {
        return Err(FormatError::parse(input, "missing unit after number"));
    }

    let unit = lexicon.lookup(token).ok_or_else(|| {
        FormatError::parse(input, format!("unknown unit '{}' for locale {}", token, locale))
    })?;

    Ok((value, unit, &rest[token_end..]))
}

/// Scan a locale-formatted numeric literal at the start of `text`.
///
/// Returns the literal normalized to "1234.5" / "1e10" form and the rest of
/// the text. A grouping separator is accepted only inside the integer part,
/// after at most `group_size` digits and before exactly `group_size` digits;
/// anywhere else it ends the literal.
fn scan_literal<'a>(text: &'a str, symbols: &NumberSymbols) -> Option<(String, &'a str)> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let digit_at = |i: usize| chars.get(i).is_some_and(|(_, c)| c.is_ascii_digit());
    let size = symbols.group_size;

    let mut out = String::new();
    let mut i = 0;
    let mut seen_digit = false;
    let mut seen_decimal = false;
    let mut seen_exponent = false;
    // digits since the start of the integer part or the last separator
    let mut int_run = 0;

    if let Some((_, c)) = chars.first() {
        match c {
            '-' | '\u{2212}' => { out.push('-'); i += 1; }
            '+' => { i += 1; }
            _ => {}
        }
    }

    while let Some(&(_, c)) = chars.get(i) {
        if c.is_ascii_digit() {
            out.push(c);
            seen_digit = true;
            if !seen_decimal && !seen_exponent {
                int_run += 1;
            }
            i += 1;
        } else if c == symbols.decimal && !seen_decimal && !seen_exponent && digit_at(i + 1) {
            if !seen_digit {
                out.push('0');
            }
            out.push('.');
            seen_decimal = true;
            i += 1;
        } else if is_group_separator(c, symbols)
            && !seen_decimal
            && !seen_exponent
            && size > 0
            && (1..=size).contains(&int_run)
            && (i + 1..=i + size).all(digit_at)
            && !digit_at(i + size + 1)
        {
            int_run = 0;
            i += 1;
        } else if (c == 'e' || c == 'E') && seen_digit && !seen_exponent {
            let signed = matches!(chars.get(i + 1), Some((_, '-' | '+')));
            let digits_from = if signed { i + 2 } else { i + 1 };
            if !digit_at(digits_from) {
                break;
            }
            out.push('e');
            if signed {
                out.push(chars[i + 1].1);
            }
            seen_exponent = true;
            i = digits_from;
        } else {
            break;
        }
    }

    if !seen_digit {
        return None;
    }

    let end = chars.get(i).map_or(text.len(), |(pos, _)| *pos);
    Some((out, &text[end..]))
}

/// The locale's grouping character; locales grouping with a space also
/// accept the other no-break spaces
fn is_group_separator(c: char, symbols: &NumberSymbols) -> bool {
    if c == symbols.group {
        return true;
    }
    let spaced = matches!(symbols.group, '\u{00A0}' | '\u{202F}');
    spaced && matches!(c, '\u{00A0}' | '\u{202F}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BuiltinLocales;

    fn parse(text: &str, tag: &str) -> Result<(Number, LengthUnit), FormatError> {
        parse_length(text, &BuiltinLocales, &Locale::parse(tag).unwrap())
    }

    fn english() -> NumberSymbols {
        NumberSymbols::default()
    }

    #[test]
    fn test_scan_literal_plain() {
        let (lit, rest) = scan_literal("3 ft", &english()).unwrap();
        assert_eq!(lit, "3");
        assert_eq!(rest, " ft");
    }

    #[test]
    fn test_scan_literal_grouping_and_decimal() {
        let (lit, rest) = scan_literal("1,234.5km", &english()).unwrap();
        assert_eq!(lit, "1234.5");
        assert_eq!(rest, "km");
    }

    #[test]
    fn test_scan_literal_exponent() {
        let (lit, _) = scan_literal("1.5e-3 m", &english()).unwrap();
        assert_eq!(lit, "1.5e-3");

        // "e" without digits belongs to the unit
        let (lit, rest) = scan_literal("2em", &english()).unwrap();
        assert_eq!(lit, "2");
        assert_eq!(rest, "em");
    }

    #[test]
    fn test_scan_literal_none() {
        assert!(scan_literal("abc", &english()).is_none());
        assert!(scan_literal("-", &english()).is_none());
    }

    #[test]
    fn test_scan_literal_leading_decimal() {
        let (lit, _) = scan_literal(".5 m", &english()).unwrap();
        assert_eq!(lit, "0.5");
    }

    #[test]
    fn test_parse_simple() {
        let (value, unit) = parse("3 ft", "en").unwrap();
        assert_eq!(value, Number::from_i64(3));
        assert_eq!(unit, LengthUnit::Foot);
    }

    #[test]
    fn test_parse_without_space_and_long_name() {
        let (value, unit) = parse("100km", "en").unwrap();
        assert_eq!(value, Number::from_i64(100));
        assert_eq!(unit, LengthUnit::Kilometer);

        let (_, unit) = parse("2 Miles", "en").unwrap();
        assert_eq!(unit, LengthUnit::Mile);

        let (_, unit) = parse("4 ft.", "en").unwrap();
        assert_eq!(unit, LengthUnit::Foot);
    }

    #[test]
    fn test_parse_german() {
        let (value, unit) = parse("1.234,5 m", "de").unwrap();
        assert_eq!(value.to_plain_string(), "1234.5");
        assert_eq!(unit, LengthUnit::Meter);

        let (value, unit) = parse("1,5 Kilometer", "de_AT").unwrap();
        assert_eq!(value.to_plain_string(), "1.5");
        assert_eq!(unit, LengthUnit::Kilometer);
    }

    #[test]
    fn test_parse_french_spaces() {
        let (value, unit) = parse("1\u{202F}500 pieds", "fr").unwrap();
        assert_eq!(value, Number::from_i64(1500));
        assert_eq!(unit, LengthUnit::Foot);
    }

    #[test]
    fn test_parse_compound() {
        let (value, unit) = parse("5 ft 6 in", "en").unwrap();
        assert_eq!(unit, LengthUnit::Foot);
        assert_eq!(value.to_plain_string(), "5.5");

        let (value, unit) = parse("5′6″", "en_US").unwrap();
        assert_eq!(unit, LengthUnit::Foot);
        assert_eq!(value.to_plain_string(), "5.5");
    }

    #[test]
    fn test_parse_english_spelling_in_other_locale() {
        // default locale spellings are always understood
        let (_, unit) = parse("3 feet", "it").unwrap();
        assert_eq!(unit, LengthUnit::Foot);
    }

    #[test]
    fn test_parse_errors() {
        let err = parse("abc", "en").unwrap_err();
        assert!(matches!(err, FormatError::Parse { .. }));

        assert!(matches!(parse("", "en"), Err(FormatError::Parse { .. })));
        assert!(matches!(parse("42", "en"), Err(FormatError::Parse { .. })));
        assert!(matches!(parse("3 parsecs", "en"), Err(FormatError::Parse { .. })));
        assert!(matches!(parse("3 ft banana", "en"), Err(FormatError::Parse { .. })));
    }

    #[test]
    fn test_scan_literal_group_size() {
        let (lit, rest) = scan_literal("1,5 km", &english()).unwrap();
        assert_eq!(lit, "1");
        assert_eq!(rest, ",5 km");

        let (lit, _) = scan_literal("1,2,3 m", &english()).unwrap();
        assert_eq!(lit, "1");

        let (lit, rest) = scan_literal("1234,567 m", &english()).unwrap();
        assert_eq!(lit, "1234");
        assert_eq!(rest, ",567 m");

        let (lit, _) = scan_literal("12,345,678.25 m", &english()).unwrap();
        assert_eq!(lit, "12345678.25");
    }

    #[test]
    fn test_parse_rejects_misplaced_grouping() {
        assert!(matches!(parse("1,5 km", "en"), Err(FormatError::Parse { .. })));
        assert!(matches!(parse("1,2,3 m", "en"), Err(FormatError::Parse { .. })));
        assert!(matches!(parse("1.5 km", "de"), Err(FormatError::Parse { .. })));

        let (value, _) = parse("1.500 km", "de").unwrap();
        assert_eq!(value, Number::from_i64(1500));
    }

    #[test]
    fn test_parse_out_of_range_literal() {
        for text in ["1.5e-9223372036854775808 m", "1e9000000000000000000 m", "1e400 m", "1e-401 m"] {
            match parse(text, "en") {
                Err(FormatError::Parse { reason, .. }) => assert!(reason.contains("out of range"), "{}: {}", text, reason),
                other => panic!("{}: expected parse error, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_lexicon_prefers_locale_spelling() {
        let provider = BuiltinLocales;
        let lexicon = UnitLexicon::for_locale(&provider, &Locale::parse("fr").unwrap());
        assert_eq!(lexicon.lookup("pi"), Some(LengthUnit::Foot));
        assert_eq!(lexicon.lookup("KM"), Some(LengthUnit::Kilometer));
        assert_eq!(lexicon.lookup("mètres"), Some(LengthUnit::Meter));
        assert_eq!(lexicon.lookup("furlong"), None);
    }
}
