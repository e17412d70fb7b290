//! Locale identifiers, resolution through fallback chains, and the
//! data provider interface
//!
//! A lookup for `de_AT` tries `de_AT`, then `de`. Answers from that chain are
//! regular results. When the chain has nothing, the default locale (`en`) is
//! consulted and the answer is marked as degraded.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use furlong_core::Number;
use crate::{FormatError, LengthUnit, MeasurementSystem, UnitStyle};

/// Language tag of the process-wide default locale
pub const DEFAULT_LANGUAGE: &str = "en";

/// A language with an optional region, e.g. `en`, `en_US`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    /// Parse a locale identifier.
    ///
    /// Accepts `en`, `en-US`, `en_us` and POSIX forms such as
    /// `de_DE.UTF-8@euro`. `C` and `POSIX` map to the default locale.
    pub fn parse(tag: &str) -> Result<Self, FormatError> {
        let trimmed = tag.trim();
        // Drop POSIX encoding and modifier suffixes
        let base = trimmed
            .split(['.', '@'])
            .next()
            .unwrap_or_default();

        if base.eq_ignore_ascii_case("c") || base.eq_ignore_ascii_case("posix") {
            return Ok(Self::default_locale());
        }

        let mut parts = base.split(['_', '-']);
        let language = parts.next().unwrap_or_default();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FormatError::InvalidLocale(tag.to_string()));
        }

        let region = match parts.next() {
            None => None,
            Some(r) if r.len() == 2 && r.chars().all(|c| c.is_ascii_alphabetic()) => {
                Some(r.to_ascii_uppercase())
            }
            Some(r) if r.len() == 3 && r.chars().all(|c| c.is_ascii_digit()) => Some(r.to_string()),
            Some(_) => return Err(FormatError::InvalidLocale(tag.to_string())),
        };

        if parts.next().is_some() {
            return Err(FormatError::InvalidLocale(tag.to_string()));
        }

        Ok(Locale { language: language.to_ascii_lowercase(), region })
    }

    pub fn default_locale() -> Self {
        Locale { language: DEFAULT_LANGUAGE.to_string(), region: None }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default_locale()
    }

    /// The locale one step up, `en_US -> en`
    pub fn parent(&self) -> Option<Locale> {
        self.region.as_ref().map(|_| Locale { language: self.language.clone(), region: None })
    }

    /// This locale followed by its ancestors
    pub fn chain(&self) -> Vec<Locale> {
        let mut chain = vec![self.clone()];
        while let Some(parent) = chain.last().and_then(Locale::parent) {
            chain.push(parent);
        }
        chain
    }

    /// Canonical `ll_CC` form
    pub fn tag(&self) -> String {
        match &self.region {
            Some(region) => format!("{}_{}", self.language, region),
            None => self.language.clone(),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::default_locale()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Locale {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = FormatError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Locale::parse(&s)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag()
    }
}

/// Decimal and grouping conventions of a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberSymbols {
    pub decimal: char,
    pub group: char,
    pub group_size: usize,
}

impl Default for NumberSymbols {
    fn default() -> Self {
        NumberSymbols { decimal: '.', group: ',', group_size: 3 }
    }
}

/// Plural category of a displayed number (the subset lengths need)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluralCategory {
    One,
    Other,
}

/// How a locale picks between singular and plural unit names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluralRule {
    /// "one" only for a displayed 1 with no fraction digits (en, de, es, it)
    ExactlyOne,
    /// "one" for any displayed value below 2 (fr)
    BelowTwo,
}

impl PluralRule {
    /// Category for an already rounded display value shown with
    /// `visible_fraction_digits` digits after the decimal separator
    pub fn category(self, displayed: &Number, visible_fraction_digits: usize) -> PluralCategory {
        let one = Number::from_i64(1);
        let is_one = match self {
            PluralRule::ExactlyOne => *displayed == one && visible_fraction_digits == 0,
            PluralRule::BelowTwo => displayed.abs() < Number::from_i64(2),
        };
        if is_one { PluralCategory::One } else { PluralCategory::Other }
    }
}

/// Source of locale-specific unit names and number conventions.
///
/// Implementations answer for a single locale only; walking the fallback
/// chain is done by the caller through [`resolve`].
pub trait LocaleProvider: Send + Sync {
    /// Unit label for a style and plural category
    fn unit_name(
        &self,
        locale: &Locale,
        unit: LengthUnit,
        style: UnitStyle,
        plural: PluralCategory,
    ) -> Option<&str>;

    /// Additional spellings accepted when parsing ("metre", "′")
    fn aliases(&self, locale: &Locale, unit: LengthUnit) -> Vec<&str>;

    fn number_symbols(&self, locale: &Locale) -> Option<NumberSymbols>;

    fn measurement_system(&self, locale: &Locale) -> Option<MeasurementSystem>;

    fn plural_rule(&self, locale: &Locale) -> Option<PluralRule>;
}

/// Where a localized answer came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// The requested locale had the data
    Exact,
    /// An ancestor of the requested locale had the data
    Inherited { from: Locale },
    /// Only the default locale had the data
    Fallback { requested: Locale, used: Locale },
}

/// A localized answer together with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized<T> {
    pub value: T,
    pub resolution: Resolution,
}

impl<T> Localized<T> {
    /// True when the answer came from the default locale instead of the
    /// requested one
    pub fn is_degraded(&self) -> bool {
        matches!(self.resolution, Resolution::Fallback { .. })
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Localized<U> {
        Localized { value: f(self.value), resolution: self.resolution }
    }
}

impl Localized<String> {
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T: fmt::Display> fmt::Display for Localized<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Look a value up through the locale chain, then the default locale
pub fn resolve<T>(locale: &Locale, mut lookup: impl FnMut(&Locale) -> Option<T>) -> Option<Localized<T>> {
    let chain = locale.chain();
    for (depth, candidate) in chain.iter().enumerate() {
        if let Some(value) = lookup(candidate) {
            let resolution = if depth == 0 {
                Resolution::Exact
            } else {
                Resolution::Inherited { from: candidate.clone() }
            };
            return Some(Localized { value, resolution });
        }
    }

    let default = Locale::default_locale();
    if chain.contains(&default) {
        return None;
    }
    lookup(&default).map(|value| Localized {
        value,
        resolution: Resolution::Fallback { requested: locale.clone(), used: default },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        let l = Locale::parse("en-us").unwrap();
        assert_eq!(l.language(), "en");
        assert_eq!(l.region(), Some("US"));
        assert_eq!(l.tag(), "en_US");

        let l = Locale::parse("de_DE.UTF-8@euro").unwrap();
        assert_eq!(l.tag(), "de_DE");

        let l = Locale::parse("es_419").unwrap();
        assert_eq!(l.region(), Some("419"));

        assert!(Locale::parse("C").unwrap().is_default());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Locale::parse("").is_err());
        assert!(Locale::parse("english").is_err());
        assert!(Locale::parse("en_USA_x").is_err());
        assert!(Locale::parse("e1").is_err());
    }

    #[test]
    fn test_chain() {
        let chain = Locale::parse("de_AT").unwrap().chain();
        let tags: Vec<String> = chain.iter().map(Locale::tag).collect();
        assert_eq!(tags, vec!["de_AT", "de"]);
    }

    #[test]
    fn test_serde_as_string() {
        let l = Locale::parse("fr-CA").unwrap();
        assert_eq!(serde_json::to_string(&l).unwrap(), "\"fr_CA\"");
        let back: Locale = serde_json::from_str("\"fr_CA\"").unwrap();
        assert_eq!(back, l);
        assert!(serde_json::from_str::<Locale>("\"??\"").is_err());
    }

    #[test]
    fn test_plural_rules() {
        let one = Number::from_i64(1);
        let one_and_half = Number::from_ratio(3, 2);
        assert_eq!(PluralRule::ExactlyOne.category(&one, 0), PluralCategory::One);
        assert_eq!(PluralRule::ExactlyOne.category(&one, 2), PluralCategory::Other);
        assert_eq!(PluralRule::ExactlyOne.category(&one_and_half, 1), PluralCategory::Other);
        assert_eq!(PluralRule::ExactlyOne.category(&Number::from_i64(0), 0), PluralCategory::Other);
        assert_eq!(PluralRule::BelowTwo.category(&one_and_half, 1), PluralCategory::One);
        assert_eq!(PluralRule::BelowTwo.category(&Number::from_i64(0), 0), PluralCategory::One);
        assert_eq!(PluralRule::BelowTwo.category(&Number::from_i64(2), 0), PluralCategory::Other);
    }

    #[test]
    fn test_resolve_exact_inherited_fallback() {
        let lookup = |l: &Locale| match l.tag().as_str() {
            "de" => Some("de-data"),
            "en" => Some("en-data"),
            _ => None,
        };

        let exact = resolve(&Locale::parse("de").unwrap(), lookup).unwrap();
        assert_eq!(exact.resolution, Resolution::Exact);

        let inherited = resolve(&Locale::parse("de_CH").unwrap(), lookup).unwrap();
        assert_eq!(inherited.value, "de-data");
        assert!(!inherited.is_degraded());

        let fallback = resolve(&Locale::parse("ja").unwrap(), lookup).unwrap();
        assert_eq!(fallback.value, "en-data");
        assert!(fallback.is_degraded());
    }

    #[test]
    fn test_resolve_nothing() {
        let none = resolve(&Locale::parse("ja").unwrap(), |_| None::<&str>);
        assert!(none.is_none());
    }
}
