//! Built-in locale data - unit names and number conventions for a handful
//! of locales
//!
//! Entries may be partial: `en_US` only overrides the measurement system and
//! inherits everything else from `en`.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use crate::locale::{Locale, LocaleProvider, NumberSymbols, PluralCategory, PluralRule};
use crate::{LengthUnit, MeasurementSystem, UnitStyle};

/// Global locale table, built on first use
static LOCALES: LazyLock<LocaleRegistry> = LazyLock::new(LocaleRegistry::new);

/// Shared handle to the built-in provider
pub fn builtin_provider() -> Arc<dyn LocaleProvider> {
    Arc::new(BuiltinLocales)
}

/// `LocaleProvider` backed by the built-in table
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLocales;

impl LocaleProvider for BuiltinLocales {
    fn unit_name(
        &self,
        locale: &Locale,
        unit: LengthUnit,
        style: UnitStyle,
        plural: PluralCategory,
    ) -> Option<&str> {
        let names = LOCALES.get(locale)?.names.get(&unit)?;
        Some(match (style, plural) {
            (UnitStyle::Short, _) => names.short,
            (UnitStyle::Long, PluralCategory::One) => names.one,
            (UnitStyle::Long, PluralCategory::Other) => names.other,
        })
    }

    fn aliases(&self, locale: &Locale, unit: LengthUnit) -> Vec<&str> {
        LOCALES.get(locale)
            .and_then(|entry| entry.aliases.get(&unit))
            .map(|list| list.to_vec())
            .unwrap_or_default()
    }

    fn number_symbols(&self, locale: &Locale) -> Option<NumberSymbols> {
        LOCALES.get(locale)?.symbols
    }

    fn measurement_system(&self, locale: &Locale) -> Option<MeasurementSystem> {
        LOCALES.get(locale)?.system
    }

    fn plural_rule(&self, locale: &Locale) -> Option<PluralRule> {
        LOCALES.get(locale)?.plural
    }
}

/// Short symbol plus singular and plural long names
#[derive(Debug, Clone, Copy)]
struct UnitNames {
    short: &'static str,
    one: &'static str,
    other: &'static str,
}

#[derive(Debug, Default)]
struct LocaleEntry {
    symbols: Option<NumberSymbols>,
    system: Option<MeasurementSystem>,
    plural: Option<PluralRule>,
    names: HashMap<LengthUnit, UnitNames>,
    aliases: HashMap<LengthUnit, Vec<&'static str>>,
}

impl LocaleEntry {
    fn names(mut self, unit: LengthUnit, short: &'static str, one: &'static str, other: &'static str) -> Self {
        self.names.insert(unit, UnitNames { short, one, other });
        self
    }

    fn alias(mut self, unit: LengthUnit, spellings: &[&'static str]) -> Self {
        self.aliases.entry(unit).or_default().extend_from_slice(spellings);
        self
    }
}

/// Registry of all built-in locales, keyed by canonical tag
struct LocaleRegistry {
    entries: HashMap<String, LocaleEntry>,
}

impl LocaleRegistry {
    fn new() -> Self {
        let mut registry = LocaleRegistry { entries: HashMap::new() };
        registry.register_all_locales();
        registry
    }

    fn get(&self, locale: &Locale) -> Option<&LocaleEntry> {
        self.entries.get(&locale.tag())
    }

    fn register(&mut self, tag: &str, entry: LocaleEntry) {
        self.entries.insert(tag.to_string(), entry);
    }

    fn register_all_locales(&mut self) {
        self.register_english();
        self.register_german();
        self.register_french();
        self.register_spanish();
        self.register_italian();
    }

    fn register_english(&mut self) {
        use LengthUnit::*;

        let en = LocaleEntry {
            symbols: Some(NumberSymbols { decimal: '.', group: ',', group_size: 3 }),
            system: Some(MeasurementSystem::Metric),
            plural: Some(PluralRule::ExactlyOne),
            ..Default::default()
        }
        .names(Millimeter, "mm", "millimeter", "millimeters")
        .names(Centimeter, "cm", "centimeter", "centimeters")
        .names(Meter, "m", "meter", "meters")
        .names(Kilometer, "km", "kilometer", "kilometers")
        .names(Inch, "in", "inch", "inches")
        .names(Foot, "ft", "foot", "feet")
        .names(Yard, "yd", "yard", "yards")
        .names(Mile, "mi", "mile", "miles")
        .alias(Millimeter, &["millimetre", "millimetres"])
        .alias(Centimeter, &["centimetre", "centimetres"])
        .alias(Meter, &["metre", "metres"])
        .alias(Kilometer, &["kilometre", "kilometres", "kms"])
        .alias(Inch, &["″", "\""])
        .alias(Foot, &["′", "'"])
        .alias(Yard, &["yds"]);
        self.register("en", en);

        // US customary units; names come from "en"
        self.register("en_US", LocaleEntry {
            system: Some(MeasurementSystem::Imperial),
            ..Default::default()
        });

        self.register("en_GB", LocaleEntry::default()
            .names(Millimeter, "mm", "millimetre", "millimetres")
            .names(Centimeter, "cm", "centimetre", "centimetres")
            .names(Meter, "m", "metre", "metres")
            .names(Kilometer, "km", "kilometre", "kilometres"));
    }

    fn register_german(&mut self) {
        use LengthUnit::*;

        let de = LocaleEntry {
            symbols: Some(NumberSymbols { decimal: ',', group: '.', group_size: 3 }),
            system: Some(MeasurementSystem::Metric),
            plural: Some(PluralRule::ExactlyOne),
            ..Default::default()
        }
        .names(Millimeter, "mm", "Millimeter", "Millimeter")
        .names(Centimeter, "cm", "Zentimeter", "Zentimeter")
        .names(Meter, "m", "Meter", "Meter")
        .names(Kilometer, "km", "Kilometer", "Kilometer")
        .names(Inch, "in", "Zoll", "Zoll")
        .names(Foot, "ft", "Fuß", "Fuß")
        .names(Yard, "yd", "Yard", "Yards")
        .names(Mile, "mi", "Meile", "Meilen")
        .alias(Foot, &["Fuss"]);
        self.register("de", de);

        self.register("de_CH", LocaleEntry {
            symbols: Some(NumberSymbols { decimal: '.', group: '’', group_size: 3 }),
            ..Default::default()
        });
    }

    fn register_french(&mut self) {
        use LengthUnit::*;

        let fr = LocaleEntry {
            symbols: Some(NumberSymbols { decimal: ',', group: '\u{202F}', group_size: 3 }),
            system: Some(MeasurementSystem::Metric),
            plural: Some(PluralRule::BelowTwo),
            ..Default::default()
        }
        .names(Millimeter, "mm", "millimètre", "millimètres")
        .names(Centimeter, "cm", "centimètre", "centimètres")
        .names(Meter, "m", "mètre", "mètres")
        .names(Kilometer, "km", "kilomètre", "kilomètres")
        .names(Inch, "po", "pouce", "pouces")
        .names(Foot, "pi", "pied", "pieds")
        .names(Yard, "yd", "yard", "yards")
        .names(Mile, "mi", "mile", "miles");
        self.register("fr", fr);
    }

    fn register_spanish(&mut self) {
        use LengthUnit::*;

        let es = LocaleEntry {
            symbols: Some(NumberSymbols { decimal: ',', group: '.', group_size: 3 }),
            system: Some(MeasurementSystem::Metric),
            plural: Some(PluralRule::ExactlyOne),
            ..Default::default()
        }
        .names(Millimeter, "mm", "milímetro", "milímetros")
        .names(Centimeter, "cm", "centímetro", "centímetros")
        .names(Meter, "m", "metro", "metros")
        .names(Kilometer, "km", "kilómetro", "kilómetros")
        .names(Inch, "in", "pulgada", "pulgadas")
        .names(Foot, "ft", "pie", "pies")
        .names(Yard, "yd", "yarda", "yardas")
        .names(Mile, "mi", "milla", "millas");
        self.register("es", es);
    }

    fn register_italian(&mut self) {
        use LengthUnit::*;

        let it = LocaleEntry {
            symbols: Some(NumberSymbols { decimal: ',', group: '.', group_size: 3 }),
            system: Some(MeasurementSystem::Metric),
            plural: Some(PluralRule::ExactlyOne),
            ..Default::default()
        }
        .names(Millimeter, "mm", "millimetro", "millimetri")
        .names(Centimeter, "cm", "centimetro", "centimetri")
        .names(Meter, "m", "metro", "metri")
        .names(Kilometer, "km", "chilometro", "chilometri")
        .names(Inch, "in", "pollice", "pollici")
        .names(Foot, "ft", "piede", "piedi")
        .names(Yard, "yd", "iarda", "iarde")
        .names(Mile, "mi", "miglio", "miglia");
        self.register("it", it);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(tag: &str) -> Locale {
        Locale::parse(tag).unwrap()
    }

    #[test]
    fn test_base_locales_cover_every_unit() {
        for tag in ["en", "de", "fr", "es", "it"] {
            for unit in LengthUnit::ALL {
                for style in [UnitStyle::Short, UnitStyle::Long] {
                    assert!(
                        BuiltinLocales.unit_name(&locale(tag), unit, style, PluralCategory::Other).is_some(),
                        "{} lacks {:?} {:?}", tag, unit, style
                    );
                }
            }
        }
    }

    #[test]
    fn test_partial_entries() {
        let us = locale("en_US");
        assert_eq!(BuiltinLocales.measurement_system(&us), Some(MeasurementSystem::Imperial));
        assert!(BuiltinLocales.unit_name(&us, LengthUnit::Foot, UnitStyle::Short, PluralCategory::One).is_none());

        let gb = locale("en_GB");
        assert_eq!(
            BuiltinLocales.unit_name(&gb, LengthUnit::Meter, UnitStyle::Long, PluralCategory::Other),
            Some("metres")
        );
        assert!(BuiltinLocales.unit_name(&gb, LengthUnit::Mile, UnitStyle::Long, PluralCategory::One).is_none());
    }

    #[test]
    fn test_unknown_locale_has_nothing() {
        let ja = locale("ja");
        assert!(BuiltinLocales.number_symbols(&ja).is_none());
        assert!(BuiltinLocales.aliases(&ja, LengthUnit::Meter).is_empty());
    }
}
