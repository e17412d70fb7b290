//! Length units and measurement systems

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use furlong_core::{Number, NumberError};
use crate::FormatError;

/// A unit of length with a fixed, exact factor to meters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    Millimeter,
    Centimeter,
    Meter,
    Kilometer,
    Inch,
    Foot,
    Yard,
    Mile,
}

impl LengthUnit {
    /// Every unit, metric first, each system smallest to largest
    pub const ALL: [LengthUnit; 8] = [
        LengthUnit::Millimeter,
        LengthUnit::Centimeter,
        LengthUnit::Meter,
        LengthUnit::Kilometer,
        LengthUnit::Inch,
        LengthUnit::Foot,
        LengthUnit::Yard,
        LengthUnit::Mile,
    ];

    /// Canonical, locale-independent symbol
    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeter => "mm",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Meter => "m",
            LengthUnit::Kilometer => "km",
            LengthUnit::Inch => "in",
            LengthUnit::Foot => "ft",
            LengthUnit::Yard => "yd",
            LengthUnit::Mile => "mi",
        }
    }

    /// Canonical identifier, matches the serde representation
    pub fn name(self) -> &'static str {
        match self {
            LengthUnit::Millimeter => "millimeter",
            LengthUnit::Centimeter => "centimeter",
            LengthUnit::Meter => "meter",
            LengthUnit::Kilometer => "kilometer",
            LengthUnit::Inch => "inch",
            LengthUnit::Foot => "foot",
            LengthUnit::Yard => "yard",
            LengthUnit::Mile => "mile",
        }
    }

    pub fn system(self) -> MeasurementSystem {
        match self {
            LengthUnit::Millimeter
            | LengthUnit::Centimeter
            | LengthUnit::Meter
            | LengthUnit::Kilometer => MeasurementSystem::Metric,
            LengthUnit::Inch
            | LengthUnit::Foot
            | LengthUnit::Yard
            | LengthUnit::Mile => MeasurementSystem::Imperial,
        }
    }

    /// Meters in one of this unit (exact decimal)
    pub fn meters_per_unit(self) -> Number {
        match self {
            LengthUnit::Millimeter => Number::from_ratio(1, 1000),
            LengthUnit::Centimeter => Number::from_ratio(1, 100),
            LengthUnit::Meter => Number::from_i64(1),
            LengthUnit::Kilometer => Number::from_i64(1000),
            LengthUnit::Inch => Number::from_ratio(254, 10000),
            LengthUnit::Foot => Number::from_ratio(3048, 10000),
            LengthUnit::Yard => Number::from_ratio(9144, 10000),
            LengthUnit::Mile => Number::from_ratio(1609344, 1000),
        }
    }

    /// Convert a value in this unit to meters
    pub fn to_meters(self, value: &Number) -> Number {
        value.mul(&self.meters_per_unit())
    }

    /// Convert a value in meters to this unit
    pub fn from_meters(self, meters: &Number) -> Result<Number, NumberError> {
        meters.checked_div(&self.meters_per_unit())
    }

    /// Convert a value from this unit to another unit
    pub fn convert(self, value: &Number, target: LengthUnit) -> Result<Number, NumberError> {
        if self == target {
            return Ok(value.clone());
        }
        target.from_meters(&self.to_meters(value))
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for LengthUnit {
    type Err = FormatError;

    /// Accepts canonical symbols and names ("km", "kilometer", "kilometers",
    /// "kilometre"); locale-specific spellings go through the parser.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        let key = key.replace("metre", "meter");
        for unit in LengthUnit::ALL {
            if key == unit.symbol() || key == unit.name() || key == format!("{}s", unit.name()) {
                return Ok(unit);
            }
        }
        match key.as_str() {
            "feet" => Ok(LengthUnit::Foot),
            "inches" => Ok(LengthUnit::Inch),
            _ => Err(FormatError::Parse {
                input: s.to_string(),
                reason: "unknown length unit".to_string(),
            }),
        }
    }
}

/// The two families of length units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementSystem {
    Metric,
    Imperial,
}

impl MeasurementSystem {
    /// Units considered for automatic selection, largest first.
    ///
    /// Yards are never picked automatically; they are still formatted and
    /// parsed when named explicitly.
    pub fn auto_units(self) -> &'static [LengthUnit] {
        match self {
            MeasurementSystem::Metric => &[
                LengthUnit::Kilometer,
                LengthUnit::Meter,
                LengthUnit::Centimeter,
                LengthUnit::Millimeter,
            ],
            MeasurementSystem::Imperial => &[
                LengthUnit::Mile,
                LengthUnit::Foot,
                LengthUnit::Inch,
            ],
        }
    }
}

/// Unit family requested for a `format` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    Metric,
    Imperial,
    /// Person height: centimeters in metric locales, feet and inches in
    /// imperial ones
    PersonHeight,
}

impl From<MeasurementSystem> for UnitSystem {
    fn from(system: MeasurementSystem) -> Self {
        match system {
            MeasurementSystem::Metric => UnitSystem::Metric,
            MeasurementSystem::Imperial => UnitSystem::Imperial,
        }
    }
}

impl FromStr for UnitSystem {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "metric" | "si" => Ok(UnitSystem::Metric),
            "imperial" | "us" => Ok(UnitSystem::Imperial),
            "person_height" | "height" => Ok(UnitSystem::PersonHeight),
            _ => Err(FormatError::InvalidConfig(format!("unknown unit system: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors_are_exact() {
        assert_eq!(LengthUnit::Foot.meters_per_unit().to_plain_string(), "0.3048");
        assert_eq!(LengthUnit::Mile.meters_per_unit().to_plain_string(), "1609.344");
        assert_eq!(LengthUnit::Inch.meters_per_unit().to_plain_string(), "0.0254");
    }

    #[test]
    fn test_convert_feet_to_inches() {
        let three = Number::from_i64(3);
        let inches = LengthUnit::Foot.convert(&three, LengthUnit::Inch).unwrap();
        assert_eq!(inches.to_plain_string(), "36");
    }

    #[test]
    fn test_convert_mile_to_km() {
        let one = Number::from_i64(1);
        let km = LengthUnit::Mile.convert(&one, LengthUnit::Kilometer).unwrap();
        assert_eq!(km.to_plain_string(), "1.609344");
    }

    #[test]
    fn test_from_str_accepts_symbols_and_names() {
        assert_eq!("km".parse::<LengthUnit>().unwrap(), LengthUnit::Kilometer);
        assert_eq!("Kilometres".parse::<LengthUnit>().unwrap(), LengthUnit::Kilometer);
        assert_eq!("feet".parse::<LengthUnit>().unwrap(), LengthUnit::Foot);
        assert_eq!("yard".parse::<LengthUnit>().unwrap(), LengthUnit::Yard);
        assert!("parsec".parse::<LengthUnit>().is_err());
    }

    #[test]
    fn test_systems() {
        assert_eq!(LengthUnit::Yard.system(), MeasurementSystem::Imperial);
        assert_eq!(LengthUnit::Centimeter.system(), MeasurementSystem::Metric);
        assert!(!MeasurementSystem::Imperial.auto_units().contains(&LengthUnit::Yard));
    }

    #[test]
    fn test_unit_system_from_str() {
        assert_eq!("person-height".parse::<UnitSystem>().unwrap(), UnitSystem::PersonHeight);
        assert_eq!("Imperial".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert!("nautical".parse::<UnitSystem>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&LengthUnit::Foot).unwrap(), "\"foot\"");
        assert_eq!(serde_json::to_string(&UnitSystem::PersonHeight).unwrap(), "\"person_height\"");
    }
}
