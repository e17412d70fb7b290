//! Output style selection

use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::FormatError;

/// How verbose the unit part of the output is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStyle {
    /// Unit symbol: "1.5 km"
    #[default]
    Short,
    /// Full, plural-aware unit name: "1.5 kilometers"
    Long,
}

impl FromStr for UnitStyle {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" | "symbol" => Ok(UnitStyle::Short),
            "long" | "name" => Ok(UnitStyle::Long),
            _ => Err(FormatError::InvalidConfig(format!("unknown unit style: {}", s))),
        }
    }
}

/// Style of a single format call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatStyle {
    pub unit_style: UnitStyle,
    /// Person context, shared with sibling formatters (mass, energy).
    /// Length output does not depend on it; person height is chosen through
    /// `UnitSystem::PersonHeight`.
    pub for_person: bool,
}

impl FormatStyle {
    pub const SHORT: FormatStyle = FormatStyle { unit_style: UnitStyle::Short, for_person: false };
    pub const LONG: FormatStyle = FormatStyle { unit_style: UnitStyle::Long, for_person: false };
}

impl From<UnitStyle> for FormatStyle {
    fn from(unit_style: UnitStyle) -> Self {
        FormatStyle { unit_style, for_person: false }
    }
}
