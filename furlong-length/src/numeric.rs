//! Rendering of the numeric part of a length

use serde::{Serialize, Deserialize};
use furlong_core::{Number, RoundingMode};
use crate::locale::NumberSymbols;

/// Upper bound on fraction digits a formatter will show
pub const MAX_FRACTION_DIGITS: u32 = 20;

/// Numeric formatting options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberOptions {
    pub max_fraction_digits: u32,
    pub min_fraction_digits: u32,
    pub rounding: RoundingMode,
    pub use_grouping: bool,
}

impl Default for NumberOptions {
    fn default() -> Self {
        NumberOptions {
            max_fraction_digits: 2,
            min_fraction_digits: 0,
            rounding: RoundingMode::HalfUp,
            use_grouping: true,
        }
    }
}

impl NumberOptions {
    pub fn with_max_fraction_digits(mut self, digits: u32) -> Self {
        self.max_fraction_digits = digits.min(MAX_FRACTION_DIGITS);
        self.min_fraction_digits = self.min_fraction_digits.min(self.max_fraction_digits);
        self
    }

    pub fn with_min_fraction_digits(mut self, digits: u32) -> Self {
        self.min_fraction_digits = digits.min(self.max_fraction_digits);
        self
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_grouping(mut self, use_grouping: bool) -> Self {
        self.use_grouping = use_grouping;
        self
    }

    /// Round a value the way it will be displayed
    pub fn round(&self, value: &Number) -> Number {
        value.round_to(self.max_fraction_digits, self.rounding)
    }

    /// Fraction digits that will be visible for an already rounded value
    pub fn visible_fraction_digits(&self, rounded: &Number) -> usize {
        rounded.fraction_digits().max(self.min_fraction_digits as usize)
    }

    /// Half of the smallest displayed step, in the display unit
    pub fn tolerance(&self) -> f64 {
        0.5 * 10_f64.powi(-(self.max_fraction_digits as i32))
    }
}

/// Render an already rounded number with locale separators
pub fn render(rounded: &Number, options: &NumberOptions, symbols: &NumberSymbols) -> String {
    let plain = rounded.to_plain_string();
    let (negative, digits) = match plain.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, plain.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

    let mut out = String::new();
    if negative {
        out.push('-');
    }

    if options.use_grouping && symbols.group_size > 0 {
        out.push_str(&group_digits(int_part, symbols.group, symbols.group_size));
    } else {
        out.push_str(int_part);
    }

    let mut frac = frac_part.to_string();
    while frac.len() < options.min_fraction_digits as usize {
        frac.push('0');
    }
    if !frac.is_empty() {
        out.push(symbols.decimal);
        out.push_str(&frac);
    }
    out
}

fn group_digits(int_part: &str, separator: char, size: usize) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / size);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % size == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}
