//! Arbitrary precision numbers using dashu
//!
//! Uses dashu-float (DBig) for decimal arithmetic. Unit factors such as
//! 0.3048 are exact in base 10, so conversions and half-up rounding do not
//! suffer from binary floating point artifacts (1.005 rounds to 1.01).

use dashu_float::DBig;
use dashu_float::ops::Abs;
use dashu_int::IBig;
use dashu_int::ops::BitTest;
use serde::{Deserialize, Serialize, Serializer, Deserializer};
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Domain error: {0}")]
    DomainError(String),

    #[error("Overflow: result too large")]
    Overflow,
}

/// How a value is brought down to a fixed number of fraction digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Ties go away from zero (2.345 -> 2.35)
    #[default]
    HalfUp,
    /// Ties go to the even neighbour (2.345 -> 2.34)
    HalfEven,
    /// Truncate toward zero
    Down,
}

/// Default precision for calculations (decimal digits)
const DEFAULT_PRECISION: usize = 50;

/// Largest decimal exponent accepted in scientific notation, in either
/// direction; comfortably past the f64 range
pub const MAX_EXPONENT: isize = 400;

/// Arbitrary precision decimal number
///
/// All operations return Results or new Numbers - never panic.
#[derive(Debug, Clone)]
pub struct Number {
    inner: DBig,
}

impl Number {
    // ========== Construction ==========

    /// Ensure a DBig has adequate precision for calculations
    fn with_work_precision(val: DBig) -> DBig {
        val.with_precision(DEFAULT_PRECISION).value()
    }

    /// Create from string representation
    /// Supports: "123", "3.14", "1/3", "1.5e10", "-42"
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();

        // Handle rational format "a/b"
        if s.contains('/') && !s.contains('.') && !s.contains('e') && !s.contains('E') {
            let parts: Vec<&str> = s.split('/').collect();
            if parts.len() == 2 {
                let num: DBig = parts[0].trim().parse()
                    .map_err(|_| NumberError::ParseError(s.to_string()))?;
                let den: DBig = parts[1].trim().parse()
                    .map_err(|_| NumberError::ParseError(s.to_string()))?;

                if den == DBig::ZERO {
                    return Err(NumberError::DivisionByZero);
                }

                let result = Self::with_work_precision(num) / Self::with_work_precision(den);
                return Ok(Self { inner: result });
            }
        }

        // Scientific notation: "602214076e15", "1.5e-3"
        if s.contains('e') || s.contains('E') {
            let s_lower = s.to_lowercase();
            let parts: Vec<&str> = s_lower.split('e').collect();
            if parts.len() != 2 {
                return Err(NumberError::ParseError(s.to_string()));
            }
            let exp: isize = parts[1].parse()
                .map_err(|_| NumberError::ParseError(s.to_string()))?;
            let (mantissa, shift) = Self::split_mantissa(parts[0])
                .ok_or_else(|| NumberError::ParseError(s.to_string()))?;

            if exp.unsigned_abs() > MAX_EXPONENT.unsigned_abs() {
                return Err(NumberError::Overflow);
            }
            let exponent = exp.checked_sub(shift).ok_or(NumberError::Overflow)?;

            let result = DBig::from_parts(mantissa, exponent);
            return Ok(Self { inner: Self::with_work_precision(result) });
        }

        let inner: DBig = s.parse()
            .map_err(|_| NumberError::ParseError(s.to_string()))?;

        Ok(Self { inner: Self::with_work_precision(inner) })
    }

    /// Split "12.34" into (1234, 2) so that value = 1234 * 10^-2
    fn split_mantissa(s: &str) -> Option<(IBig, isize)> {
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        let digits = format!("{}{}", int_part, frac_part);
        if digits.is_empty() || digits == "-" || digits == "+" {
            return None;
        }
        let mantissa: IBig = digits.parse().ok()?;
        Some((mantissa, frac_part.len() as isize))
    }

    /// Create from i64 with working precision
    pub fn from_i64(n: i64) -> Self {
        Self { inner: Self::with_work_precision(DBig::from(n)) }
    }

    /// Create from ratio (exact division)
    pub fn from_ratio(num: i64, den: i64) -> Self {
        if den == 0 {
            return Self { inner: DBig::ZERO };
        }
        let n = Self::with_work_precision(DBig::from(num));
        let d = Self::with_work_precision(DBig::from(den));
        Self { inner: n / d }
    }

    /// Create from f64 via its shortest round-trip decimal representation.
    ///
    /// Fails for NaN and infinities.
    pub fn from_f64(f: f64) -> Result<Self, NumberError> {
        if f.is_nan() {
            return Err(NumberError::DomainError("NaN is not a number".to_string()));
        }
        if f.is_infinite() {
            return Err(NumberError::Overflow);
        }
        // f64's Display never uses exponent notation
        Self::from_str(&format!("{}", f))
    }

    /// 10^exp as an exact decimal
    pub fn power_of_ten(exp: i32) -> Self {
        Self { inner: Self::with_work_precision(DBig::from_parts(IBig::ONE, exp as isize)) }
    }

    // ========== Predicates ==========

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.inner == DBig::ZERO
    }

    /// Check if negative
    pub fn is_negative(&self) -> bool {
        self.inner < DBig::ZERO
    }

    /// Check if value is an integer
    pub fn is_integer(&self) -> bool {
        let floor_val = self.inner.clone().floor();
        self.inner == floor_val
    }

    // ========== Basic Arithmetic ==========

    /// Addition
    pub fn add(&self, other: &Self) -> Self {
        Self { inner: &self.inner + &other.inner }
    }

    /// Subtraction
    pub fn sub(&self, other: &Self) -> Self {
        Self { inner: &self.inner - &other.inner }
    }

    /// Multiplication
    pub fn mul(&self, other: &Self) -> Self {
        Self { inner: &self.inner * &other.inner }
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            Err(NumberError::DivisionByZero)
        } else {
            Ok(Self { inner: &self.inner / &other.inner })
        }
    }

    // ========== Other Operations ==========

    /// Absolute value
    pub fn abs(&self) -> Self {
        Self { inner: Abs::abs(self.inner.clone()) }
    }

    /// Floor - largest integer <= x
    pub fn floor(&self) -> Self {
        Self { inner: self.inner.clone().floor() }
    }

    /// Round to `places` fraction digits.
    ///
    /// The magnitude is rounded and the sign reapplied, so half-up means
    /// "half away from zero" for negative values.
    pub fn round_to(&self, places: u32, mode: RoundingMode) -> Self {
        let scale = Self::power_of_ten(places as i32);
        let magnitude = self.abs().mul(&scale);
        let floor = magnitude.floor();
        let fraction = magnitude.sub(&floor);
        let half = Self::from_ratio(1, 2);
        let one = Self::from_i64(1);

        let rounded = match mode {
            RoundingMode::Down => floor,
            RoundingMode::HalfUp => {
                if fraction >= half { floor.add(&one) } else { floor }
            }
            RoundingMode::HalfEven => match fraction.cmp(&half) {
                std::cmp::Ordering::Greater => floor.add(&one),
                std::cmp::Ordering::Less => floor,
                std::cmp::Ordering::Equal => {
                    if floor.is_even_integer() { floor } else { floor.add(&one) }
                }
            },
        };

        // rounded is an integer count of 10^-places steps; rebuild exactly
        let (significand, exponent) = rounded.inner.into_repr().into_parts();
        let significand = if self.is_negative() { -significand } else { significand };
        let inner = DBig::from_parts(significand, exponent - places as isize);
        Self { inner: Self::with_work_precision(inner) }
    }

    fn is_even_integer(&self) -> bool {
        self.to_plain_string()
            .chars()
            .last()
            .and_then(|c| c.to_digit(10))
            .map_or(true, |d| d % 2 == 0)
    }

    /// Number of digits after the decimal point in the exact representation
    pub fn fraction_digits(&self) -> usize {
        let plain = self.to_plain_string();
        plain.split_once('.').map_or(0, |(_, frac)| frac.len())
    }

    // ========== Display ==========

    /// Exact decimal rendering without exponent and without trailing
    /// fractional zeros: "1500", "0.25", "-3.5".
    pub fn to_plain_string(&self) -> String {
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();
        if significand == IBig::ZERO {
            return "0".to_string();
        }

        let negative = significand < IBig::ZERO;
        let digits = if negative { (-significand).to_string() } else { significand.to_string() };

        let body = if exponent >= 0 {
            let mut s = digits;
            s.push_str(&"0".repeat(exponent as usize));
            s
        } else {
            let shift = (-exponent) as usize;
            let padded = if digits.len() <= shift {
                format!("{}{}", "0".repeat(shift - digits.len() + 1), digits)
            } else {
                digits
            };
            let (int_part, frac_part) = padded.split_at(padded.len() - shift);
            let frac_part = frac_part.trim_end_matches('0');
            if frac_part.is_empty() {
                int_part.to_string()
            } else {
                format!("{}.{}", int_part, frac_part)
            }
        };

        if negative && body != "0" {
            format!("-{}", body)
        } else {
            body
        }
    }

    /// Convert to f64 (may lose precision)
    pub fn to_f64(&self) -> Option<f64> {
        // Get the representation: significand * 10^exponent
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();

        let sig_f64: f64 = if significand.bit_len() <= 53 {
            match TryInto::<i64>::try_into(significand.clone()) {
                Ok(i) => i as f64,
                Err(_) => return None,
            }
        } else {
            // Significand too large - shift right to fit in 53 bits
            let extra_bits = significand.bit_len() - 53;
            let shifted = &significand >> extra_bits;
            let shifted_i64: i64 = shifted.try_into().ok()?;
            (shifted_i64 as f64) * 2_f64.powi(extra_bits as i32)
        };

        let result = if exponent == 0 {
            sig_f64
        } else if exponent > 0 && exponent <= 308 {
            sig_f64 * 10_f64.powi(exponent as i32)
        } else if exponent < 0 && exponent >= -340 {
            // Two steps keep subnormal-range values from underflowing early
            let first = (-exponent).min(300) as i32;
            let second = (-exponent) as i32 - first;
            sig_f64 / 10_f64.powi(first) / 10_f64.powi(second)
        } else if exponent < 0 {
            0.0
        } else {
            return None;
        };

        if result.is_finite() {
            Some(result)
        } else {
            None
        }
    }
}

// ========== Trait Implementations ==========

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.partial_cmp(&other.inner).unwrap_or(std::cmp::Ordering::Equal)
    }
}
