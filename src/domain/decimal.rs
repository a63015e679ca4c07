//! Exact decimal values for calculator results.
//!
//! `ExactDecimal` is a scaled big-integer representation: an unscaled
//! magnitude plus the number of fractional digits. It exists so results
//! can be rendered exactly in base 10, with no binary floating-point
//! artifacts and no scientific notation regardless of magnitude.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;

use super::errors::CalcError;

/// Number of fractional digits kept when converting a non-integral
/// float result. Rounding here suppresses binary floating-point noise
/// (`0.1+0.2` must come out as exactly `0.3`).
pub const FLOAT_ROUNDING_DIGITS: usize = 10;

/// An arbitrary-precision base-10 number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactDecimal {
    negative: bool,
    digits: BigUint,
    scale: usize,
}

impl ExactDecimal {
    /// Builds an exact decimal from a big integer, digit for digit.
    pub fn from_bigint(value: BigInt) -> Self {
        let (sign, magnitude) = value.into_parts();
        Self {
            negative: sign == Sign::Minus,
            digits: magnitude,
            scale: 0,
        }
    }

    /// Converts a float result to an exact decimal.
    ///
    /// Integer-valued floats convert without intermediate rounding so
    /// large integer results keep every digit. Fractional values are
    /// rounded to [`FLOAT_ROUNDING_DIGITS`] first; this rounding step is
    /// deliberate and load-bearing, not a convenience.
    pub fn from_f64(value: f64) -> Result<Self, CalcError> {
        if !value.is_finite() {
            return Err(CalcError::Overflow);
        }
        let rendered = if value == value.trunc() {
            format!("{:.0}", value)
        } else {
            format!("{:.*}", FLOAT_ROUNDING_DIGITS, value)
        };
        Self::parse(&rendered).ok_or(CalcError::Overflow)
    }

    /// Parses a plain decimal string (`-123.450`). No exponents.
    pub fn parse(text: &str) -> Option<Self> {
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        let mut all_digits = String::with_capacity(int_part.len() + frac_part.len());
        all_digits.push_str(int_part);
        all_digits.push_str(frac_part);
        let digits = BigUint::parse_bytes(all_digits.as_bytes(), 10)?;
        Some(Self {
            negative,
            digits,
            scale: frac_part.len(),
        })
    }

    /// Removes redundant trailing zeros (`3.00` -> `3`, `0.30` -> `0.3`)
    /// and canonicalizes zero. Normalizing twice is a no-op.
    pub fn normalize(mut self) -> Self {
        if self.digits.is_zero() {
            self.negative = false;
            self.scale = 0;
            return self;
        }
        let ten = BigUint::from(10u32);
        while self.scale > 0 && (&self.digits % &ten).is_zero() {
            self.digits /= &ten;
            self.scale -= 1;
        }
        self
    }

    pub fn is_zero(&self) -> bool {
        self.digits.is_zero()
    }
}

impl std::fmt::Display for ExactDecimal {
    /// Plain positional rendering; never scientific notation.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut digits = self.digits.to_str_radix(10);
        if self.negative && !self.digits.is_zero() {
            f.write_str("-")?;
        }
        if self.scale == 0 {
            return f.write_str(&digits);
        }
        // Pad so there is at least one digit before the point.
        while digits.len() <= self.scale {
            digits.insert(0, '0');
        }
        let split = digits.len() - self.scale;
        write!(f, "{}.{}", &digits[..split], &digits[split..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn test_parse_and_display() {
        let value = ExactDecimal::parse("-123.450").unwrap();
        assert_eq!(value.to_string(), "-123.450");
        assert_eq!(value.normalize().to_string(), "-123.45");
    }

    #[test]
    fn test_from_f64_suppresses_float_noise() {
        let value = ExactDecimal::from_f64(0.1 + 0.2).unwrap();
        assert_eq!(value.normalize().to_string(), "0.3");
    }

    #[test]
    fn test_from_f64_integer_values_are_exact() {
        let value = ExactDecimal::from_f64(1999998.0).unwrap();
        assert_eq!(value.to_string(), "1999998");

        let value = ExactDecimal::from_f64(-4.0).unwrap();
        assert_eq!(value.to_string(), "-4");
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert_eq!(ExactDecimal::from_f64(f64::INFINITY), Err(CalcError::Overflow));
        assert_eq!(ExactDecimal::from_f64(f64::NAN), Err(CalcError::Overflow));
    }

    #[test]
    fn test_large_magnitudes_stay_positional() {
        // 2^100 as a float is integer-valued; rendering must not fall
        // back to exponent notation.
        let value = ExactDecimal::from_f64(2f64.powi(100)).unwrap();
        let text = value.normalize().to_string();
        assert!(!text.contains('e') && !text.contains('E'));
        assert_eq!(text.len(), 31);
        assert!(text.starts_with("126765"));
    }

    #[test]
    fn test_from_bigint_is_digit_exact() {
        let huge = BigInt::parse_bytes(b"123456789012345678901234567890", 10).unwrap();
        let value = ExactDecimal::from_bigint(huge);
        assert_eq!(value.to_string(), "123456789012345678901234567890");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let value = ExactDecimal::parse("0.3000000000").unwrap();
        let once = value.normalize();
        let twice = once.clone().normalize();
        assert_eq!(once, twice);
        assert_eq!(once.to_string(), twice.to_string());
    }

    #[test]
    fn test_zero_canonicalizes() {
        let value = ExactDecimal::parse("-0.000").unwrap().normalize();
        assert!(value.is_zero());
        assert_eq!(value.to_string(), "0");
    }

    #[test]
    fn test_fractional_values_below_one() {
        let value = ExactDecimal::parse("0.5").unwrap();
        assert_eq!(value.to_string(), "0.5");

        let value = ExactDecimal::parse(".25");
        assert_eq!(value.unwrap().to_string(), "0.25");
    }
}
