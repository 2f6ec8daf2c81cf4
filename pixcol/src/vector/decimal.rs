/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

use super::DEFAULT_SIZE;
use super::VectorBuffer;
use super::impl_vector_buffer;
use crate::ColumnType;
use crate::Error;
use crate::Result;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::FromPrimitive;
use std::str::FromStr;

const DECIMAL_ALIGNMENT: usize = 32;

/// Short decimals stored as unscaled 64-bit integers.
///
/// The unscaled value of `3.14` in a `decimal(3,2)` column is `314`. Only precisions up
/// to 18 are supported, so every unscaled value fits into an `i64`.
#[derive(Debug)]
pub struct DecimalColumnVector {
    buffer: VectorBuffer<i64>,
    precision: u8,
    scale: u8,
}

impl DecimalColumnVector {
    pub fn new(capacity: usize, precision: u8, scale: u8) -> Result<Self> {
        ColumnType::decimal(precision, scale)?;
        Ok(Self {
            buffer: VectorBuffer::new(capacity, DECIMAL_ALIGNMENT)?,
            precision,
            scale,
        })
    }

    pub fn with_default_size(precision: u8, scale: u8) -> Result<Self> {
        Self::new(DEFAULT_SIZE, precision, scale)
    }

    /// Vector that allocates its value storage only on the first write
    pub fn detached(capacity: usize, precision: u8, scale: u8) -> Result<Self> {
        ColumnType::decimal(precision, scale)?;
        Ok(Self {
            buffer: VectorBuffer::detached(capacity, DECIMAL_ALIGNMENT),
            precision,
            scale,
        })
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::Decimal {
            precision: self.precision,
            scale: self.scale,
        }
    }

    /// Parse a decimal, round it half-up to the column scale and append the unscaled value
    pub fn add_str(&mut self, value: &str) -> Result<()> {
        let malformed = || Error::Format {
            kind: "decimal",
            input: value.to_string(),
            expected: "a decimal number",
        };
        let (negative, integer, fraction) = split_decimal(value.trim()).ok_or_else(malformed)?;

        let integer = integer.trim_start_matches('0');
        if integer.len() > usize::from(self.precision - self.scale) {
            return Err(self.precision_exceeded(value));
        }
        // digits past scale + 1 never change a half-up rounding at scale
        let fraction = &fraction[..fraction.len().min(usize::from(self.scale) + 1)];

        let literal = format!(
            "{}{}.{}",
            if negative { "-" } else { "" },
            if integer.is_empty() { "0" } else { integer },
            if fraction.is_empty() { "0" } else { fraction },
        );
        let decimal = Decimal::from_str(&literal).map_err(|_| malformed())?;
        let unscaled = self.unscale(decimal, value)?;
        self.buffer.push(unscaled)
    }

    /// Append a double through the same rounding and precision check as [`add_str`](Self::add_str)
    pub fn add_f64(&mut self, value: f64) -> Result<()> {
        let decimal = Decimal::from_f64(value).ok_or_else(|| Error::Conversion {
            input: value.to_string(),
            reason: "not representable as a decimal",
        })?;
        let unscaled = self.unscale(decimal, &value.to_string())?;
        self.buffer.push(unscaled)
    }

    /// Append a value that is already scaled by `10^scale`
    pub fn add_unscaled(&mut self, unscaled: i64) -> Result<()> {
        self.buffer.push(unscaled)
    }

    pub fn set_unscaled(&mut self, index: usize, unscaled: i64) -> Result<()> {
        self.buffer.set(index, unscaled)
    }

    pub fn format(&self, index: usize) -> Option<String> {
        if *self.is_null().get(index)? {
            return None;
        }
        let unscaled = self.buffer.value(index)?;
        Some(Decimal::new(unscaled, u32::from(self.scale)).to_string())
    }

    fn precision_exceeded(&self, input: &str) -> Error {
        Error::PrecisionExceeded {
            value: input.to_string(),
            precision: self.precision,
        }
    }

    fn unscale(&self, decimal: Decimal, input: &str) -> Result<i64> {
        let scale = u32::from(self.scale);
        let mut rounded =
            decimal.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(scale);
        if rounded.scale() != scale {
            return Err(self.precision_exceeded(input));
        }

        let mantissa = rounded.mantissa();
        if digit_count(mantissa) > u32::from(self.precision) {
            return Err(self.precision_exceeded(input));
        }
        i64::try_from(mantissa).map_err(|_| self.precision_exceeded(input))
    }
}

impl_vector_buffer!(DecimalColumnVector, i64, Decimal);

/// Split `[+-]digits[.digits]` into its sign, integer digits and fraction digits
fn split_decimal(text: &str) -> Option<(bool, &str, &str)> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let all_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction)
    {
        return None;
    }
    Some((negative, integer, fraction))
}

/// Decimal digits of the unscaled value; zero has one digit
fn digit_count(value: i128) -> u32 {
    value.unsigned_abs().checked_ilog10().map_or(1, |log| log + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling() {
        let mut vector = DecimalColumnVector::new(4, 5, 2).unwrap();
        vector.add_str("3.14").unwrap();
        vector.add_str("3").unwrap();
        vector.add_str("-3.145").unwrap();
        vector.add_str("0.004").unwrap();
        vector.add_str("999.994").unwrap();

        assert_eq!(vector.values(), &[314, 300, -315, 0, 99_999]);
        assert_eq!(vector.format(2).as_deref(), Some("-3.15"));
    }

    #[test]
    fn test_precision_exceeded() {
        let mut vector = DecimalColumnVector::new(4, 5, 2).unwrap();
        assert!(matches!(
            vector.add_str("999.999"),
            Err(Error::PrecisionExceeded { precision: 5, .. })
        ));
        assert!(matches!(
            vector.add_str("12345.6"),
            Err(Error::PrecisionExceeded { .. })
        ));
        assert!(vector.is_empty());
    }

    #[test]
    fn test_long_fraction_rounds_once() {
        let mut vector = DecimalColumnVector::new(4, 5, 2).unwrap();
        vector.add_str("0.00499999999999999999999999999999").unwrap();
        vector.add_str("1.00499999999999999999999999999999").unwrap();
        vector.add_str("-1.00500000000000000000000000000001").unwrap();
        vector.add_str("+.5").unwrap();
        vector.add_str("007.").unwrap();

        assert_eq!(vector.values(), &[0, 100, -101, 50, 700]);
    }

    #[test]
    fn test_huge_integer_part_exceeds_precision() {
        let mut vector = DecimalColumnVector::new(4, 5, 2).unwrap();
        assert!(matches!(
            vector.add_str("123456789012345678901234567890"),
            Err(Error::PrecisionExceeded { precision: 5, .. })
        ));
        assert!(matches!(
            vector.add_str("-12345678901234567890.5"),
            Err(Error::PrecisionExceeded { .. })
        ));
        vector.add_str("000000000000000000000000000000123.45").unwrap();
        assert_eq!(vector.values(), &[12_345]);
    }

    #[test]
    fn test_malformed_decimal() {
        let mut vector = DecimalColumnVector::new(4, 10, 2).unwrap();
        for input in ["3,14", "abc", "", ".", "-", "1.2.3", "1e2", "--1", "1_000"] {
            assert!(
                matches!(vector.add_str(input), Err(Error::Format { .. })),
                "{input:?} should be rejected"
            );
        }
        assert!(vector.is_empty());
    }

    #[test]
    fn test_detached_vector() {
        let mut vector = DecimalColumnVector::detached(8, 5, 2).unwrap();
        assert!(vector.current().is_none());
        assert!(DecimalColumnVector::detached(8, 19, 2).is_err());

        vector.add_str("1.5").unwrap();
        assert_eq!(vector.current(), Some(&[150][..]));
    }

    #[test]
    fn test_add_f64_and_unscaled() {
        let mut vector = DecimalColumnVector::new(2, 10, 2).unwrap();
        vector.add_f64(2.5).unwrap();
        vector.add_f64(-0.125).unwrap();
        vector.add_unscaled(42).unwrap();
        assert_eq!(vector.values(), &[250, -13, 42]);

        vector.set_unscaled(0, 7).unwrap();
        assert_eq!(vector.values(), &[7, -13, 42]);
        assert_eq!(vector.format(2).as_deref(), Some("0.42"));
    }

    #[test]
    fn test_invalid_decimal_type() {
        assert!(matches!(
            DecimalColumnVector::new(4, 19, 2),
            Err(Error::InvalidDecimal { .. })
        ));
        assert!(matches!(
            DecimalColumnVector::new(4, 3, 4),
            Err(Error::InvalidDecimal { .. })
        ));
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(-10), 2);
        assert_eq!(digit_count(99_999), 5);
        assert_eq!(digit_count(100_000), 6);
    }
}
