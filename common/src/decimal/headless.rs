//! Magnitude/precision pairs that are not bound to any schema

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use super::rounding::{div_rounded, pow10, Rounding};
use super::{DecimalSchema, ScaledValue};
use crate::error::{Error, Result};

/// A fixed-point number representing `magnitude / 10^precision`.
///
/// Formula evaluation produces these; binding one to a schema turns it into a
/// [`ScaledValue`]. Equality is structural: `1.0` at precision 1 and `1.00` at
/// precision 2 are different headless decimals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeadlessDecimal {
    #[serde(with = "crate::decimal::serde_impl::bigint_string")]
    magnitude: BigInt,
    precision: u32,
}

impl HeadlessDecimal {
    /// Create a headless decimal from a raw magnitude and its precision
    pub fn new(magnitude: impl Into<BigInt>, precision: u32) -> Self {
        Self {
            magnitude: magnitude.into(),
            precision,
        }
    }

    /// Zero at the given precision
    pub fn zero(precision: u32) -> Self {
        Self::new(BigInt::zero(), precision)
    }

    /// The signed integer encoding of `value * 10^precision`
    pub fn magnitude(&self) -> &BigInt {
        &self.magnitude
    }

    /// Number of implied fractional digits
    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    pub fn into_parts(self) -> (BigInt, u32) {
        (self.magnitude, self.precision)
    }

    /// Rescale to `precision`, truncating toward zero when narrowing
    pub fn rescale(&self, precision: u32) -> Self {
        self.rescale_with(precision, Rounding::TowardZero)
    }

    /// Rescale to `precision` with an explicit rounding policy.
    ///
    /// Widening multiplies by a power of ten and is always exact.
    pub fn rescale_with(&self, precision: u32, rounding: Rounding) -> Self {
        let magnitude = if precision == self.precision {
            self.magnitude.clone()
        } else if precision < self.precision {
            let divisor = pow10(self.precision - precision);
            div_rounded(&self.magnitude, &divisor, rounding)
        } else {
            &self.magnitude * pow10(precision - self.precision)
        };
        Self { magnitude, precision }
    }

    /// Bind to schema `U`, truncating toward zero when narrowing
    pub fn bind<U: DecimalSchema>(&self) -> ScaledValue<U> {
        self.bind_with(Rounding::TowardZero)
    }

    /// Bind to schema `U` with an explicit rounding policy
    pub fn bind_with<U: DecimalSchema>(&self, rounding: Rounding) -> ScaledValue<U> {
        let rescaled = self.rescale_with(U::PRECISION, rounding);
        ScaledValue::from_bigint(rescaled.magnitude)
    }

    /// Render as a plain decimal with trailing fractional zeros removed
    pub fn to_decimal_string(&self) -> String {
        let digits = self.magnitude.abs().to_string();
        let precision = self.precision as usize;

        let padded = if digits.len() < precision + 1 {
            format!("{}{}", "0".repeat(precision + 1 - digits.len()), digits)
        } else {
            digits
        };

        let (integer, fraction) = padded.split_at(padded.len() - precision);
        let fraction = fraction.trim_end_matches('0');
        let sign = if self.magnitude.is_negative() { "-" } else { "" };

        if fraction.is_empty() {
            format!("{}{}", sign, integer)
        } else {
            format!("{}{}.{}", sign, integer, fraction)
        }
    }

    /// Approximate floating point value; not for settlement
    pub fn to_float(&self) -> f64 {
        self.to_decimal_string().parse().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for HeadlessDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal_string())
    }
}

/// Parses `[+-]digits[.digits]`; the precision is the number of fractional
/// digits written
impl FromStr for HeadlessDecimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (magnitude, precision) = parse_decimal_literal(s)?;
        Ok(Self::new(magnitude, precision))
    }
}

impl<U: DecimalSchema> From<ScaledValue<U>> for HeadlessDecimal {
    fn from(value: ScaledValue<U>) -> Self {
        value.into_headless()
    }
}

impl<U: DecimalSchema> From<&ScaledValue<U>> for HeadlessDecimal {
    fn from(value: &ScaledValue<U>) -> Self {
        value.headless()
    }
}

impl From<&HeadlessDecimal> for HeadlessDecimal {
    fn from(value: &HeadlessDecimal) -> Self {
        value.clone()
    }
}

/// Split a plain decimal literal into its digits and fractional digit count
pub(crate) fn parse_decimal_literal(literal: &str) -> Result<(BigInt, u32)> {
    let invalid = || Error::InvalidDecimal(literal.to_string());
    let trimmed = literal.trim();

    let (negative, body) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (integer, fraction) = body.split_once('.').unwrap_or((body, ""));
    if integer.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(integer) || !is_digits(fraction) {
        return Err(invalid());
    }

    let digits = format!("{}{}", integer, fraction);
    let unsigned = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
    let magnitude = if negative { -unsigned } else { unsigned };
    let precision = u32::try_from(fraction.len()).map_err(|_| invalid())?;

    Ok((magnitude, precision))
}
