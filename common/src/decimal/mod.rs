//! Fixed-point decimal values for precise financial calculations
//!
//! A [`ScaledValue`] stores a signed integer magnitude equal to
//! `true_value * 10^precision`. The precision and the unit brand come from a
//! zero-sized [`DecimalSchema`] marker, so two schemas with the same precision
//! but different units cannot be mixed by accident.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::Zero;
use rust_decimal::Decimal;
use tracing::trace;

use crate::error::{Error, Result};

mod headless;
mod rounding;
pub(crate) mod serde_impl;
pub mod units;

pub use headless::HeadlessDecimal;
pub use rounding::{checked_div, pow10, Rounding};
pub use units::*;

/// Largest scale a `rust_decimal::Decimal` can carry
const MAX_DECIMAL_SCALE: u32 = 28;

/// A declared `(precision, unit)` contract shared by every value of a schema.
///
/// Implement it with [`decimal_schema!`](crate::decimal_schema).
pub trait DecimalSchema:
    fmt::Debug + Clone + Copy + Default + PartialEq + Eq + PartialOrd + Ord + Hash + Send + Sync + 'static
{
    /// Number of implied fractional digits
    const PRECISION: u32;
    /// Unit name used in diagnostics
    const NAME: &'static str;
}

/// Declare a zero-sized schema marker with a fixed precision.
///
/// ```
/// common::decimal_schema!(
///     /// Basis points
///     pub Bps => 4
/// );
/// assert_eq!(<Bps as common::DecimalSchema>::PRECISION, 4);
/// ```
#[macro_export]
macro_rules! decimal_schema {
    ($(#[$meta:meta])* $vis:vis $name:ident => $precision:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $name;

        impl $crate::decimal::DecimalSchema for $name {
            const PRECISION: u32 = $precision;
            const NAME: &'static str = stringify!($name);
        }
    };
}

/// A value bound to schema `U`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScaledValue<U: DecimalSchema> {
    magnitude: BigInt,
    unit: PhantomData<U>,
}

impl<U: DecimalSchema> ScaledValue<U> {
    /// Wrap a magnitude already expressed at `U::PRECISION`
    pub fn from_bigint(magnitude: impl Into<BigInt>) -> Self {
        Self {
            magnitude: magnitude.into(),
            unit: PhantomData,
        }
    }

    /// Parse an integer string already expressed at `U::PRECISION`
    pub fn from_bigint_string(magnitude: &str) -> Result<Self> {
        let magnitude = BigInt::from_str(magnitude.trim())
            .map_err(|_| Error::InvalidDecimal(magnitude.to_string()))?;
        Ok(Self::from_bigint(magnitude))
    }

    /// Parse a plain decimal such as `"-12.5"`.
    ///
    /// Fractional digits are padded up to the schema precision. A literal with
    /// more fractional digits than the schema allows is rejected rather than
    /// truncated.
    pub fn from_decimal_string(literal: &str) -> Result<Self> {
        let value: HeadlessDecimal = literal.parse()?;
        if value.precision() > U::PRECISION {
            return Err(Error::ExcessPrecision {
                literal: literal.trim().to_string(),
                digits: value.precision(),
                schema: U::NAME,
                precision: U::PRECISION,
            });
        }
        Ok(value.bind())
    }

    /// Scale a float to `U::PRECISION`, rounding half away from zero.
    ///
    /// Rounding starts from the shortest decimal text that round-trips to `x`,
    /// so `0.0001` scales exactly instead of through its binary neighbour.
    pub fn from_float(x: f64) -> Result<Self> {
        if !x.is_finite() {
            return Err(Error::NonFiniteFloat(x));
        }
        let value: HeadlessDecimal = x.to_string().parse()?;
        if value.precision() > U::PRECISION {
            trace!("Rounding float {} to {} digits for {}", x, U::PRECISION, U::NAME);
        }
        Ok(value.bind_with(Rounding::HalfAwayFromZero))
    }

    /// Convert a `rust_decimal::Decimal`, truncating digits beyond the schema
    pub fn from_decimal(decimal: Decimal) -> Self {
        HeadlessDecimal::new(decimal.mantissa(), decimal.scale()).bind()
    }

    pub fn zero() -> Self {
        Self::from_bigint(BigInt::zero())
    }

    pub fn magnitude(&self) -> &BigInt {
        &self.magnitude
    }

    pub fn precision(&self) -> u32 {
        U::PRECISION
    }

    pub fn unit_name(&self) -> &'static str {
        U::NAME
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    /// The unscaled magnitude
    pub fn to_bigint(&self) -> BigInt {
        self.magnitude.clone()
    }

    /// The unscaled magnitude as an integer string
    pub fn to_bigint_string(&self) -> String {
        self.magnitude.to_string()
    }

    /// Plain decimal text with trailing fractional zeros removed
    pub fn to_decimal_string(&self) -> String {
        self.headless().to_decimal_string()
    }

    /// Approximate floating point value; not for settlement
    pub fn to_float(&self) -> f64 {
        self.headless().to_float()
    }

    /// Convert to a `rust_decimal::Decimal`.
    ///
    /// Schemas finer than 28 digits are truncated to fit; magnitudes beyond
    /// 96 bits fail.
    pub fn to_decimal(&self) -> Result<Decimal> {
        if U::PRECISION > MAX_DECIMAL_SCALE {
            trace!("Truncating {} value to {} digits for Decimal", U::NAME, MAX_DECIMAL_SCALE);
        }
        let headless = self.headless().rescale(U::PRECISION.min(MAX_DECIMAL_SCALE));
        let (magnitude, scale) = headless.into_parts();
        let mantissa = i128::try_from(&magnitude)
            .map_err(|_| Error::DecimalError(format!("{} does not fit a Decimal", magnitude)))?;
        Ok(Decimal::try_from_i128_with_scale(mantissa, scale)?)
    }

    /// Rescale into schema `V`: exact when widening, truncating toward zero
    /// when narrowing
    pub fn adjust_to<V: DecimalSchema>(&self) -> ScaledValue<V> {
        self.adjust_to_with(Rounding::TowardZero)
    }

    /// Rescale into schema `V` with an explicit rounding policy
    pub fn adjust_to_with<V: DecimalSchema>(&self, rounding: Rounding) -> ScaledValue<V> {
        self.headless().bind_with(rounding)
    }

    /// Drop the schema, keeping magnitude and precision
    pub fn headless(&self) -> HeadlessDecimal {
        HeadlessDecimal::new(self.magnitude.clone(), U::PRECISION)
    }

    pub fn into_headless(self) -> HeadlessDecimal {
        HeadlessDecimal::new(self.magnitude, U::PRECISION)
    }
}

impl<U: DecimalSchema> Default for ScaledValue<U> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<U: DecimalSchema> fmt::Display for ScaledValue<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal_string())
    }
}

impl<U: DecimalSchema> FromStr for ScaledValue<U> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_decimal_string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    crate::decimal_schema!(Two => 2);
    crate::decimal_schema!(Four => 4);
    crate::decimal_schema!(OtherFour => 4);

    #[test]
    fn test_from_float_scales_and_rounds() {
        assert_eq!(ScaledValue::<Four>::from_float(1.5).unwrap().to_bigint_string(), "15000");
        assert_eq!(ScaledValue::<Two>::from_float(0.125).unwrap().to_bigint_string(), "13");
        assert_eq!(ScaledValue::<Two>::from_float(-0.125).unwrap().to_bigint_string(), "-13");
        assert_eq!(ScaledValue::<Two>::from_float(0.0001).unwrap().to_bigint_string(), "0");
    }

    #[test]
    fn test_from_float_rejects_non_finite() {
        assert!(matches!(ScaledValue::<Two>::from_float(f64::NAN), Err(Error::NonFiniteFloat(_))));
        assert!(ScaledValue::<Two>::from_float(f64::INFINITY).is_err());
    }

    #[test]
    fn test_from_decimal_string_pads_fraction() {
        let value = ScaledValue::<Four>::from_decimal_string("12.5").unwrap();
        assert_eq!(value.to_bigint_string(), "125000");

        let value = ScaledValue::<Four>::from_decimal_string("-0.0001").unwrap();
        assert_eq!(value.to_bigint_string(), "-1");
    }

    #[test]
    fn test_from_decimal_string_rejects_excess_precision() {
        let err = ScaledValue::<Two>::from_decimal_string("1.234").unwrap_err();
        match err {
            Error::ExcessPrecision { digits, precision, schema, .. } => {
                assert_eq!(digits, 3);
                assert_eq!(precision, 2);
                assert_eq!(schema, "Two");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_adjust_to_same_precision_is_identity() {
        let value = ScaledValue::<Four>::from_bigint(123_456);
        assert_eq!(value.adjust_to::<Four>(), value);
        assert_eq!(value.adjust_to::<OtherFour>().magnitude(), value.magnitude());
    }

    #[test]
    fn test_decimal_interop() {
        let value = ScaledValue::<Four>::from_decimal(dec!(12.34567));
        assert_eq!(value.to_bigint_string(), "123456");
        assert_eq!(value.to_decimal().unwrap(), dec!(12.3456));
    }
}
