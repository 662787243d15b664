//! Rounding policy applied whenever a magnitude loses fractional digits

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How digits are discarded when a value is narrowed to a lower precision.
///
/// `TowardZero` is the engine default: narrowing rescales and division steps
/// drop the remainder silently. The midpoint modes are opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Truncate, discarding the remainder
    #[default]
    TowardZero,
    /// Round to nearest, ties away from zero
    HalfAwayFromZero,
    /// Round to nearest, ties to the even neighbour
    HalfEven,
}

impl std::str::FromStr for Rounding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "toward_zero" | "truncate" | "down" => Ok(Rounding::TowardZero),
            "half_away_from_zero" | "half_up" => Ok(Rounding::HalfAwayFromZero),
            "half_even" | "bankers" => Ok(Rounding::HalfEven),
            other => Err(Error::ConfigurationError(format!("Unknown rounding mode: {}", other))),
        }
    }
}

/// `10^exponent` as a big integer
pub fn pow10(exponent: u32) -> BigInt {
    BigInt::from(10u32).pow(exponent)
}

/// Divide `numerator` by a non-zero `divisor`, rounding the quotient.
///
/// Callers check the divisor; `BigInt` division by zero panics.
pub(crate) fn div_rounded(numerator: &BigInt, divisor: &BigInt, rounding: Rounding) -> BigInt {
    let quotient = numerator / divisor;
    let remainder = numerator % divisor;
    if remainder.is_zero() {
        return quotient;
    }

    let away_from_zero = match rounding {
        Rounding::TowardZero => false,
        Rounding::HalfAwayFromZero | Rounding::HalfEven => {
            let twice_remainder = remainder.abs() * 2u32;
            match twice_remainder.cmp(&divisor.abs()) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => {
                    rounding == Rounding::HalfAwayFromZero || !(&quotient % 2u32).is_zero()
                }
            }
        }
    };

    if !away_from_zero {
        quotient
    } else if numerator.is_negative() != divisor.is_negative() {
        quotient - 1u32
    } else {
        quotient + 1u32
    }
}

/// Divide a signed big integer, failing on a zero divisor
pub fn checked_div(numerator: &BigInt, divisor: &BigInt, rounding: Rounding) -> Result<BigInt> {
    if divisor.is_zero() {
        return Err(Error::DivisionByZero);
    }
    Ok(div_rounded(numerator, divisor, rounding))
}
