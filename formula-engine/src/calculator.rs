//! Immutable builder for `numerator / denominator` calculations
//!
//! A [`Calculator`] holds a main (numerator) formula and at most one division
//! (denominator) formula. Once a denominator is open, further `add`,
//! `subtract_by` and `multiply_by` calls extend the denominator. Every builder
//! method returns a new calculator and leaves the receiver usable, so a shared
//! prefix can branch into several independent calculations.
//!
//! ```
//! use common::decimal::{OraclePrice, PositionSize, UsdValue, Usd};
//! use formula_engine::Calculator;
//!
//! let size = PositionSize::from_float(1.5).unwrap();
//! let price = OraclePrice::from_float(45000.0).unwrap();
//!
//! let notional = Calculator::first(&size)
//!     .multiply_by(&price)
//!     .calculate_as::<Usd>()
//!     .unwrap();
//! assert_eq!(notional, UsdValue::from_float(67500.0).unwrap());
//! ```

use common::decimal::{
    checked_div, pow10, DecimalSchema, HeadlessDecimal, Rounding, ScaledValue, Unbranded,
};
use common::error::{Error, FormulaSlot, Result};
use tracing::debug;

use crate::formula::{Formula, Operator};

/// Builder and evaluator for fixed-point formulas of mixed precision
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calculator {
    numerator: Formula,
    denominator: Option<Formula>,
}

impl Calculator {
    /// Create a calculator with an empty numerator
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a calculation from `value`
    pub fn first(value: impl Into<HeadlessDecimal>) -> Self {
        Self {
            numerator: Formula::seeded(value),
            denominator: None,
        }
    }

    /// Build the numerator from a sub-chain that must start with a value and
    /// must not divide
    pub fn in_numerator<F>(build: F) -> Result<Self>
    where
        F: FnOnce(Calculator) -> Result<Calculator>,
    {
        let chain = build(Calculator::new())?;
        if chain.denominator.is_some() {
            return Err(Error::NestedDenominator(FormulaSlot::Numerator));
        }
        if chain.numerator.seed().is_none() {
            return Err(Error::EmptyFormula);
        }
        Ok(Self {
            numerator: chain.numerator,
            denominator: None,
        })
    }

    pub fn numerator(&self) -> &Formula {
        &self.numerator
    }

    pub fn denominator(&self) -> Option<&Formula> {
        self.denominator.as_ref()
    }

    pub fn has_denominator(&self) -> bool {
        self.denominator.is_some()
    }

    /// Seed the open formula; fails if it already holds a value
    pub fn value(&self, value: impl Into<HeadlessDecimal>) -> Result<Self> {
        match &self.denominator {
            Some(denominator) => Ok(Self {
                numerator: self.numerator.clone(),
                denominator: Some(denominator.with_seed(value)?),
            }),
            None => Ok(Self {
                numerator: self.numerator.with_seed(value)?,
                denominator: None,
            }),
        }
    }

    pub fn add(&self, value: impl Into<HeadlessDecimal>) -> Self {
        self.append(Operator::Add, value)
    }

    pub fn subtract_by(&self, value: impl Into<HeadlessDecimal>) -> Self {
        self.append(Operator::Sub, value)
    }

    pub fn multiply_by(&self, value: impl Into<HeadlessDecimal>) -> Self {
        self.append(Operator::Mul, value)
    }

    /// Open the denominator, seeded with `value`
    pub fn divide_by(&self, value: impl Into<HeadlessDecimal>) -> Result<Self> {
        self.check_denominator_allowed()?;
        Ok(Self {
            numerator: self.numerator.clone(),
            denominator: Some(Formula::seeded(value)),
        })
    }

    /// Open the denominator with a sub-chain built from a fresh calculator.
    ///
    /// The sub-chain may add, subtract and multiply but not divide, and it
    /// must start with a value.
    pub fn in_denominator<F>(&self, build: F) -> Result<Self>
    where
        F: FnOnce(Calculator) -> Result<Calculator>,
    {
        self.check_denominator_allowed()?;
        let chain = build(Calculator::new())?;
        if chain.denominator.is_some() {
            return Err(Error::NestedDenominator(FormulaSlot::Denominator));
        }
        if chain.numerator.seed().is_none() {
            return Err(Error::EmptyFormula);
        }
        Ok(Self {
            numerator: self.numerator.clone(),
            denominator: Some(chain.numerator),
        })
    }

    /// Evaluate without a target schema.
    ///
    /// A fraction is divided after pre-scaling the numerator by twice the
    /// denominator precision, giving a quotient at precision
    /// `numerator + denominator` truncated toward zero.
    pub fn evaluate(&self) -> Result<HeadlessDecimal> {
        let numerator = self.numerator.evaluate()?;
        let denominator = match &self.denominator {
            Some(formula) => formula.evaluate()?,
            None => return Ok(numerator),
        };

        let scale_factor = denominator.precision() * 2;
        let scaled = numerator.magnitude() * pow10(scale_factor);
        let magnitude = checked_div(&scaled, denominator.magnitude(), Rounding::TowardZero)?;
        Ok(HeadlessDecimal::new(
            magnitude,
            numerator.precision() + denominator.precision(),
        ))
    }

    /// Evaluate into the default six-digit unbranded schema
    pub fn calculate(&self) -> Result<ScaledValue<Unbranded>> {
        self.calculate_as::<Unbranded>()
    }

    /// Evaluate into schema `U`, truncating toward zero
    pub fn calculate_as<U: DecimalSchema>(&self) -> Result<ScaledValue<U>> {
        self.calculate_with::<U>(Rounding::TowardZero)
    }

    /// Evaluate into schema `U` with an explicit rounding policy
    pub fn calculate_with<U: DecimalSchema>(&self, rounding: Rounding) -> Result<ScaledValue<U>> {
        let result = self.calculate_headless(U::PRECISION, rounding)?;
        Ok(ScaledValue::from_bigint(result.into_parts().0))
    }

    /// Evaluate to `precision` digits.
    ///
    /// A fraction is computed in a single division,
    /// `N * 10^(Dp + precision) / (D * 10^Np)`, so the only digits lost are
    /// the ones `rounding` discards at the target precision.
    pub fn calculate_headless(&self, precision: u32, rounding: Rounding) -> Result<HeadlessDecimal> {
        let numerator = self.numerator.evaluate()?;
        let result = match &self.denominator {
            None => numerator.rescale_with(precision, rounding),
            Some(formula) => {
                let denominator = formula.evaluate()?;
                let dividend = numerator.magnitude() * pow10(denominator.precision() + precision);
                let divisor = denominator.magnitude() * pow10(numerator.precision());
                HeadlessDecimal::new(checked_div(&dividend, &divisor, rounding)?, precision)
            }
        };

        debug!(
            "Calculated {} at precision {} ({:?})",
            result, precision, rounding
        );
        Ok(result)
    }

    fn append(&self, operator: Operator, value: impl Into<HeadlessDecimal>) -> Self {
        match &self.denominator {
            Some(denominator) => Self {
                numerator: self.numerator.clone(),
                denominator: Some(denominator.push(operator, value)),
            },
            None => Self {
                numerator: self.numerator.push(operator, value),
                denominator: None,
            },
        }
    }

    fn check_denominator_allowed(&self) -> Result<()> {
        if self.numerator.seed().is_none() {
            return Err(Error::DenominatorBeforeNumerator);
        }
        if self.denominator.is_some() {
            return Err(Error::ConsecutiveDenominator);
        }
        Ok(())
    }
}
