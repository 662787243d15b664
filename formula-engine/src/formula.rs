//! Left-to-right folding of value/operator chains

use std::fmt;

use common::decimal::{checked_div, pow10, HeadlessDecimal, Rounding};
use common::error::{Error, Result};
use im::Vector;
use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Arithmetic operator joining two values in a formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
        };
        write!(f, "{}", symbol)
    }
}

/// One `(operator, value)` pair following the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub operator: Operator,
    pub operand: HeadlessDecimal,
}

/// An append-only chain `seed (op value)*`.
///
/// Steps live in a persistent vector, so cloning a formula and appending to
/// the clone is cheap and leaves the original untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formula {
    seed: Option<HeadlessDecimal>,
    steps: Vector<Step>,
}

impl Formula {
    /// Create an empty formula
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formula holding only `seed`
    pub fn seeded(seed: impl Into<HeadlessDecimal>) -> Self {
        Self {
            seed: Some(seed.into()),
            steps: Vector::new(),
        }
    }

    pub fn seed(&self) -> Option<&HeadlessDecimal> {
        self.seed.as_ref()
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    /// True when neither a seed nor any step was added
    pub fn is_empty(&self) -> bool {
        self.seed.is_none() && self.steps.is_empty()
    }

    /// Number of values in the chain
    pub fn len(&self) -> usize {
        usize::from(self.seed.is_some()) + self.steps.len()
    }

    pub fn has_division(&self) -> bool {
        self.steps.iter().any(|step| step.operator == Operator::Div)
    }

    /// Return a copy seeded with `value`; fails if this formula is populated
    pub fn with_seed(&self, value: impl Into<HeadlessDecimal>) -> Result<Self> {
        if !self.is_empty() {
            return Err(Error::FormulaAlreadyPopulated);
        }
        Ok(Self::seeded(value))
    }

    /// Return a copy with `(operator, operand)` appended
    pub fn push(&self, operator: Operator, operand: impl Into<HeadlessDecimal>) -> Self {
        let mut next = self.clone();
        next.steps.push_back(Step {
            operator,
            operand: operand.into(),
        });
        next
    }

    /// Fold the chain left to right with no operator precedence.
    ///
    /// Addition and subtraction widen to the larger precision and never lose
    /// digits. Multiplication adds precisions. Division subtracts precisions
    /// and truncates the quotient toward zero.
    pub fn evaluate(&self) -> Result<HeadlessDecimal> {
        let seed = self.seed.as_ref().ok_or(Error::EmptyFormula)?;
        let mut accumulator = Accumulator::new(seed);

        for step in self.steps.iter() {
            trace!("Folding {} {}", step.operator, step.operand);
            accumulator.apply(step)?;
        }

        let result = accumulator.finish()?;
        debug!("Evaluated formula of {} values to {}", self.len(), result);
        Ok(result)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.seed {
            Some(seed) => write!(f, "{}", seed)?,
            None => write!(f, "_")?,
        }
        for step in self.steps.iter() {
            write!(f, " {} {}", step.operator, step.operand)?;
        }
        Ok(())
    }
}

/// Running `(magnitude, exponent)` of a fold. The exponent goes negative when
/// a divisor is more precise than the running value.
struct Accumulator {
    magnitude: BigInt,
    exponent: i64,
}

impl Accumulator {
    fn new(seed: &HeadlessDecimal) -> Self {
        Self {
            magnitude: seed.magnitude().clone(),
            exponent: i64::from(seed.precision()),
        }
    }

    fn apply(&mut self, step: &Step) -> Result<()> {
        let operand = &step.operand;
        let precision = i64::from(operand.precision());

        match step.operator {
            Operator::Add | Operator::Sub => {
                let target = self.exponent.max(precision);
                let left = scale_up(&self.magnitude, target - self.exponent)?;
                let right = scale_up(operand.magnitude(), target - precision)?;
                self.magnitude = if step.operator == Operator::Add {
                    left + right
                } else {
                    left - right
                };
                self.exponent = target;
            }
            Operator::Mul => {
                self.magnitude = &self.magnitude * operand.magnitude();
                self.exponent += precision;
            }
            Operator::Div => {
                self.magnitude =
                    checked_div(&self.magnitude, operand.magnitude(), Rounding::TowardZero)?;
                self.exponent -= precision;
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<HeadlessDecimal> {
        if self.exponent < 0 {
            let magnitude = scale_up(&self.magnitude, -self.exponent)?;
            return Ok(HeadlessDecimal::new(magnitude, 0));
        }
        let precision = u32::try_from(self.exponent).map_err(|_| exponent_overflow(self.exponent))?;
        Ok(HeadlessDecimal::new(self.magnitude, precision))
    }
}

fn scale_up(magnitude: &BigInt, by: i64) -> Result<BigInt> {
    if by == 0 || magnitude.is_zero() {
        return Ok(magnitude.clone());
    }
    let by = u32::try_from(by).map_err(|_| exponent_overflow(by))?;
    Ok(magnitude * pow10(by))
}

fn exponent_overflow(exponent: i64) -> Error {
    Error::DecimalError(format!("Decimal exponent {} out of range", exponent))
}
