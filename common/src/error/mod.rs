//! Error types for the decimal engine
//!
//! This module provides the single error type shared by the value layer, the
//! formula engine and the command-line front end. Builder grammar violations
//! and numeric failures are all reported through it.

use std::fmt::{self, Display};
use thiserror::Error;

/// The formula slot a nested division was attempted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaSlot {
    /// The main (numerator) formula
    Numerator,
    /// The division (denominator) formula
    Denominator,
}

impl Display for FormulaSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaSlot::Numerator => write!(f, "Numerator"),
            FormulaSlot::Denominator => write!(f, "Denominator"),
        }
    }
}

/// Decimal engine error type
#[derive(Debug, Error)]
pub enum Error {
    /// A seed value was supplied to a formula that already has one
    #[error("Cannot initialize a populated formula")]
    FormulaAlreadyPopulated,

    /// A denominator was opened while the numerator is still empty
    #[error("Denominator cannot be invoked before numerator")]
    DenominatorBeforeNumerator,

    /// A second denominator was opened on the same calculator
    #[error("Illegal consecutive denominator invocation")]
    ConsecutiveDenominator,

    /// A sub-formula built for a numerator or denominator slot divides
    #[error("{0} formula cannot have nested denominator formulas")]
    NestedDenominator(FormulaSlot),

    /// A formula without a seed value was evaluated
    #[error("Cannot evaluate an empty formula")]
    EmptyFormula,

    /// A division step or a denominator evaluated to zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Text that is not a plain decimal or integer literal
    #[error("Invalid decimal: {0}")]
    InvalidDecimal(String),

    /// A decimal literal carries more fractional digits than its schema allows
    #[error("Decimal {literal} has {digits} fractional digits, schema {schema} allows {precision}")]
    ExcessPrecision {
        /// The offending literal
        literal: String,
        /// Fractional digits found in the literal
        digits: u32,
        /// Schema name
        schema: &'static str,
        /// Schema precision
        precision: u32,
    },

    /// An argument list that does not follow `value (operator value)*`
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    /// NaN or an infinity was passed to a float factory
    #[error("Cannot scale non-finite float: {0}")]
    NonFiniteFloat(f64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Decimal conversion error
    #[error("Decimal conversion error: {0}")]
    DecimalError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait to add context to error results
pub trait ErrorExt<T> {
    /// Add context information to an error
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T> ErrorExt<T> for Result<T> {
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        self.map_err(|e| {
            let context = context_fn().to_string();
            match e {
                Error::InvalidDecimal(msg) => Error::InvalidDecimal(format!("{}: {}", context, msg)),
                Error::InvalidExpression(msg) => Error::InvalidExpression(format!("{}: {}", context, msg)),
                Error::ConfigurationError(msg) => Error::ConfigurationError(format!("{}: {}", context, msg)),
                Error::DecimalError(msg) => Error::DecimalError(format!("{}: {}", context, msg)),
                // Grammar and arithmetic errors keep their fixed messages
                other => other,
            }
        })
    }
}

/// From rust_decimal::Error
impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::DecimalError(err.to_string())
    }
}
