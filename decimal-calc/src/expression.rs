//! Argument-level expression grammar
//!
//! An expression is `VALUE (OP VALUE)*`. A value is a plain decimal with an
//! optional `@precision` suffix; without it the precision is the number of
//! fractional digits written. Operators are `add`/`+`, `sub`/`-`,
//! `mul`/`x`/`*` and `div`/`/`. The first `div` opens the denominator and every
//! later operator extends it, so `10 div 2 add 3` is `10 / (2 + 3)`.

use common::decimal::HeadlessDecimal;
use common::error::{Error, ErrorExt, Result};
use formula_engine::{Calculator, Operator};
use serde::Serialize;
use tracing::debug;

use crate::config::CalcConfig;

/// A result as printed by the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub magnitude: String,
    pub precision: u32,
    pub decimal: String,
}

impl From<&HeadlessDecimal> for Evaluation {
    fn from(value: &HeadlessDecimal) -> Self {
        Self {
            magnitude: value.magnitude().to_string(),
            precision: value.precision(),
            decimal: value.to_decimal_string(),
        }
    }
}

/// Parse `decimal[@precision]`
pub fn parse_value(token: &str) -> Result<HeadlessDecimal> {
    let (literal, precision) = match token.split_once('@') {
        Some((literal, precision)) => {
            let precision = precision.parse::<u32>().map_err(|_| {
                Error::InvalidDecimal(format!("{} has an invalid precision suffix", token))
            })?;
            (literal, Some(precision))
        }
        None => (token, None),
    };

    let value: HeadlessDecimal = literal.parse()?;
    match precision {
        None => Ok(value),
        Some(precision) if value.precision() > precision => Err(Error::InvalidDecimal(format!(
            "{} has more than {} fractional digits",
            literal, precision
        ))),
        Some(precision) => Ok(value.rescale(precision)),
    }
}

pub fn parse_operator(token: &str) -> Option<Operator> {
    match token.to_ascii_lowercase().as_str() {
        "add" | "+" => Some(Operator::Add),
        "sub" | "-" => Some(Operator::Sub),
        "mul" | "x" | "*" => Some(Operator::Mul),
        "div" | "/" => Some(Operator::Div),
        _ => None,
    }
}

/// Build a calculator from an argument list
pub fn parse_expression<S: AsRef<str>>(tokens: &[S]) -> Result<Calculator> {
    let mut tokens = tokens.iter().map(AsRef::as_ref).enumerate();

    let (_, first) = tokens
        .next()
        .ok_or_else(|| Error::InvalidExpression("expected at least one value".to_string()))?;
    let mut calculator = Calculator::first(parse_value(first).with_context(|| "argument 1")?);

    while let Some((index, token)) = tokens.next() {
        let operator = parse_operator(token).ok_or_else(|| {
            Error::InvalidExpression(format!("expected an operator at argument {}, found {}", index + 1, token))
        })?;
        let (index, token) = tokens.next().ok_or_else(|| {
            Error::InvalidExpression(format!("missing value after {}", token))
        })?;
        let value = parse_value(token).with_context(|| format!("argument {}", index + 1))?;

        calculator = match operator {
            Operator::Add => calculator.add(value),
            Operator::Sub => calculator.subtract_by(value),
            Operator::Mul => calculator.multiply_by(value),
            Operator::Div => calculator.divide_by(value)?,
        };
    }

    Ok(calculator)
}

/// Parse and evaluate an argument list at the configured precision
pub fn evaluate_tokens<S: AsRef<str>>(tokens: &[S], config: &CalcConfig) -> Result<HeadlessDecimal> {
    let calculator = parse_expression(tokens)?;
    debug!(
        "Evaluating {} over {}",
        calculator.numerator(),
        calculator
            .denominator()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "1".to_string())
    );
    calculator.calculate_headless(config.precision, config.rounding)
}

/// Rescale a single value to the configured precision
pub fn rescale_literal(token: &str, config: &CalcConfig) -> Result<HeadlessDecimal> {
    let value = parse_value(token)?;
    Ok(value.rescale_with(config.precision, config.rounding))
}
