//! Command-line front end for the formula engine
//!
//! Turns an argument list such as `100@15 add 50@15 div 3` into a
//! [`Calculator`](formula_engine::Calculator) and evaluates it at a
//! configured precision.

pub mod config;
pub mod expression;

pub use config::CalcConfig;
pub use expression::{evaluate_tokens, parse_expression, parse_value, rescale_literal, Evaluation};
