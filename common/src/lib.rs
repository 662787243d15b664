//! Common types and utilities for the decimal engine
//!
//! This library contains the shared building blocks used by the formula
//! engine and the command-line front end: a unified error type and the
//! fixed-point value layer (schemas, scaled values and headless decimals).

pub mod error;
pub mod decimal;

/// Re-export important types
pub use error::{Error, ErrorExt, FormulaSlot, Result};
pub use decimal::*;
