//! Fixed-point decimal engine
//!
//! This is a metapackage tying the workspace crates together for integration
//! tests and for callers that want a single dependency.

pub use common::decimal;
pub use common::error;
pub use common::{decimal_schema, DecimalSchema, Error, HeadlessDecimal, Result, Rounding, ScaledValue};
pub use formula_engine::{Calculator, Formula, Operator};
