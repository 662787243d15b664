pub mod formula;
pub mod calculator;

pub use calculator::Calculator;
pub use formula::{Formula, Operator, Step};
