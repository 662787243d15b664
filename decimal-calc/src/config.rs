//! Configuration for the calculator CLI

use std::env;

use common::decimal::Rounding;

/// Precision used when neither the environment nor a flag sets one
pub const DEFAULT_PRECISION: u32 = 6;

/// Configuration for the calculator CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalcConfig {
    /// Fractional digits of every result
    pub precision: u32,
    /// Rounding applied when a result is narrowed
    pub rounding: Rounding,
    /// Print results as JSON instead of plain decimals
    pub json_output: bool,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            precision: env::var("DECIMAL_CALC_PRECISION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PRECISION),
            rounding: env::var("DECIMAL_CALC_ROUNDING")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            json_output: env::var("DECIMAL_CALC_JSON")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl CalcConfig {
    /// Create a new configuration using environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create a new configuration with custom values
    pub fn new(precision: u32, rounding: Rounding, json_output: bool) -> Self {
        Self {
            precision,
            rounding,
            json_output,
        }
    }

    /// Apply command-line flags on top of this configuration
    pub fn with_overrides(
        mut self,
        precision: Option<u32>,
        rounding: Option<Rounding>,
        json_output: bool,
    ) -> Self {
        if let Some(precision) = precision {
            self.precision = precision;
        }
        if let Some(rounding) = rounding {
            self.rounding = rounding;
        }
        self.json_output |= json_output;
        self
    }
}
