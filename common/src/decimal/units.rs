//! Schemas shared across the trading SDK

use super::ScaledValue;
use crate::decimal_schema;

decimal_schema!(
    /// US dollar amounts
    pub Usd => 15
);

decimal_schema!(
    /// Collateral held by a position
    pub Collateral => 9
);

decimal_schema!(
    /// Oracle and entry prices
    pub Price => 18
);

decimal_schema!(
    /// Position sizes in index asset units
    pub Size => 18
);

decimal_schema!(
    /// Fractions such as margin requirements (0.025 = 2.5%)
    pub Percentage => 18
);

decimal_schema!(
    /// Dimensionless ratios such as leverage
    pub Ratio => 18
);

decimal_schema!(
    /// Default target of an unqualified calculation
    pub Unbranded => 6
);

pub type UsdValue = ScaledValue<Usd>;
pub type CollateralAmount = ScaledValue<Collateral>;
pub type OraclePrice = ScaledValue<Price>;
pub type PositionSize = ScaledValue<Size>;
pub type PercentageValue = ScaledValue<Percentage>;
pub type RatioOutput = ScaledValue<Ratio>;
pub type UnbrandedValue = ScaledValue<Unbranded>;
