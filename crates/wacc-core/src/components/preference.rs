use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::checked;
use crate::error::WaccError;
use crate::types::Rate;
use crate::CostOfCapitalResult;

/// Irredeemable preference share parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceParams {
    /// Fixed dividend per share (e.g. 0.10 on a £1 share)
    pub dividend_per_unit: Decimal,
    /// Market price per share
    pub price_per_unit: Decimal,
}

/// Cost of preference shares.
///
/// Kp = d / P0
pub fn cost_of_preference(
    dividend_per_unit: Decimal,
    price_per_unit: Decimal,
) -> CostOfCapitalResult<Rate> {
    if dividend_per_unit < Decimal::ZERO {
        return Err(WaccError::invalid(
            "dividend_per_unit",
            "Preference dividend cannot be negative",
        ));
    }
    if price_per_unit.is_zero() {
        return Err(WaccError::division("preference dividend yield (price_per_unit is zero)"));
    }
    if price_per_unit < Decimal::ZERO {
        return Err(WaccError::invalid(
            "price_per_unit",
            "Preference share price cannot be negative",
        ));
    }
    checked::div(dividend_per_unit, price_per_unit, "preference yield")
}
