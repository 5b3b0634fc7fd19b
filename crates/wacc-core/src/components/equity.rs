use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::checked;
use crate::error::WaccError;
use crate::types::Rate;
use crate::CostOfCapitalResult;

/// CAPM parameters for the cost of ordinary equity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapmParams {
    /// Risk-free rate (e.g. 0.05 for 5%)
    pub risk_free_rate: Rate,
    /// Expected market return
    pub market_return: Rate,
    /// Equity beta. May be negative or above 1.
    pub beta: Decimal,
}

/// Gordon growth (dividend valuation) parameters for the cost of ordinary equity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GordonGrowthParams {
    /// Dividend expected at the end of the next period (D1)
    pub next_dividend: Decimal,
    /// Current ex-dividend share price (P0)
    pub current_price: Decimal,
    /// Perpetual dividend growth rate
    pub growth_rate: Rate,
}

/// A cost of equity that has already been estimated elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectEquityParams {
    pub cost_of_equity: Rate,
}

/// Cost of equity via the Capital Asset Pricing Model.
///
/// Ke = Rf + Beta * (Rm - Rf)
///
/// A market return below the risk-free rate gives a negative risk premium;
/// that is a valid result, not an error.
pub fn capm_cost_of_equity(
    risk_free_rate: Rate,
    market_return: Rate,
    beta: Decimal,
) -> CostOfCapitalResult<Rate> {
    let premium = checked::sub(market_return, risk_free_rate, "market_return")?;
    let scaled = checked::mul(beta, premium, "beta")?;
    checked::add(risk_free_rate, scaled, "risk_free_rate")
}

/// Cost of equity via the Gordon growth model.
///
/// Ke = D1 / P0 + g
pub fn gordon_cost_of_equity(
    next_dividend: Decimal,
    current_price: Decimal,
    growth_rate: Rate,
) -> CostOfCapitalResult<Rate> {
    if next_dividend < Decimal::ZERO {
        return Err(WaccError::invalid("next_dividend", "Next dividend cannot be negative"));
    }
    if current_price.is_zero() {
        return Err(WaccError::division("Gordon growth dividend yield (current_price is zero)"));
    }
    if current_price < Decimal::ZERO {
        return Err(WaccError::invalid("current_price", "Share price cannot be negative"));
    }
    let dividend_yield = checked::div(next_dividend, current_price, "dividend yield")?;
    checked::add(dividend_yield, growth_rate, "growth_rate")
}
