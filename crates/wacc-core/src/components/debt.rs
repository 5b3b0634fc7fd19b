use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::checked;
use crate::error::WaccError;
use crate::types::{Rate, Years};
use crate::CostOfCapitalResult;

/// Nominal value that bond prices and redemption values are quoted against.
pub const NOMINAL_PER_100: Decimal = dec!(100);

/// Irredeemable (perpetual) bond parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrredeemableDebtParams {
    /// Annual coupon as a decimal of nominal (0.11 = £11 per £100)
    pub coupon_rate: Rate,
    /// Market price per £100 nominal
    pub price_per_100: Decimal,
    pub tax_rate: Rate,
}

/// Redeemable bond parameters for the straight-line yield approximation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemableDebtParams {
    /// Annual coupon as a decimal of nominal
    pub coupon_rate: Rate,
    /// Amount repaid at redemption per £100 nominal
    pub redeem_value_per_100: Decimal,
    /// Market price per £100 nominal
    pub price_per_100: Decimal,
    pub years_to_redemption: Years,
    pub tax_rate: Rate,
}

/// Bank loan or any debt quoted at a single nominal rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanParams {
    pub nominal_rate: Rate,
    pub tax_rate: Rate,
}

pub(crate) fn validate_tax_rate(tax_rate: Rate) -> CostOfCapitalResult<()> {
    if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE {
        return Err(WaccError::invalid("tax_rate", "Tax rate must be between 0 and 1"));
    }
    Ok(())
}

fn validate_coupon(coupon_rate: Rate) -> CostOfCapitalResult<()> {
    if coupon_rate < Decimal::ZERO {
        return Err(WaccError::invalid("coupon_rate", "Coupon rate cannot be negative"));
    }
    Ok(())
}

/// Apply the interest tax shield: rate * (1 - t).
pub fn after_tax(rate: Rate, tax_rate: Rate) -> CostOfCapitalResult<Rate> {
    let retained = checked::sub(Decimal::ONE, tax_rate, "tax_rate")?;
    checked::mul(rate, retained, "rate")
}

/// Pre-tax yield on an irredeemable bond: I / P0, with I = coupon * 100.
pub fn irredeemable_debt_pre_tax_yield(
    coupon_rate: Rate,
    price_per_100: Decimal,
) -> CostOfCapitalResult<Rate> {
    validate_coupon(coupon_rate)?;
    if price_per_100.is_zero() {
        return Err(WaccError::division("irredeemable bond yield (price_per_100 is zero)"));
    }
    if price_per_100 < Decimal::ZERO {
        return Err(WaccError::invalid("price_per_100", "Bond price cannot be negative"));
    }
    let coupon = checked::mul(coupon_rate, NOMINAL_PER_100, "coupon_rate")?;
    checked::div(coupon, price_per_100, "irredeemable bond yield")
}

/// After-tax cost of irredeemable debt.
///
/// Kd = (I / P0) * (1 - t)
pub fn cost_of_irredeemable_debt(
    coupon_rate: Rate,
    price_per_100: Decimal,
    tax_rate: Rate,
) -> CostOfCapitalResult<Rate> {
    validate_tax_rate(tax_rate)?;
    let pre_tax = irredeemable_debt_pre_tax_yield(coupon_rate, price_per_100)?;
    after_tax(pre_tax, tax_rate)
}

/// Pre-tax yield to redemption, straight-line approximation:
///
/// (I + (R - P0) / n) / ((R + P0) / 2)
///
/// This is deliberately not an IRR solve.
pub fn redeemable_debt_pre_tax_yield(
    coupon_rate: Rate,
    redeem_value_per_100: Decimal,
    price_per_100: Decimal,
    years_to_redemption: Years,
) -> CostOfCapitalResult<Rate> {
    validate_coupon(coupon_rate)?;
    if years_to_redemption <= Decimal::ZERO {
        return Err(WaccError::invalid(
            "years_to_redemption",
            "Years to redemption must be positive",
        ));
    }
    if price_per_100 < Decimal::ZERO {
        return Err(WaccError::invalid("price_per_100", "Bond price cannot be negative"));
    }
    if redeem_value_per_100 < Decimal::ZERO {
        return Err(WaccError::invalid(
            "redeem_value_per_100",
            "Redemption value cannot be negative",
        ));
    }
    let combined = checked::add(redeem_value_per_100, price_per_100, "redeem_value_per_100")?;
    let average_value = checked::div(combined, Decimal::TWO, "average bond value")?;
    if average_value.is_zero() {
        return Err(WaccError::invalid(
            "price_per_100 + redeem_value_per_100",
            "Average of price and redemption value is zero",
        ));
    }

    let coupon = checked::mul(coupon_rate, NOMINAL_PER_100, "coupon_rate")?;
    let capital_gain = checked::sub(redeem_value_per_100, price_per_100, "price_per_100")?;
    let annual_gain = checked::div(capital_gain, years_to_redemption, "annual redemption gain")?;
    let annual_return = checked::add(coupon, annual_gain, "coupon_rate")?;
    checked::div(annual_return, average_value, "redeemable bond yield")
}

/// After-tax cost of redeemable debt (approximate yield to redemption, then the tax shield).
pub fn cost_of_redeemable_debt(
    coupon_rate: Rate,
    redeem_value_per_100: Decimal,
    price_per_100: Decimal,
    years_to_redemption: Years,
    tax_rate: Rate,
) -> CostOfCapitalResult<Rate> {
    validate_tax_rate(tax_rate)?;
    let pre_tax = redeemable_debt_pre_tax_yield(
        coupon_rate,
        redeem_value_per_100,
        price_per_100,
        years_to_redemption,
    )?;
    after_tax(pre_tax, tax_rate)
}

/// After-tax cost of a loan: i * (1 - t)
pub fn cost_of_loan(nominal_rate: Rate, tax_rate: Rate) -> CostOfCapitalResult<Rate> {
    if nominal_rate < Decimal::ZERO {
        return Err(WaccError::invalid("nominal_rate", "Loan rate cannot be negative"));
    }
    validate_tax_rate(tax_rate)?;
    after_tax(nominal_rate, tax_rate)
}
