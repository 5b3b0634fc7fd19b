use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::aggregate::{compute_wacc, SourceCost};
use crate::components::debt::{after_tax, validate_tax_rate};
use crate::components::{compute_component_cost, CostModel, SourceKind};
use crate::error::WaccError;
use crate::types::{
    from_percent, to_percent, with_metadata, ComputationOutput, Money, Percent, Rate,
};
use crate::CostOfCapitalResult;

/// Two-source (equity and debt) WACC input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleWaccInput {
    /// Market value of equity
    pub equity_value: Money,
    /// Market value of debt
    pub debt_value: Money,
    /// Cost of equity as a decimal, when already estimated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_of_equity: Option<Rate>,
    /// Equity costing model (CAPM or Gordon growth) instead of a direct figure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equity_model: Option<CostModel>,
    /// Pre-tax cost of debt as a decimal
    pub cost_of_debt: Rate,
    pub tax_rate: Rate,
}

/// Two-source WACC output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleWaccOutput {
    pub equity_value: Money,
    pub debt_value: Money,
    pub cost_of_equity: Rate,
    pub cost_of_debt: Rate,
    pub after_tax_cost_of_debt: Rate,
    pub tax_rate: Rate,
    pub equity_weight: Rate,
    pub debt_weight: Rate,
    pub wacc: Rate,
    pub wacc_percent: Percent,
    /// Display values: weights to 4 dp, WACC to 2 dp
    pub equity_weight_rounded: Rate,
    pub debt_weight_rounded: Rate,
    pub wacc_percent_rounded: Percent,
}

fn resolve_cost_of_equity(input: &SimpleWaccInput) -> CostOfCapitalResult<Rate> {
    match (input.cost_of_equity, &input.equity_model) {
        (Some(ke), None) => Ok(ke),
        (None, Some(model)) => {
            if model.source_kind() != SourceKind::Equity {
                return Err(WaccError::invalid(
                    "equity_model",
                    format!("'{}' is not an equity costing model", model.method_name()),
                ));
            }
            Ok(from_percent(compute_component_cost(model)?))
        }
        (Some(_), Some(_)) => Err(WaccError::invalid(
            "cost_of_equity / equity_model",
            "Provide either a direct cost of equity or an equity model, not both",
        )),
        (None, None) => Err(WaccError::invalid(
            "cost_of_equity",
            "A cost of equity or an equity model is required",
        )),
    }
}

/// WACC for a plain equity + debt structure.
///
/// WACC = E/V * Ke + D/V * Kd * (1 - t)
pub fn calculate_simple_wacc(
    input: &SimpleWaccInput,
) -> CostOfCapitalResult<ComputationOutput<SimpleWaccOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_tax_rate(input.tax_rate)?;
    if input.cost_of_debt < Decimal::ZERO {
        return Err(WaccError::invalid("cost_of_debt", "Cost of debt cannot be negative"));
    }
    let cost_of_equity = resolve_cost_of_equity(input)?;
    let after_tax_cost_of_debt = after_tax(input.cost_of_debt, input.tax_rate)?;
    let equity_percent = to_percent(cost_of_equity)?;
    let debt_percent = to_percent(after_tax_cost_of_debt)?;

    let result = compute_wacc(&[
        SourceCost::new("Equity", input.equity_value, equity_percent),
        SourceCost::new("Debt", input.debt_value, debt_percent),
    ])?;
    let equity_weight = result.rows[0].weight;
    let debt_weight = result.rows[1].weight;

    if cost_of_equity < after_tax_cost_of_debt {
        warnings.push(format!(
            "Cost of equity ({cost_of_equity}) is below the after-tax cost of debt ({after_tax_cost_of_debt})"
        ));
    }
    if debt_weight > dec!(0.8) {
        warnings.push(format!(
            "Debt weight of {} is unusually high",
            round_half_up(debt_weight, 4)
        ));
    }

    let output = SimpleWaccOutput {
        equity_value: input.equity_value,
        debt_value: input.debt_value,
        cost_of_equity,
        cost_of_debt: input.cost_of_debt,
        after_tax_cost_of_debt,
        tax_rate: input.tax_rate,
        equity_weight,
        debt_weight,
        wacc: from_percent(result.wacc_percent),
        wacc_percent: result.wacc_percent,
        equity_weight_rounded: round_half_up(equity_weight, 4),
        debt_weight_rounded: round_half_up(debt_weight, 4),
        wacc_percent_rounded: round_half_up(result.wacc_percent, 2),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "WACC for a two-source equity and debt structure",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
