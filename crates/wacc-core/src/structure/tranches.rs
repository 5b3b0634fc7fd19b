use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregate::SourceCost;
use crate::checked;
use crate::components::debt::{after_tax, validate_tax_rate};
use crate::error::WaccError;
use crate::types::{to_percent, Money, Percent, Rate};
use crate::CostOfCapitalResult;

fn default_debt_name() -> String {
    "Debt".to_string()
}

fn default_shield() -> bool {
    true
}

/// A discrete slice of debt financing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtTranche {
    pub name: String,
    pub market_value: Money,
    /// Pre-tax nominal rate as a decimal
    pub nominal_rate: Rate,
    /// Whether interest on this tranche is tax deductible
    #[serde(default = "default_shield")]
    pub tax_shield: bool,
}

/// Debt supplied as several tranches, blended into one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtTranchesInput {
    /// Name of the synthetic blended source
    #[serde(default = "default_debt_name")]
    pub name: String,
    pub tranches: Vec<DebtTranche>,
    pub tax_rate: Rate,
}

/// One tranche's share of the blend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrancheWeight {
    pub name: String,
    pub market_value: Money,
    pub weight: Rate,
    pub nominal_rate: Rate,
    /// Rate after the tranche's own tax shield (equal to nominal when unshielded)
    pub effective_rate: Rate,
}

/// Tranche-weighted cost of debt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrancheBlend {
    pub name: String,
    pub market_value: Money,
    pub pre_tax_rate: Rate,
    pub after_tax_rate: Rate,
    pub pre_tax_percent: Percent,
    pub after_tax_percent: Percent,
    pub tranches: Vec<TrancheWeight>,
}

impl TrancheBlend {
    /// The blend as a single top-level source. The tax shield has already been
    /// applied per tranche and must not be applied again.
    pub fn to_source_cost(&self) -> SourceCost {
        SourceCost::new(self.name.clone(), self.market_value, self.after_tax_percent)
    }
}

/// Blend debt tranches by market value.
///
/// pre-tax   = sum(w_i * r_i)
/// after-tax = sum(w_i * r_i * (1 - t))   for shielded tranches
///           + sum(w_i * r_i)             for unshielded tranches
pub fn blend_debt_tranches(input: &DebtTranchesInput) -> CostOfCapitalResult<TrancheBlend> {
    if input.tranches.is_empty() {
        return Err(WaccError::InsufficientData("At least one debt tranche is required".into()));
    }
    validate_tax_rate(input.tax_rate)?;
    for t in &input.tranches {
        if t.market_value < Decimal::ZERO {
            return Err(WaccError::invalid(
                format!("tranche:{}", t.name),
                "Tranche market value cannot be negative",
            ));
        }
        if t.nominal_rate < Decimal::ZERO {
            return Err(WaccError::invalid(
                format!("tranche:{}", t.name),
                "Tranche rate cannot be negative",
            ));
        }
    }

    let values = input.tranches.iter().map(|t| t.market_value);
    let market_value = checked::sum(values, "market_value")?;
    if market_value.is_zero() {
        return Err(WaccError::division(format!(
            "tranche weights for '{}' (total tranche market value is zero)",
            input.name
        )));
    }

    let tranches = input
        .tranches
        .iter()
        .map(|t| {
            let effective_rate = if t.tax_shield {
                after_tax(t.nominal_rate, input.tax_rate)?
            } else {
                t.nominal_rate
            };
            Ok(TrancheWeight {
                name: t.name.clone(),
                market_value: t.market_value,
                weight: checked::div(t.market_value, market_value, "tranche weight")?,
                nominal_rate: t.nominal_rate,
                effective_rate,
            })
        })
        .collect::<CostOfCapitalResult<Vec<TrancheWeight>>>()?;

    let mut pre_tax_rate = Decimal::ZERO;
    let mut after_tax_rate = Decimal::ZERO;
    for t in &tranches {
        let field = format!("tranche:{}", t.name);
        let weighted_nominal = checked::mul(t.weight, t.nominal_rate, &field)?;
        let weighted_effective = checked::mul(t.weight, t.effective_rate, &field)?;
        pre_tax_rate = checked::add(pre_tax_rate, weighted_nominal, &field)?;
        after_tax_rate = checked::add(after_tax_rate, weighted_effective, &field)?;
    }
    log::debug!(
        "blended {} tranches into '{}': pre_tax={pre_tax_rate} after_tax={after_tax_rate}",
        tranches.len(),
        input.name
    );

    Ok(TrancheBlend {
        name: input.name.clone(),
        market_value,
        pre_tax_rate,
        after_tax_rate,
        pre_tax_percent: to_percent(pre_tax_rate)?,
        after_tax_percent: to_percent(after_tax_rate)?,
        tranches,
    })
}
