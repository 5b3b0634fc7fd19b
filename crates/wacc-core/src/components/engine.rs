use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::debt::{self, IrredeemableDebtParams, LoanParams, RedeemableDebtParams};
use super::equity::{self, CapmParams, DirectEquityParams, GordonGrowthParams};
use super::preference::{self, PreferenceParams};
use super::SourceKind;
use crate::types::{to_percent, with_metadata, ComputationOutput, Percent, Rate};
use crate::CostOfCapitalResult;

/// Bond prices further than this from £100 nominal draw a warning.
const PAR_DEVIATION_WARNING: Decimal = dec!(30);

/// Instrument-specific parameters, one variant per costing method.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostModel {
    Capm(CapmParams),
    GordonGrowth(GordonGrowthParams),
    Direct(DirectEquityParams),
    Preference(PreferenceParams),
    IrredeemableDebt(IrredeemableDebtParams),
    RedeemableDebt(RedeemableDebtParams),
    Loan(LoanParams),
}

impl CostModel {
    pub fn source_kind(&self) -> SourceKind {
        match self {
            CostModel::Capm(_) | CostModel::GordonGrowth(_) | CostModel::Direct(_) => {
                SourceKind::Equity
            }
            CostModel::Preference(_) => SourceKind::Preference,
            CostModel::IrredeemableDebt(_) => SourceKind::IrredeemableDebt,
            CostModel::RedeemableDebt(_) => SourceKind::RedeemableDebt,
            CostModel::Loan(_) => SourceKind::Loan,
        }
    }

    pub fn method_name(&self) -> &'static str {
        match self {
            CostModel::Capm(_) => "capm",
            CostModel::GordonGrowth(_) => "gordon_growth",
            CostModel::Direct(_) => "direct",
            CostModel::Preference(_) => "preference",
            CostModel::IrredeemableDebt(_) => "irredeemable_debt",
            CostModel::RedeemableDebt(_) => "redeemable_debt",
            CostModel::Loan(_) => "loan",
        }
    }
}

/// Output of a single component cost estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCostOutput {
    /// Costing method used
    pub method: String,
    pub source_kind: SourceKind,
    /// Cost as a decimal (after tax for debt)
    pub cost_rate: Rate,
    /// Cost as a percentage
    pub cost_rate_percent: Percent,
    /// Pre-tax yield, for sources that carry a tax shield
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_tax_rate: Option<Rate>,
}

struct Evaluated {
    rate: Rate,
    pre_tax: Option<Rate>,
}

fn evaluate(model: &CostModel) -> CostOfCapitalResult<Evaluated> {
    let evaluated = match model {
        CostModel::Capm(p) => Evaluated {
            rate: equity::capm_cost_of_equity(p.risk_free_rate, p.market_return, p.beta)?,
            pre_tax: None,
        },
        CostModel::GordonGrowth(p) => Evaluated {
            rate: equity::gordon_cost_of_equity(p.next_dividend, p.current_price, p.growth_rate)?,
            pre_tax: None,
        },
        CostModel::Direct(p) => Evaluated {
            rate: p.cost_of_equity,
            pre_tax: None,
        },
        CostModel::Preference(p) => Evaluated {
            rate: preference::cost_of_preference(p.dividend_per_unit, p.price_per_unit)?,
            pre_tax: None,
        },
        CostModel::IrredeemableDebt(p) => Evaluated {
            rate: debt::cost_of_irredeemable_debt(p.coupon_rate, p.price_per_100, p.tax_rate)?,
            pre_tax: Some(debt::irredeemable_debt_pre_tax_yield(p.coupon_rate, p.price_per_100)?),
        },
        CostModel::RedeemableDebt(p) => Evaluated {
            rate: debt::cost_of_redeemable_debt(
                p.coupon_rate,
                p.redeem_value_per_100,
                p.price_per_100,
                p.years_to_redemption,
                p.tax_rate,
            )?,
            pre_tax: Some(debt::redeemable_debt_pre_tax_yield(
                p.coupon_rate,
                p.redeem_value_per_100,
                p.price_per_100,
                p.years_to_redemption,
            )?),
        },
        CostModel::Loan(p) => Evaluated {
            rate: debt::cost_of_loan(p.nominal_rate, p.tax_rate)?,
            pre_tax: Some(p.nominal_rate),
        },
    };
    log::trace!(
        "{} cost evaluated: rate={} pre_tax={:?}",
        model.method_name(),
        evaluated.rate,
        evaluated.pre_tax
    );
    Ok(evaluated)
}

/// Compute the annualized cost of one capital source, as a percentage.
pub fn compute_component_cost(model: &CostModel) -> CostOfCapitalResult<Percent> {
    to_percent(evaluate(model)?.rate)
}

/// Compute a component cost wrapped in the standard output envelope, with
/// reasonableness warnings.
pub fn estimate_component_cost(
    model: &CostModel,
) -> CostOfCapitalResult<ComputationOutput<ComponentCostOutput>> {
    let start = Instant::now();
    let evaluated = evaluate(model)?;
    let warnings = reasonableness_warnings(model);

    let output = ComponentCostOutput {
        method: model.method_name().to_string(),
        source_kind: model.source_kind(),
        cost_rate: evaluated.rate,
        cost_rate_percent: to_percent(evaluated.rate)?,
        pre_tax_rate: evaluated.pre_tax,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!("Component cost of capital ({})", model.method_name()),
        model,
        warnings,
        elapsed,
        output,
    ))
}

fn reasonableness_warnings(model: &CostModel) -> Vec<String> {
    let mut warnings = Vec::new();
    match model {
        CostModel::Capm(p) => {
            if p.market_return < p.risk_free_rate {
                warnings.push(format!(
                    "Market return ({}) is below the risk-free rate ({}); equity risk premium is negative",
                    p.market_return, p.risk_free_rate
                ));
            }
            if p.beta < Decimal::ZERO {
                warnings.push(format!("Negative beta ({}): verify market data", p.beta));
            } else if p.beta > dec!(3.0) {
                warnings.push(format!(
                    "High beta ({}): verify market data; betas above 3.0 are unusual",
                    p.beta
                ));
            }
        }
        CostModel::GordonGrowth(p) => {
            if p.growth_rate > dec!(0.10) {
                warnings.push(format!(
                    "Perpetual growth rate ({}) exceeds 10%; unlikely to be sustainable",
                    p.growth_rate
                ));
            }
        }
        CostModel::IrredeemableDebt(IrredeemableDebtParams { price_per_100, .. })
        | CostModel::RedeemableDebt(RedeemableDebtParams { price_per_100, .. }) => {
            let gap = price_per_100.checked_sub(debt::NOMINAL_PER_100);
            if gap.is_some_and(|g| g.abs() > PAR_DEVIATION_WARNING) {
                warnings.push(format!(
                    "Bond price ({price_per_100}) is far from £100 nominal; verify the quote basis"
                ));
            }
        }
        CostModel::Direct(_) | CostModel::Preference(_) | CostModel::Loan(_) => {}
    }
    warnings
}
