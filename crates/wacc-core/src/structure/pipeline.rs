use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::aggregate::{compute_wacc, WaccResult};
use super::source::{CapitalSource, CapitalStructure, InstrumentInput};
use super::tranches::{blend_debt_tranches, DebtTranchesInput, TrancheBlend};
use crate::components::SourceKind;
use crate::error::WaccError;
use crate::types::{with_metadata, ComputationOutput};
use crate::CostOfCapitalResult;

/// Blended cost above this level (in percent) draws a warning.
const HIGH_WACC_PERCENT: Decimal = dec!(20);

/// A full capital structure described instrument by instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalStructureInput {
    pub instruments: Vec<InstrumentInput>,
    /// Debt supplied as tranches, folded in as one additional source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_tranches: Option<DebtTranchesInput>,
}

/// Output of the full-structure calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureWaccOutput {
    #[serde(flatten)]
    pub wacc: WaccResult,
    /// Costed and valued sources, in input order
    pub capital_sources: Vec<CapitalSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_tranche_blend: Option<TrancheBlend>,
}

/// Cost every instrument, value it at units x price, fold in any tranche
/// blend, and weight the lot into a single WACC.
pub fn calculate_structure_wacc(
    input: &CapitalStructureInput,
) -> CostOfCapitalResult<ComputationOutput<StructureWaccOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.instruments.is_empty() && input.debt_tranches.is_none() {
        return Err(WaccError::InsufficientData("Capital structure has no instruments".into()));
    }

    // Step 1 and 2: component costs and market values
    let mut structure = CapitalStructure::from_instruments(&input.instruments)?;

    let debt_tranche_blend = match &input.debt_tranches {
        Some(tranches) => {
            let blend = blend_debt_tranches(tranches)?;
            for t in tranches.tranches.iter().filter(|t| !t.tax_shield) {
                warnings.push(format!(
                    "Tranche '{}' carries no tax shield; its nominal rate is used after tax",
                    t.name
                ));
            }
            structure = structure.with_source(CapitalSource::from_source_cost(
                SourceKind::GenericDebtTranche,
                &blend.to_source_cost(),
            ));
            Some(blend)
        }
        None => None,
    };

    // Step 3: weights and blended cost
    let wacc = compute_wacc(&structure.source_costs())?;

    for source in structure.sources().iter().filter(|s| s.market_value.is_zero()) {
        warnings.push(format!(
            "Source '{}' has zero market value and carries no weight",
            source.name
        ));
    }
    let positive = structure
        .sources()
        .iter()
        .filter(|s| s.market_value > Decimal::ZERO)
        .count();
    if positive == 1 {
        warnings.push("Only one source has positive market value; WACC equals its cost".into());
    }
    if wacc.wacc_percent > HIGH_WACC_PERCENT {
        warnings.push(format!(
            "WACC of {}% exceeds 20%; appropriate for high-risk situations only",
            wacc.wacc_percent.round_dp(2)
        ));
    }

    let output = StructureWaccOutput {
        wacc,
        capital_sources: structure.sources().to_vec(),
        debt_tranche_blend,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "WACC via market-value weighted component costs",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::debt::{IrredeemableDebtParams, LoanParams};
    use crate::components::equity::CapmParams;
    use crate::components::CostModel;
    use crate::structure::tranches::DebtTranche;

    fn equity(units: Decimal, price: Decimal) -> InstrumentInput {
        InstrumentInput {
            name: "Ordinary shares".into(),
            units,
            price: Some(price),
            cost: CostModel::Capm(CapmParams {
                risk_free_rate: dec!(0.05),
                market_return: dec!(0.11),
                beta: dec!(1.5),
            }),
        }
    }

    #[test]
    fn test_equity_and_loan() {
        let input = CapitalStructureInput {
            instruments: vec![
                equity(dec!(60000), dec!(2)),
                InstrumentInput {
                    name: "Loan".into(),
                    units: dec!(80000),
                    price: None,
                    cost: CostModel::Loan(LoanParams {
                        nominal_rate: dec!(0.055),
                        tax_rate: dec!(0.25),
                    }),
                },
            ],
            debt_tranches: None,
        };
        let out = calculate_structure_wacc(&input).unwrap();
        assert_eq!(out.result.wacc.wacc_percent, dec!(10.05));
        assert_eq!(out.result.capital_sources.len(), 2);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_tranches_fold_in_once() {
        let input = CapitalStructureInput {
            instruments: vec![equity(dec!(100), dec!(1))],
            debt_tranches: Some(DebtTranchesInput {
                name: "Debt".into(),
                tranches: vec![
                    DebtTranche {
                        name: "Senior".into(),
                        market_value: dec!(40),
                        nominal_rate: dec!(0.06),
                        tax_shield: true,
                    },
                    DebtTranche {
                        name: "Notes".into(),
                        market_value: dec!(60),
                        nominal_rate: dec!(0.052),
                        tax_shield: true,
                    },
                ],
                tax_rate: dec!(0.25),
            }),
        };
        let out = calculate_structure_wacc(&input).unwrap();
        let debt = out.result.wacc.row("Debt").unwrap();
        assert_eq!(debt.cost_rate_percent, dec!(4.14));
        assert_eq!(debt.weight, dec!(0.5));
        // 0.5 * 14 + 0.5 * 4.14
        assert_eq!(out.result.wacc.wacc_percent, dec!(9.07));
        let last = out.result.capital_sources.last().unwrap();
        assert_eq!(last.kind, SourceKind::GenericDebtTranche);
    }

    #[test]
    fn test_zero_values_surface_zero_capital_structure() {
        let input = CapitalStructureInput {
            instruments: vec![equity(Decimal::ZERO, dec!(1.9))],
            debt_tranches: None,
        };
        assert!(matches!(
            calculate_structure_wacc(&input).unwrap_err(),
            WaccError::ZeroCapitalStructure
        ));
    }

    #[test]
    fn test_component_error_aborts_structure() {
        let input = CapitalStructureInput {
            instruments: vec![
                equity(dec!(100), dec!(1)),
                InstrumentInput {
                    name: "Perpetual bonds".into(),
                    units: dec!(10),
                    price: Some(Decimal::ZERO),
                    cost: CostModel::IrredeemableDebt(IrredeemableDebtParams {
                        coupon_rate: dec!(0.11),
                        price_per_100: Decimal::ZERO,
                        tax_rate: dec!(0.3),
                    }),
                },
            ],
            debt_tranches: None,
        };
        assert!(matches!(
            calculate_structure_wacc(&input).unwrap_err(),
            WaccError::DivisionUndefined { .. }
        ));
    }

    #[test]
    fn test_zero_source_and_single_source_warnings() {
        let input = CapitalStructureInput {
            instruments: vec![
                equity(dec!(100), dec!(1)),
                InstrumentInput {
                    name: "Loan".into(),
                    units: Decimal::ZERO,
                    price: None,
                    cost: CostModel::Loan(LoanParams {
                        nominal_rate: dec!(0.06),
                        tax_rate: dec!(0.2),
                    }),
                },
            ],
            debt_tranches: None,
        };
        let out = calculate_structure_wacc(&input).unwrap();
        assert_eq!(out.result.wacc.wacc_percent, dec!(14));
        assert!(out.warnings.iter().any(|w| w.contains("zero market value")));
        assert!(out.warnings.iter().any(|w| w.contains("Only one source")));
    }

    #[test]
    fn test_empty_structure() {
        let input = CapitalStructureInput {
            instruments: vec![],
            debt_tranches: None,
        };
        assert!(matches!(
            calculate_structure_wacc(&input).unwrap_err(),
            WaccError::InsufficientData(_)
        ));
    }
}
