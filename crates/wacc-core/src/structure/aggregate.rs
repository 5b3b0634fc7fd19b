use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::checked;
use crate::error::WaccError;
use crate::types::{Money, Percent, Rate};
use crate::CostOfCapitalResult;

/// One capital source as seen by the aggregator: a market value and a cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCost {
    pub name: String,
    pub market_value: Money,
    pub cost_rate_percent: Percent,
}

impl SourceCost {
    pub fn new(name: impl Into<String>, market_value: Money, cost_rate_percent: Percent) -> Self {
        SourceCost {
            name: name.into(),
            market_value,
            cost_rate_percent,
        }
    }
}

/// A weighted row of the WACC table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaccRow {
    pub name: String,
    pub cost_rate_percent: Percent,
    pub market_value: Money,
    /// Market value weight in [0, 1]
    pub weight: Rate,
    pub weighted_cost_percent: Percent,
}

/// Weights and blended cost for a full capital structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaccResult {
    /// Rows in input order
    pub rows: Vec<WaccRow>,
    pub total_market_value: Money,
    pub wacc_percent: Percent,
}

/// Flat export record: one per source, with the structure totals repeated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatWaccRecord {
    pub name: String,
    pub cost_rate_percent: Percent,
    pub market_value: Money,
    pub weight: Rate,
    pub weighted_cost_percent: Percent,
    pub total_market_value: Money,
    pub wacc_percent: Percent,
}

impl WaccResult {
    pub fn flat_records(&self) -> Vec<FlatWaccRecord> {
        self.rows
            .iter()
            .map(|row| FlatWaccRecord {
                name: row.name.clone(),
                cost_rate_percent: row.cost_rate_percent,
                market_value: row.market_value,
                weight: row.weight,
                weighted_cost_percent: row.weighted_cost_percent,
                total_market_value: self.total_market_value,
                wacc_percent: self.wacc_percent,
            })
            .collect()
    }

    pub fn row(&self, name: &str) -> Option<&WaccRow> {
        self.rows.iter().find(|r| r.name == name)
    }
}

/// Weight each source by market value and blend the costs.
///
/// weight_i = MV_i / sum(MV)
/// WACC = sum(weight_i * cost_i)
///
/// Fails with `ZeroCapitalStructure` before any weight is computed when the
/// total market value is zero.
pub fn compute_wacc(sources: &[SourceCost]) -> CostOfCapitalResult<WaccResult> {
    if sources.is_empty() {
        return Err(WaccError::InsufficientData("At least one capital source is required".into()));
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(sources.len());
    for source in sources {
        if source.market_value < Decimal::ZERO {
            return Err(WaccError::invalid(
                format!("market_value:{}", source.name),
                "Market value cannot be negative",
            ));
        }
        if !seen.insert(source.name.as_str()) {
            return Err(WaccError::invalid(
                format!("name:{}", source.name),
                "Source names must be unique within a capital structure",
            ));
        }
    }

    let total_market_value = checked::sum(sources.iter().map(|s| s.market_value), "market_value")?;
    if total_market_value.is_zero() {
        return Err(WaccError::ZeroCapitalStructure);
    }

    let rows = sources
        .iter()
        .map(|s| {
            let weight = checked::div(s.market_value, total_market_value, "market value weight")?;
            let field = format!("cost_rate_percent:{}", s.name);
            Ok(WaccRow {
                name: s.name.clone(),
                cost_rate_percent: s.cost_rate_percent,
                market_value: s.market_value,
                weight,
                weighted_cost_percent: checked::mul(weight, s.cost_rate_percent, &field)?,
            })
        })
        .collect::<CostOfCapitalResult<Vec<WaccRow>>>()?;

    let wacc_percent = checked::sum(
        rows.iter().map(|r| r.weighted_cost_percent),
        "wacc_percent",
    )?;
    log::debug!(
        "aggregated {} sources: total_market_value={total_market_value} wacc_percent={wacc_percent}",
        rows.len()
    );

    Ok(WaccResult {
        rows,
        total_market_value,
        wacc_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn scenario_a() -> Vec<SourceCost> {
        vec![
            SourceCost::new("Equity", dec!(120000), dec!(14)),
            SourceCost::new("Debt", dec!(80000), dec!(4.125)),
        ]
    }

    #[test]
    fn test_two_source_wacc() {
        let result = compute_wacc(&scenario_a()).unwrap();
        assert_eq!(result.total_market_value, dec!(200000));
        assert_eq!(result.rows[0].weight, dec!(0.6));
        assert_eq!(result.rows[1].weight, dec!(0.4));
        assert_eq!(result.wacc_percent, dec!(10.05));
    }

    #[test]
    fn test_preserves_input_order() {
        let sources = vec![
            SourceCost::new("Loan", dec!(10), dec!(5)),
            SourceCost::new("Equity", dec!(90), dec!(12)),
        ];
        let result = compute_wacc(&sources).unwrap();
        let names: Vec<&str> = result.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Loan", "Equity"]);
    }

    #[test]
    fn test_single_positive_source_equals_its_cost() {
        let sources = vec![
            SourceCost::new("Equity", dec!(500), dec!(11.37)),
            SourceCost::new("Debt", Decimal::ZERO, dec!(4)),
        ];
        let result = compute_wacc(&sources).unwrap();
        assert_eq!(result.wacc_percent, dec!(11.37));
        assert_eq!(result.row("Debt").unwrap().weight, Decimal::ZERO);
    }

    #[test]
    fn test_zero_capital_structure() {
        let sources = vec![
            SourceCost::new("Equity", Decimal::ZERO, dec!(14)),
            SourceCost::new("Debt", Decimal::ZERO, dec!(4)),
        ];
        assert!(matches!(
            compute_wacc(&sources).unwrap_err(),
            WaccError::ZeroCapitalStructure
        ));
    }

    #[test]
    fn test_empty_and_negative_rejected() {
        assert!(matches!(
            compute_wacc(&[]).unwrap_err(),
            WaccError::InsufficientData(_)
        ));
        let sources = vec![SourceCost::new("Equity", dec!(-1), dec!(10))];
        assert!(matches!(
            compute_wacc(&sources).unwrap_err(),
            WaccError::InvalidParameter { .. }
        ));
    }

    #[test]
    fn test_market_value_sum_overflow_is_an_error() {
        let sources = vec![
            SourceCost::new("Equity", Decimal::MAX, dec!(12)),
            SourceCost::new("Debt", Decimal::MAX, dec!(5)),
        ];
        match compute_wacc(&sources).unwrap_err() {
            WaccError::InvalidParameter { field, .. } => assert_eq!(field, "market_value"),
            e => panic!("Expected InvalidParameter, got {e:?}"),
        }
    }

    #[test]
    fn test_single_max_market_value_is_fine() {
        let sources = vec![SourceCost::new("Equity", Decimal::MAX, dec!(12))];
        let result = compute_wacc(&sources).unwrap();
        assert_eq!(result.rows[0].weight, Decimal::ONE);
        assert_eq!(result.wacc_percent, dec!(12));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let sources = vec![
            SourceCost::new("Debt", dec!(1), dec!(5)),
            SourceCost::new("Debt", dec!(2), dec!(6)),
        ];
        match compute_wacc(&sources).unwrap_err() {
            WaccError::InvalidParameter { field, .. } => assert_eq!(field, "name:Debt"),
            e => panic!("Expected InvalidParameter, got {e:?}"),
        }
    }

    #[test]
    fn test_idempotent() {
        let a = compute_wacc(&scenario_a()).unwrap();
        let b = compute_wacc(&scenario_a()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_flat_records_repeat_totals() {
        let result = compute_wacc(&scenario_a()).unwrap();
        let records = result.flat_records();
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .all(|r| r.wacc_percent == dec!(10.05) && r.total_market_value == dec!(200000)));
        assert_eq!(records[1].weighted_cost_percent, dec!(1.65));
    }
}
