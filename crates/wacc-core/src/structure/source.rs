use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregate::SourceCost;
use crate::checked;
use crate::components::{compute_component_cost, CostModel, SourceKind};
use crate::error::WaccError;
use crate::types::{Money, Percent};
use crate::CostOfCapitalResult;

/// Raw description of one financing instrument: how much is held, at what
/// price, and how to cost it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentInput {
    /// Unique label within the structure
    pub name: String,
    /// Shares, £100-nominal bond units, or an outstanding balance
    pub units: Decimal,
    /// Market price per unit. Loans are valued at par: omit it or give 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    pub cost: CostModel,
}

/// A costed, valued capital source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalSource {
    pub name: String,
    pub kind: SourceKind,
    pub units: Decimal,
    pub price: Decimal,
    pub market_value: Money,
    pub cost_rate_percent: Percent,
}

impl CapitalSource {
    /// Cost and value one instrument.
    pub fn from_instrument(instrument: &InstrumentInput) -> CostOfCapitalResult<Self> {
        let kind = instrument.cost.source_kind();
        let price = match (instrument.price, kind) {
            (Some(p), SourceKind::Loan) if p != Decimal::ONE => {
                return Err(WaccError::invalid(
                    format!("price:{}", instrument.name),
                    format!("A loan balance is valued at par; price must be 1, got {p}"),
                ))
            }
            (Some(p), _) => p,
            (None, SourceKind::Loan) => Decimal::ONE,
            (None, _) => {
                return Err(WaccError::invalid(
                    format!("price:{}", instrument.name),
                    format!("A market price is required for {kind} sources"),
                ))
            }
        };
        if instrument.units < Decimal::ZERO {
            return Err(WaccError::invalid(
                format!("units:{}", instrument.name),
                "Units cannot be negative",
            ));
        }
        if price < Decimal::ZERO {
            return Err(WaccError::invalid(
                format!("price:{}", instrument.name),
                "Price cannot be negative",
            ));
        }

        let cost_rate_percent = compute_component_cost(&instrument.cost)?;
        let field = format!("units:{}", instrument.name);
        let market_value = checked::mul(instrument.units, price, &field)?;
        Ok(CapitalSource {
            name: instrument.name.clone(),
            kind,
            units: instrument.units,
            price,
            market_value,
            cost_rate_percent,
        })
    }

    /// A source whose market value and cost are already known, such as a
    /// blended debt tranche.
    pub fn from_source_cost(kind: SourceKind, source: &SourceCost) -> Self {
        CapitalSource {
            name: source.name.clone(),
            kind,
            units: source.market_value,
            price: Decimal::ONE,
            market_value: source.market_value,
            cost_rate_percent: source.cost_rate_percent,
        }
    }

    pub fn source_cost(&self) -> SourceCost {
        SourceCost::new(self.name.clone(), self.market_value, self.cost_rate_percent)
    }
}

/// An ordered, immutable set of capital sources. Order is only used for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalStructure {
    sources: Vec<CapitalSource>,
}

impl CapitalStructure {
    pub fn from_instruments(instruments: &[InstrumentInput]) -> CostOfCapitalResult<Self> {
        let sources = instruments
            .iter()
            .map(CapitalSource::from_instrument)
            .collect::<CostOfCapitalResult<Vec<_>>>()?;
        Ok(CapitalStructure { sources })
    }

    /// A new structure with one more source appended.
    pub fn with_source(&self, source: CapitalSource) -> Self {
        let mut sources = self.sources.clone();
        sources.push(source);
        CapitalStructure { sources }
    }

    pub fn sources(&self) -> &[CapitalSource] {
        &self.sources
    }

    pub fn source_costs(&self) -> Vec<SourceCost> {
        self.sources.iter().map(CapitalSource::source_cost).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::debt::LoanParams;
    use crate::components::preference::PreferenceParams;
    use rust_decimal_macros::dec;

    fn loan(price: Option<Decimal>) -> InstrumentInput {
        InstrumentInput {
            name: "Bank loan".into(),
            units: dec!(70000),
            price,
            cost: CostModel::Loan(LoanParams {
                nominal_rate: dec!(0.07),
                tax_rate: dec!(0.30),
            }),
        }
    }

    #[test]
    fn test_loan_price_defaults_to_one() {
        let source = CapitalSource::from_instrument(&loan(None)).unwrap();
        assert_eq!(source.price, Decimal::ONE);
        assert_eq!(source.market_value, dec!(70000));
        assert_eq!(source.cost_rate_percent, dec!(4.9));
        assert_eq!(source.kind, SourceKind::Loan);
    }

    #[test]
    fn test_market_value_is_units_times_price() {
        let pref = InstrumentInput {
            name: "Preference".into(),
            units: dec!(90000),
            price: Some(dec!(0.89)),
            cost: CostModel::Preference(PreferenceParams {
                dividend_per_unit: dec!(0.10),
                price_per_unit: dec!(0.89),
            }),
        };
        let source = CapitalSource::from_instrument(&pref).unwrap();
        assert_eq!(source.market_value, dec!(80100));
    }

    #[test]
    fn test_price_required_for_non_loan() {
        let mut pref = loan(None);
        pref.cost = CostModel::Preference(PreferenceParams {
            dividend_per_unit: dec!(0.10),
            price_per_unit: dec!(0.89),
        });
        assert!(matches!(
            CapitalSource::from_instrument(&pref).unwrap_err(),
            WaccError::InvalidParameter { .. }
        ));
    }

    #[test]
    fn test_loan_price_other_than_one_rejected() {
        assert!(CapitalSource::from_instrument(&loan(Some(Decimal::ONE))).is_ok());
        for price in [dec!(0.95), dec!(2), Decimal::ZERO] {
            match CapitalSource::from_instrument(&loan(Some(price))).unwrap_err() {
                WaccError::InvalidParameter { field, .. } => assert_eq!(field, "price:Bank loan"),
                e => panic!("Expected InvalidParameter, got {e:?}"),
            }
        }
    }

    #[test]
    fn test_market_value_overflow_is_an_error() {
        let big = InstrumentInput {
            name: "Preference".into(),
            units: Decimal::MAX,
            price: Some(dec!(2)),
            cost: CostModel::Preference(PreferenceParams {
                dividend_per_unit: dec!(0.10),
                price_per_unit: dec!(2),
            }),
        };
        assert!(matches!(
            CapitalSource::from_instrument(&big).unwrap_err(),
            WaccError::InvalidParameter { .. }
        ));
    }

    #[test]
    fn test_negative_units_rejected() {
        let mut input = loan(None);
        input.units = dec!(-1);
        assert!(CapitalSource::from_instrument(&input).is_err());
    }

    #[test]
    fn test_with_source_leaves_original_untouched() {
        let base = CapitalStructure::from_instruments(&[loan(None)]).unwrap();
        let extended = base.with_source(CapitalSource::from_source_cost(
            SourceKind::GenericDebtTranche,
            &SourceCost::new("Debt", dec!(100), dec!(4.14)),
        ));
        assert_eq!(base.sources().len(), 1);
        assert_eq!(extended.sources().len(), 2);
        assert_eq!(extended.sources()[1].market_value, dec!(100));
        assert_eq!(extended.source_costs()[0].market_value, dec!(70000));
    }
}
