pub mod debt;
pub mod engine;
pub mod equity;
pub mod preference;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use engine::{compute_component_cost, estimate_component_cost, ComponentCostOutput, CostModel};

/// The kind of financing instrument a capital source represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Equity,
    Preference,
    IrredeemableDebt,
    RedeemableDebt,
    Loan,
    GenericDebtTranche,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::Equity => "equity",
            SourceKind::Preference => "preference",
            SourceKind::IrredeemableDebt => "irredeemable_debt",
            SourceKind::RedeemableDebt => "redeemable_debt",
            SourceKind::Loan => "loan",
            SourceKind::GenericDebtTranche => "generic_debt_tranche",
        };
        f.write_str(s)
    }
}
