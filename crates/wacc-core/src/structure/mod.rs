pub mod aggregate;
pub mod pipeline;
pub mod simple;
pub mod source;
pub mod tranches;

pub use aggregate::{compute_wacc, FlatWaccRecord, SourceCost, WaccResult, WaccRow};
pub use pipeline::{calculate_structure_wacc, CapitalStructureInput, StructureWaccOutput};
pub use simple::{calculate_simple_wacc, SimpleWaccInput, SimpleWaccOutput};
pub use source::{CapitalSource, CapitalStructure, InstrumentInput};
pub use tranches::{
    blend_debt_tranches, DebtTranche, DebtTranchesInput, TrancheBlend, TrancheWeight,
};
