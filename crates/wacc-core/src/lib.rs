mod checked;
pub mod error;
pub mod types;

#[cfg(feature = "components")]
pub mod components;

#[cfg(feature = "structure")]
pub mod structure;

pub use error::WaccError;
pub use types::*;

#[cfg(feature = "components")]
pub use components::{compute_component_cost, CostModel, SourceKind};

#[cfg(feature = "structure")]
pub use structure::{compute_wacc, SourceCost, WaccResult};

/// Standard result type for all cost-of-capital operations
pub type CostOfCapitalResult<T> = Result<T, WaccError>;
