use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::checked;
use crate::CostOfCapitalResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Rates expressed as percentages (5.0 = 5%). Only used on display-facing fields.
pub type Percent = Decimal;

/// Year counts
pub type Years = Decimal;

/// Convert a decimal rate into a percentage.
pub fn to_percent(rate: Rate) -> CostOfCapitalResult<Percent> {
    checked::mul(rate, Decimal::ONE_HUNDRED, "cost_rate")
}

/// Convert a percentage back into a decimal rate.
pub fn from_percent(percent: Percent) -> Rate {
    percent / Decimal::ONE_HUNDRED
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    for w in &warnings {
        log::warn!("{methodology}: {w}");
    }
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_conversions() {
        assert_eq!(to_percent(dec!(0.04125)).unwrap(), dec!(4.125));
        assert_eq!(from_percent(dec!(14)), dec!(0.14));
    }

    #[test]
    fn test_to_percent_out_of_range() {
        assert!(to_percent(Decimal::MAX).is_err());
    }

    #[test]
    fn test_envelope_carries_version_and_warnings() {
        let out = with_metadata(
            "test",
            &serde_json::json!({ "a": 1 }),
            vec!["careful".into()],
            7,
            dec!(1.5),
        );
        assert_eq!(out.metadata.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(out.metadata.computation_time_us, 7);
        assert_eq!(out.warnings, vec!["careful".to_string()]);
        assert_eq!(out.assumptions["a"], 1);
    }
}
