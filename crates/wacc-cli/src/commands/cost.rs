use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use wacc_core::components::equity::CapmParams;
use wacc_core::components::{engine, CostModel};

use crate::input;

/// Arguments for a single component cost
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CostArgs {
    /// Path to a JSON or YAML cost model (tagged with "kind")
    #[arg(long)]
    pub input: Option<String>,

    /// Risk-free rate for CAPM (e.g. 0.05 for 5%)
    #[arg(long)]
    pub risk_free_rate: Option<Decimal>,

    /// Expected market return for CAPM
    #[arg(long, alias = "rm")]
    pub market_return: Option<Decimal>,

    /// Equity beta for CAPM
    #[arg(long)]
    pub beta: Option<Decimal>,
}

pub fn run_cost(args: CostArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let model: CostModel = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(model) = input::stdin::read_stdin()? {
        model
    } else {
        CostModel::Capm(CapmParams {
            risk_free_rate: args
                .risk_free_rate
                .ok_or("--risk-free-rate is required (or provide --input)")?,
            market_return: args
                .market_return
                .ok_or("--market-return is required (or provide --input)")?,
            beta: args.beta.unwrap_or(dec!(1.0)),
        })
    };

    let result = engine::estimate_component_cost(&model)?;
    Ok(serde_json::to_value(result)?)
}
