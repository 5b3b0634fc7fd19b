use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use wacc_core::structure::{
    self, CapitalStructureInput, DebtTranchesInput, SimpleWaccInput, SourceCost,
};

use crate::input;

/// Arguments for a full capital structure WACC
#[derive(Args)]
pub struct WaccArgs {
    /// Path to a JSON or YAML capital structure
    #[arg(long)]
    pub input: Option<String>,

    /// Emit flat export records (one per source, totals repeated) instead of the full envelope
    #[arg(long)]
    pub flat: bool,
}

/// Arguments for aggregating already-costed sources
#[derive(Args)]
pub struct AggregateArgs {
    /// Path to a JSON or YAML list of {name, market_value, cost_rate_percent}
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a two-source equity and debt WACC
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SimpleArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Market value of equity
    #[arg(long)]
    pub equity_value: Option<Decimal>,

    /// Market value of debt
    #[arg(long)]
    pub debt_value: Option<Decimal>,

    /// Cost of equity as a decimal
    #[arg(long, alias = "ke")]
    pub cost_of_equity: Option<Decimal>,

    /// Pre-tax cost of debt as a decimal
    #[arg(long, alias = "kd")]
    pub cost_of_debt: Option<Decimal>,

    /// Corporate tax rate
    #[arg(long)]
    pub tax_rate: Option<Decimal>,
}

/// Arguments for blending debt tranches
#[derive(Args)]
pub struct TranchesArgs {
    /// Path to a JSON or YAML tranche list
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_wacc(args: WaccArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let structure_input: CapitalStructureInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file> or stdin required for a capital structure".into());
    };

    let result = structure::calculate_structure_wacc(&structure_input)?;
    if args.flat {
        return Ok(json!({ "results": result.result.wacc.flat_records() }));
    }
    Ok(serde_json::to_value(result)?)
}

pub fn run_aggregate(args: AggregateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sources: Vec<SourceCost> = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file> or stdin required for aggregation".into());
    };

    let result = structure::compute_wacc(&sources)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_simple(args: SimpleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let simple_input: SimpleWaccInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        SimpleWaccInput {
            equity_value: args
                .equity_value
                .ok_or("--equity-value is required (or provide --input)")?,
            debt_value: args
                .debt_value
                .ok_or("--debt-value is required (or provide --input)")?,
            cost_of_equity: Some(
                args.cost_of_equity
                    .ok_or("--cost-of-equity is required (or provide --input)")?,
            ),
            equity_model: None,
            cost_of_debt: args
                .cost_of_debt
                .ok_or("--cost-of-debt is required (or provide --input)")?,
            tax_rate: args.tax_rate.unwrap_or(Decimal::ZERO),
        }
    };

    let result = structure::calculate_simple_wacc(&simple_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_tranches(args: TranchesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tranches_input: DebtTranchesInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file> or stdin required for tranche blending".into());
    };

    let result = structure::blend_debt_tranches(&tranches_input)?;
    Ok(serde_json::to_value(result)?)
}
