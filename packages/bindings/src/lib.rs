use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Serialize;

use wacc_core::components::{self, CostModel};
use wacc_core::structure::{
    self, CapitalStructureInput, DebtTranchesInput, SimpleWaccInput, SourceCost,
};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Serialize)]
struct CostRatePercent {
    cost_rate_percent: Decimal,
}

// ---------------------------------------------------------------------------
// Component costs
// ---------------------------------------------------------------------------

/// Cost of one source as `{ "cost_rate_percent": "..." }`.
#[napi]
pub fn compute_component_cost(input_json: String) -> NapiResult<String> {
    let model: CostModel = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let cost_rate_percent = components::compute_component_cost(&model).map_err(to_napi_error)?;
    serde_json::to_string(&CostRatePercent { cost_rate_percent }).map_err(to_napi_error)
}

#[napi]
pub fn estimate_component_cost(input_json: String) -> NapiResult<String> {
    let model: CostModel = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = components::estimate_component_cost(&model).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Capital structure
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_wacc(input_json: String) -> NapiResult<String> {
    let sources: Vec<SourceCost> = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = structure::compute_wacc(&sources).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_structure_wacc(input_json: String) -> NapiResult<String> {
    let input: CapitalStructureInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = structure::calculate_structure_wacc(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Flat export records for a capital structure, one per source.
#[napi]
pub fn export_structure_wacc(input_json: String) -> NapiResult<String> {
    let input: CapitalStructureInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = structure::calculate_structure_wacc(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output.result.wacc.flat_records()).map_err(to_napi_error)
}

#[napi]
pub fn calculate_simple_wacc(input_json: String) -> NapiResult<String> {
    let input: SimpleWaccInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = structure::calculate_simple_wacc(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn blend_debt_tranches(input_json: String) -> NapiResult<String> {
    let input: DebtTranchesInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = structure::blend_debt_tranches(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
