use serde::{Deserialize, Serialize};

/// Household state a breakdown was computed for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Original,
    Electrified,
}

/// Monthly cost and emissions of one plan under one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub plan_name: String,
    pub electricity_cost: f64,
    pub gas_cost: f64,
    pub electricity_emissions_kg: f64,
    pub gas_emissions_kg: f64,
}

impl CostBreakdown {
    pub fn total_cost(&self) -> f64 {
        self.electricity_cost + self.gas_cost
    }

    pub fn total_emissions_kg(&self) -> f64 {
        self.electricity_emissions_kg + self.gas_emissions_kg
    }

    /// Display label such as `"PG&E Base Plan (Electrified)"`
    pub fn label(&self, scenario: Scenario) -> String {
        format!("{} ({})", self.plan_name, scenario)
    }
}

/// Cumulative costs with and without solar over the projection horizon.
///
/// Vectors are indexed by `years`; entry `k` holds the running total at the
/// end of year `years[k]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub years: Vec<u32>,
    pub cumulative_cost_with_solar: Vec<f64>,
    pub cumulative_cost_without_solar: Vec<f64>,
    pub payback_year: Option<u32>,
    /// Serialized under the 20-year name used by the default horizon
    #[serde(rename = "total_20yr_savings", alias = "total_savings")]
    pub total_savings: f64,
}
