use serde::Serialize;

use super::{BILLING_DAYS_PER_MONTH, GAS_EMISSIONS_KG_PER_THERM, GRAMS_PER_KG};
use crate::domain::{ConsumptionProfile, CostBreakdown, GasTierPricing, RatePlan};

/// Gas usage split across the two price tiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GasUsageSplit {
    pub base_therms: f64,
    pub excess_therms: f64,
}

impl GasUsageSplit {
    pub fn cost(&self, tiers: &GasTierPricing) -> f64 {
        self.base_therms * tiers.baseline_price_per_therm
            + self.excess_therms * tiers.excess_price_per_therm
    }
}

pub fn monthly_gas_allowance(daily_gas_allowance: f64) -> f64 {
    daily_gas_allowance * BILLING_DAYS_PER_MONTH
}

pub fn split_gas_usage(monthly_therms: f64, daily_gas_allowance: f64) -> GasUsageSplit {
    let allowance = monthly_gas_allowance(daily_gas_allowance);
    GasUsageSplit {
        base_therms: monthly_therms.min(allowance),
        excess_therms: (monthly_therms - allowance).max(0.0),
    }
}

pub fn electricity_cost(price_per_kwh: f64, monthly_kwh: f64) -> f64 {
    price_per_kwh * monthly_kwh
}

/// Monthly cost and emissions of `profile` billed under `plan`.
///
/// Inputs are expected to have passed [`super::ensure_valid`]; this function
/// has no failure path.
pub fn compute_baseline(
    plan: &RatePlan,
    gas_tiers: &GasTierPricing,
    profile: &ConsumptionProfile,
) -> CostBreakdown {
    let gas = split_gas_usage(profile.monthly_therms, profile.daily_gas_allowance);
    CostBreakdown {
        plan_name: plan.name.clone(),
        electricity_cost: electricity_cost(plan.price_per_kwh, profile.monthly_kwh),
        gas_cost: gas.cost(gas_tiers),
        electricity_emissions_kg: plan.emissions_g_per_kwh * profile.monthly_kwh / GRAMS_PER_KG,
        gas_emissions_kg: GAS_EMISSIONS_KG_PER_THERM * profile.monthly_therms,
    }
}
