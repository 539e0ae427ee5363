use serde::Serialize;

use super::{compute_baseline, ensure_valid, EngineError, KWH_PER_THERM};
use crate::domain::{
    ConsumptionProfile, CostBreakdown, ElectrificationConfig, GasTierPricing, RatePlan,
};

/// Household load after moving part of the gas heating to a heat pump
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElectrifiedLoad {
    pub additional_kwh: f64,
    pub reduced_therms: f64,
    pub profile: ConsumptionProfile,
}

/// Convert the electrified share of gas heating into heat-pump electricity.
///
/// Heat delivered by the furnace and water heater (therms × efficiency ×
/// 29.3 kWh) is divided by the heat pump COP to get the electric input.
pub fn convert_heating_load(
    profile: &ConsumptionProfile,
    config: &ElectrificationConfig,
) -> ElectrifiedLoad {
    let electrified = config.electrification_fraction();
    let additional_kwh = profile.monthly_therms
        * electrified
        * (config.furnace_ratio() * config.furnace_efficiency() * KWH_PER_THERM
            / config.heat_pump_cop
            + config.water_heater_ratio() * config.water_heater_efficiency() * KWH_PER_THERM
                / config.heat_pump_cop);
    let reduced_therms = profile.monthly_therms * (1.0 - electrified);

    ElectrifiedLoad {
        additional_kwh,
        reduced_therms,
        profile: profile.with_usage(profile.monthly_kwh + additional_kwh, reduced_therms),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectrificationResult {
    pub original: CostBreakdown,
    pub electrified: CostBreakdown,
    pub additional_kwh: f64,
    pub reduced_therms: f64,
}

/// Cost and emissions of one plan before and after electrification.
///
/// Both states go through [`compute_baseline`]; only the profile differs.
pub fn compute_electrification(
    plan: &RatePlan,
    gas_tiers: &GasTierPricing,
    profile: &ConsumptionProfile,
    config: &ElectrificationConfig,
) -> Result<ElectrificationResult, EngineError> {
    ensure_valid(profile)?;
    ensure_valid(config)?;

    let load = convert_heating_load(profile, config);
    Ok(ElectrificationResult {
        original: compute_baseline(plan, gas_tiers, profile),
        electrified: compute_baseline(plan, gas_tiers, &load.profile),
        additional_kwh: load.additional_kwh,
        reduced_therms: load.reduced_therms,
    })
}
