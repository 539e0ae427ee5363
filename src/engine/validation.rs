use validator::Validate;

use super::EngineError;
use crate::domain::{ConsumptionProfile, ElectrificationConfig, SolarConfig};

/// Numeric fields checked for NaN/infinity before range validation
pub trait NumericFields {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)>;
}

impl NumericFields for ConsumptionProfile {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("monthly_kwh", self.monthly_kwh),
            ("monthly_therms", self.monthly_therms),
            ("daily_gas_allowance", self.daily_gas_allowance),
        ]
    }
}

impl NumericFields for ElectrificationConfig {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("heat_pump_cop", self.heat_pump_cop),
            ("furnace_efficiency_pct", self.furnace_efficiency_pct),
            ("water_heater_efficiency_pct", self.water_heater_efficiency_pct),
            ("furnace_load_ratio_pct", self.furnace_load_ratio_pct),
            ("electrification_pct", self.electrification_pct),
        ]
    }
}

impl NumericFields for SolarConfig {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("desired_coverage_pct", self.desired_coverage_pct),
            ("roof_area_sqft", self.roof_area_sqft),
            ("tilt_deg", self.tilt_deg),
            ("azimuth_deg", self.azimuth_deg),
            ("system_loss_pct", self.system_loss_pct),
        ]
    }
}

/// Reject an input before any model divides by one of its fields
pub fn ensure_valid<T: Validate + NumericFields>(input: &T) -> Result<(), EngineError> {
    if let Some((field, _)) = input
        .numeric_fields()
        .into_iter()
        .find(|(_, value)| !value.is_finite())
    {
        tracing::debug!(field, "rejected non-finite input");
        return Err(EngineError::NonFinite { field });
    }
    input.validate().map_err(|errors| {
        tracing::debug!(%errors, "rejected invalid input");
        EngineError::from(errors)
    })
}
