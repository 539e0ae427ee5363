use serde::{Deserialize, Serialize};
use validator::Validate;

/// Household monthly consumption
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct ConsumptionProfile {
    #[validate(range(min = 0.0, message = "monthly electricity usage cannot be negative"))]
    pub monthly_kwh: f64,
    #[validate(range(min = 0.0, message = "monthly gas usage cannot be negative"))]
    pub monthly_therms: f64,
    /// Therms per day billed at the baseline tier
    #[validate(range(min = 0.0, message = "gas baseline allowance cannot be negative"))]
    pub daily_gas_allowance: f64,
}

impl ConsumptionProfile {
    pub fn new(monthly_kwh: f64, monthly_therms: f64, daily_gas_allowance: f64) -> Self {
        Self {
            monthly_kwh,
            monthly_therms,
            daily_gas_allowance,
        }
    }

    /// Same household with a different energy split
    pub fn with_usage(&self, monthly_kwh: f64, monthly_therms: f64) -> Self {
        Self {
            monthly_kwh,
            monthly_therms,
            ..*self
        }
    }
}

impl Default for ConsumptionProfile {
    fn default() -> Self {
        Self::new(500.0, 25.0, 1.06)
    }
}

/// Heat-pump replacement of gas space and water heating.
///
/// Percent fields are entered on a 0-100 scale; use the accessor methods
/// for normalized fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct ElectrificationConfig {
    #[validate(range(exclusive_min = 0.0, message = "heat pump COP must be positive"))]
    pub heat_pump_cop: f64,
    #[validate(range(exclusive_min = 0.0, max = 100.0))]
    pub furnace_efficiency_pct: f64,
    #[validate(range(exclusive_min = 0.0, max = 100.0))]
    pub water_heater_efficiency_pct: f64,
    /// Share of gas heating load served by the furnace; the water heater takes the rest
    #[validate(range(min = 0.0, max = 100.0))]
    pub furnace_load_ratio_pct: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub electrification_pct: f64,
}

impl ElectrificationConfig {
    pub fn furnace_ratio(&self) -> f64 {
        self.furnace_load_ratio_pct / 100.0
    }

    pub fn water_heater_ratio(&self) -> f64 {
        1.0 - self.furnace_ratio()
    }

    pub fn furnace_efficiency(&self) -> f64 {
        self.furnace_efficiency_pct / 100.0
    }

    pub fn water_heater_efficiency(&self) -> f64 {
        self.water_heater_efficiency_pct / 100.0
    }

    pub fn electrification_fraction(&self) -> f64 {
        self.electrification_pct / 100.0
    }
}

impl Default for ElectrificationConfig {
    fn default() -> Self {
        Self {
            heat_pump_cop: 4.0,
            furnace_efficiency_pct: 80.0,
            water_heater_efficiency_pct: 80.0,
            furnace_load_ratio_pct: 60.0,
            electrification_pct: 100.0,
        }
    }
}

/// PV array mounting, as understood by the solar estimator
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ArrayType {
    FixedOpenRack,
    #[default]
    FixedRoofMount,
    OneAxis,
    OneAxisBacktracking,
    TwoAxis,
}

impl ArrayType {
    pub fn code(&self) -> u8 {
        match self {
            Self::FixedOpenRack => 0,
            Self::FixedRoofMount => 1,
            Self::OneAxis => 2,
            Self::OneAxisBacktracking => 3,
            Self::TwoAxis => 4,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModuleType {
    #[default]
    Standard,
    Premium,
    ThinFilm,
}

impl ModuleType {
    pub fn code(&self) -> u8 {
        match self {
            Self::Standard => 0,
            Self::Premium => 1,
            Self::ThinFilm => 2,
        }
    }
}

/// Rooftop solar system request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct SolarConfig {
    #[validate(range(min = 0.0, max = 100.0))]
    pub desired_coverage_pct: f64,
    #[validate(range(min = 0.0, message = "roof area cannot be negative"))]
    pub roof_area_sqft: f64,
    #[validate(range(min = 0.0, max = 90.0))]
    pub tilt_deg: f64,
    #[validate(range(min = 0.0, max = 360.0))]
    pub azimuth_deg: f64,
    #[serde(default)]
    pub array_type: ArrayType,
    #[serde(default)]
    pub module_type: ModuleType,
    #[validate(range(min = -5.0, max = 99.0))]
    pub system_loss_pct: f64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            desired_coverage_pct: 100.0,
            roof_area_sqft: 400.0,
            tilt_deg: 20.0,
            azimuth_deg: 180.0,
            array_type: ArrayType::default(),
            module_type: ModuleType::default(),
            system_loss_pct: 14.0,
        }
    }
}
