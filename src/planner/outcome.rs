use serde::Serialize;

use crate::domain::{Coordinates, MonthlySolarSeries, ProjectionResult};
use crate::engine::{PlanSolarSavings, SolarOffset};

/// Result of a solar analysis request.
///
/// Only `Estimated` carries numbers. The other variants are normal answers
/// for a location, not faults, and are never reported as zero savings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolarOutcome {
    Estimated(Box<SolarAnalysis>),
    NoPlans,
    LocationNotFound,
    GeocodingFailed { reason: String },
    EstimatorFailed { reason: String },
    PlanNotAvailable { plan: String },
}

impl SolarOutcome {
    pub fn analysis(&self) -> Option<&SolarAnalysis> {
        match self {
            Self::Estimated(a) => Some(a),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarAnalysis {
    pub coordinates: Coordinates,
    pub capacity_kw: f64,
    pub monthly_output: MonthlySolarSeries,
    pub annual_output_kwh: f64,
    pub offset: SolarOffset,
    /// Monthly savings for every plan offered at the location
    pub savings: Vec<PlanSolarSavings>,
    pub projected_plan: String,
    pub projection: ProjectionResult,
}
