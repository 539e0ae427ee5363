use serde::Deserialize;
use validator::Validate;

use super::NumericFields;

/// Fixed planning assumptions of the savings projection.
///
/// Defaults reproduce the planner's published figures; deployments may
/// override any of them through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct ProjectionAssumptions {
    /// Installed system capital cost, charged in year one
    #[validate(range(min = 0.0))]
    pub upfront_cost: f64,
    /// Remaining panel output after each year (compounding)
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub panel_degradation: f64,
    /// Nominal yearly growth factor of the electricity rate
    #[validate(range(exclusive_min = 0.0))]
    pub rate_escalation: f64,
    /// Yearly discount factor applied to future costs
    #[validate(range(exclusive_min = 0.0))]
    pub discount_rate: f64,
    #[validate(range(min = 1, max = 100))]
    pub horizon_years: u32,
}

impl ProjectionAssumptions {
    /// Real yearly rate growth after discounting
    pub fn net_escalation(&self) -> f64 {
        self.rate_escalation / self.discount_rate
    }

    pub fn with_upfront_cost(self, upfront_cost: f64) -> Self {
        Self {
            upfront_cost,
            ..self
        }
    }
}

impl Default for ProjectionAssumptions {
    fn default() -> Self {
        Self {
            upfront_cost: 10_626.0,
            panel_degradation: 0.995,
            rate_escalation: 1.022,
            discount_rate: 1.04,
            horizon_years: 20,
        }
    }
}

/// Rule of thumb turning roof area into nameplate capacity
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct SizingAssumptions {
    #[validate(range(exclusive_min = 0.0, message = "roof area per kW must be positive"))]
    pub sqft_per_kw: f64,
}

impl Default for SizingAssumptions {
    fn default() -> Self {
        Self { sqft_per_kw: 100.0 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct Assumptions {
    #[validate(nested)]
    pub projection: ProjectionAssumptions,
    #[validate(nested)]
    pub sizing: SizingAssumptions,
}

impl NumericFields for Assumptions {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("upfront_cost", self.projection.upfront_cost),
            ("panel_degradation", self.projection.panel_degradation),
            ("rate_escalation", self.projection.rate_escalation),
            ("discount_rate", self.projection.discount_rate),
            ("sqft_per_kw", self.sizing.sqft_per_kw),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ensure_valid, EngineError};
    use rstest::rstest;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ensure_valid(&Assumptions::default()).is_ok());
    }

    #[rstest]
    #[case(0.0)]
    #[case(-50.0)]
    fn test_non_positive_sizing_is_rejected(#[case] sqft_per_kw: f64) {
        let assumptions = Assumptions {
            sizing: SizingAssumptions { sqft_per_kw },
            ..Default::default()
        };
        assert!(matches!(
            ensure_valid(&assumptions),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_nan_sizing_is_rejected() {
        let assumptions = Assumptions {
            sizing: SizingAssumptions { sqft_per_kw: f64::NAN },
            ..Default::default()
        };
        assert!(matches!(
            ensure_valid(&assumptions),
            Err(EngineError::NonFinite { field: "sqft_per_kw" })
        ));
    }

    #[test]
    fn test_oversized_horizon_is_rejected() {
        let assumptions = Assumptions {
            projection: ProjectionAssumptions {
                horizon_years: 500,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(ensure_valid(&assumptions).is_err());
    }
}
