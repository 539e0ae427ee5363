use serde::Serialize;

use super::{ensure_valid, EngineError, SizingAssumptions, GRAMS_PER_KG};
use crate::domain::{ConsumptionProfile, MonthlySolarSeries, RatePlan, SolarConfig};

/// Share of monthly usage the array can actually cover
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarOffset {
    pub monthly_offset_kwh: f64,
    pub requested_offset_kwh: f64,
    pub avg_monthly_output_kwh: f64,
    pub achieved_coverage_pct: f64,
    /// The request exceeded what the roof can produce and was clamped
    pub is_roof_limited: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSolarSavings {
    pub plan_name: String,
    pub cost_saving: f64,
    pub emissions_saving_kg: f64,
}

/// Nameplate capacity the roof supports, fed to the solar estimator
pub fn system_capacity_kw(roof_area_sqft: f64, sizing: &SizingAssumptions) -> f64 {
    roof_area_sqft / sizing.sqft_per_kw
}

/// Reconcile the requested coverage with the modeled average output.
///
/// Requests above the average monthly output are clamped to it and flagged
/// as roof-limited rather than rejected.
pub fn compute_solar_offset(
    monthly_series: &MonthlySolarSeries,
    profile: &ConsumptionProfile,
    solar_config: &SolarConfig,
) -> Result<SolarOffset, EngineError> {
    ensure_valid(profile)?;
    ensure_valid(solar_config)?;

    let avg_monthly_output_kwh = monthly_series.mean();
    let requested_offset_kwh = profile.monthly_kwh * (solar_config.desired_coverage_pct / 100.0);
    let is_roof_limited = requested_offset_kwh > avg_monthly_output_kwh;

    // monthly_kwh > 0 whenever the request is clamped, so the division is safe
    let achieved_coverage_pct = if is_roof_limited {
        avg_monthly_output_kwh / profile.monthly_kwh * 100.0
    } else {
        solar_config.desired_coverage_pct
    };

    if is_roof_limited {
        tracing::info!(
            requested_kwh = requested_offset_kwh,
            available_kwh = avg_monthly_output_kwh,
            achieved_coverage_pct,
            roof_limited = true,
            "solar request clamped to modeled output"
        );
    }

    Ok(SolarOffset {
        monthly_offset_kwh: requested_offset_kwh.min(avg_monthly_output_kwh),
        requested_offset_kwh,
        avg_monthly_output_kwh,
        achieved_coverage_pct,
        is_roof_limited,
    })
}

pub fn plan_savings(plan: &RatePlan, offset: &SolarOffset) -> PlanSolarSavings {
    PlanSolarSavings {
        plan_name: plan.name.clone(),
        cost_saving: offset.monthly_offset_kwh * plan.price_per_kwh,
        emissions_saving_kg: offset.monthly_offset_kwh * plan.emissions_g_per_kwh / GRAMS_PER_KG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::baseline::tests::plan;
    use proptest::prelude::*;

    fn flat_series(kwh: f64) -> MonthlySolarSeries {
        MonthlySolarSeries::try_from(vec![kwh; 12]).unwrap()
    }

    fn solar(desired_coverage_pct: f64) -> SolarConfig {
        SolarConfig {
            desired_coverage_pct,
            ..Default::default()
        }
    }

    #[test]
    fn test_roof_limited_scenario() {
        let offset = compute_solar_offset(
            &flat_series(300.0),
            &ConsumptionProfile::new(500.0, 0.0, 0.0),
            &solar(90.0),
        )
        .unwrap();
        assert!((offset.requested_offset_kwh - 450.0).abs() < 1e-9);
        assert_eq!(offset.monthly_offset_kwh, 300.0);
        assert!(offset.is_roof_limited);
        assert!((offset.achieved_coverage_pct - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_request_within_output_is_met() {
        let offset = compute_solar_offset(
            &flat_series(600.0),
            &ConsumptionProfile::new(500.0, 0.0, 0.0),
            &solar(80.0),
        )
        .unwrap();
        assert!((offset.monthly_offset_kwh - 400.0).abs() < 1e-9);
        assert!(!offset.is_roof_limited);
        assert_eq!(offset.achieved_coverage_pct, 80.0);
    }

    #[test]
    fn test_uses_mean_of_uneven_series() {
        let series = MonthlySolarSeries::try_from(vec![
            100.0, 150.0, 250.0, 350.0, 450.0, 500.0, 500.0, 450.0, 350.0, 250.0, 150.0, 100.0,
        ])
        .unwrap();
        let offset =
            compute_solar_offset(&series, &ConsumptionProfile::new(1000.0, 0.0, 0.0), &solar(100.0)).unwrap();
        assert!((offset.avg_monthly_output_kwh - 300.0).abs() < 1e-9);
        assert!((offset.achieved_coverage_pct - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_usage_is_not_roof_limited() {
        let offset = compute_solar_offset(
            &MonthlySolarSeries::zeros(),
            &ConsumptionProfile::new(0.0, 0.0, 0.0),
            &solar(100.0),
        )
        .unwrap();
        assert_eq!(offset.monthly_offset_kwh, 0.0);
        assert!(!offset.is_roof_limited);
    }

    #[test]
    fn test_plan_savings() {
        let offset = compute_solar_offset(
            &flat_series(300.0),
            &ConsumptionProfile::new(500.0, 0.0, 0.0),
            &solar(90.0),
        )
        .unwrap();
        let savings = plan_savings(&plan(0.30, 200.0), &offset);
        assert!((savings.cost_saving - 90.0).abs() < 1e-9);
        assert!((savings.emissions_saving_kg - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_from_roof_area() {
        let sizing = SizingAssumptions::default();
        assert_eq!(system_capacity_kw(400.0, &sizing), 4.0);
        assert_eq!(system_capacity_kw(0.0, &sizing), 0.0);
        assert_eq!(system_capacity_kw(400.0, &SizingAssumptions { sqft_per_kw: 80.0 }), 5.0);
    }

    #[test]
    fn test_invalid_coverage_is_rejected() {
        let result = compute_solar_offset(
            &flat_series(300.0),
            &ConsumptionProfile::default(),
            &solar(-10.0),
        );
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    proptest! {
        #[test]
        fn prop_offset_never_exceeds_request_or_output(
            output in 0.0f64..2_000.0,
            kwh in 0.0f64..3_000.0,
            coverage in 0.0f64..=100.0,
        ) {
            let offset = compute_solar_offset(
                &flat_series(output),
                &ConsumptionProfile::new(kwh, 0.0, 0.0),
                &solar(coverage),
            ).unwrap();
            prop_assert!(offset.monthly_offset_kwh <= offset.requested_offset_kwh);
            prop_assert!(offset.monthly_offset_kwh <= offset.avg_monthly_output_kwh);
            prop_assert!(offset.achieved_coverage_pct <= coverage + 1e-9);
        }
    }
}
