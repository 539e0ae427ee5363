use serde::Serialize;
use validator::Validate;

use super::{EngineError, ProjectionAssumptions};
use crate::domain::{ConsumptionProfile, ProjectionResult};

const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Validate)]
struct ProjectionInputs {
    #[validate(range(min = 0.0, message = "electricity price cannot be negative"))]
    price_per_kwh: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    coverage_pct: f64,
    #[validate(range(min = 0.0, message = "upfront cost cannot be negative"))]
    upfront_cost: f64,
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    panel_degradation: f64,
    #[validate(range(exclusive_min = 0.0))]
    discount_rate: f64,
    #[validate(range(min = 1, max = 100))]
    horizon_years: u32,
}

/// One year of the projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionYear {
    pub year: u32,
    pub annual_cost_with_solar: f64,
    pub annual_cost_without_solar: f64,
}

/// Yearly electricity bills with and without solar.
///
/// Solar output shrinks by the degradation factor every year while the rate
/// grows by the net escalation factor; both compound from year one.
pub fn annual_costs(
    price_per_kwh: f64,
    monthly_kwh: f64,
    coverage_pct: f64,
    assumptions: &ProjectionAssumptions,
) -> Vec<ProjectionYear> {
    let annual_bill = monthly_kwh * price_per_kwh * MONTHS_PER_YEAR;
    let coverage = coverage_pct / 100.0;
    let escalation = assumptions.net_escalation();

    let mut rate_factor = 1.0;
    let mut output_factor = 1.0;
    (1..=assumptions.horizon_years)
        .map(|year| {
            rate_factor *= escalation;
            output_factor *= assumptions.panel_degradation;
            ProjectionYear {
                year,
                annual_cost_with_solar: annual_bill
                    * (1.0 - coverage * output_factor)
                    * rate_factor,
                annual_cost_without_solar: annual_bill * rate_factor,
            }
        })
        .collect()
}

/// Amortize a solar installation over the projection horizon.
///
/// The upfront cost is charged in year one. The payback year is the first
/// year in which the cumulative cost with solar drops below the cumulative
/// cost without it.
pub fn project_savings(
    plan_price_per_kwh: f64,
    profile: &ConsumptionProfile,
    achieved_coverage_pct: f64,
    assumptions: &ProjectionAssumptions,
) -> Result<ProjectionResult, EngineError> {
    super::ensure_valid(profile)?;
    let inputs = ProjectionInputs {
        price_per_kwh: plan_price_per_kwh,
        coverage_pct: achieved_coverage_pct,
        upfront_cost: assumptions.upfront_cost,
        panel_degradation: assumptions.panel_degradation,
        discount_rate: assumptions.discount_rate,
        horizon_years: assumptions.horizon_years,
    };
    for (field, value) in [
        ("price_per_kwh", inputs.price_per_kwh),
        ("coverage_pct", inputs.coverage_pct),
        ("upfront_cost", inputs.upfront_cost),
        ("rate_escalation", assumptions.rate_escalation),
    ] {
        if !value.is_finite() {
            return Err(EngineError::NonFinite { field });
        }
    }
    inputs.validate()?;

    let years = annual_costs(
        plan_price_per_kwh,
        profile.monthly_kwh,
        achieved_coverage_pct,
        assumptions,
    );

    let horizon = years.len();
    let mut result = ProjectionResult {
        years: Vec::with_capacity(horizon),
        cumulative_cost_with_solar: Vec::with_capacity(horizon),
        cumulative_cost_without_solar: Vec::with_capacity(horizon),
        payback_year: None,
        total_savings: 0.0,
    };

    let mut with_solar = assumptions.upfront_cost;
    let mut without_solar = 0.0;
    for y in &years {
        with_solar += y.annual_cost_with_solar;
        without_solar += y.annual_cost_without_solar;
        if result.payback_year.is_none() && with_solar < without_solar {
            result.payback_year = Some(y.year);
        }
        result.years.push(y.year);
        result.cumulative_cost_with_solar.push(with_solar);
        result.cumulative_cost_without_solar.push(without_solar);
    }
    result.total_savings = without_solar - with_solar;

    tracing::debug!(
        payback_year = ?result.payback_year,
        total_savings = result.total_savings,
        horizon_years = assumptions.horizon_years,
        "projected solar savings"
    );
    Ok(result)
}

/// Twenty-year projection with the default assumptions and the given capital cost
pub fn project_20_year(
    plan_price_per_kwh: f64,
    profile: &ConsumptionProfile,
    achieved_coverage_pct: f64,
    upfront_cost: f64,
) -> Result<ProjectionResult, EngineError> {
    project_savings(
        plan_price_per_kwh,
        profile,
        achieved_coverage_pct,
        &ProjectionAssumptions::default().with_upfront_cost(upfront_cost),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn profile(monthly_kwh: f64) -> ConsumptionProfile {
        ConsumptionProfile::new(monthly_kwh, 0.0, 0.0)
    }

    #[test]
    fn test_first_year_figures() {
        let years = annual_costs(0.30, 500.0, 80.0, &ProjectionAssumptions::default());
        assert_eq!(years.len(), 20);
        let factor = 1.022 / 1.04;
        let without = 500.0 * 0.30 * 12.0 * factor;
        let with = 500.0 * 0.30 * 12.0 * (1.0 - 0.8 * 0.995) * factor;
        assert!((years[0].annual_cost_without_solar - without).abs() < 1e-9);
        assert!((years[0].annual_cost_with_solar - with).abs() < 1e-9);
    }

    #[test]
    fn test_upfront_cost_charged_in_first_year_only() {
        let result = project_20_year(0.30, &profile(500.0), 80.0, 10_626.0).unwrap();
        let years = annual_costs(0.30, 500.0, 80.0, &ProjectionAssumptions::default());
        assert!(
            (result.cumulative_cost_with_solar[0] - (10_626.0 + years[0].annual_cost_with_solar)).abs()
                < 1e-6
        );
        let second_year_delta =
            result.cumulative_cost_with_solar[1] - result.cumulative_cost_with_solar[0];
        assert!((second_year_delta - years[1].annual_cost_with_solar).abs() < 1e-6);
        assert_eq!(result.years, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_payback_is_first_crossing_year() {
        let result = project_20_year(0.35, &profile(600.0), 100.0, 10_626.0).unwrap();
        let year = result.payback_year.expect("should pay back within 20 years");
        let idx = (year - 1) as usize;
        assert!(result.cumulative_cost_with_solar[idx] < result.cumulative_cost_without_solar[idx]);
        if idx > 0 {
            assert!(
                result.cumulative_cost_with_solar[idx - 1]
                    >= result.cumulative_cost_without_solar[idx - 1]
            );
        }
        let last = result.years.len() - 1;
        let expected =
            result.cumulative_cost_without_solar[last] - result.cumulative_cost_with_solar[last];
        assert!((result.total_savings - expected).abs() < 1e-9);
        assert!(result.total_savings > 0.0);
    }

    #[test]
    fn test_small_system_never_pays_back() {
        let result = project_20_year(0.10, &profile(100.0), 10.0, 10_626.0).unwrap();
        assert_eq!(result.payback_year, None);
        assert!(result.total_savings < 0.0);
    }

    #[rstest]
    #[case(-0.1, 50.0, 0.0)]
    #[case(0.3, 120.0, 0.0)]
    #[case(0.3, 50.0, -1.0)]
    fn test_invalid_inputs_are_rejected(
        #[case] price: f64,
        #[case] coverage: f64,
        #[case] upfront: f64,
    ) {
        assert!(matches!(
            project_20_year(price, &profile(500.0), coverage, upfront),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_custom_horizon() {
        let assumptions = ProjectionAssumptions {
            horizon_years: 25,
            ..Default::default()
        };
        let result = project_savings(0.3, &profile(500.0), 50.0, &assumptions).unwrap();
        assert_eq!(result.years.len(), 25);
        assert_eq!(result.cumulative_cost_with_solar.len(), 25);
    }

    #[rstest]
    #[case(0)]
    #[case(101)]
    #[case(u32::MAX)]
    fn test_horizon_outside_range_is_rejected(#[case] horizon_years: u32) {
        let assumptions = ProjectionAssumptions {
            horizon_years,
            ..Default::default()
        };
        assert!(matches!(
            project_savings(0.3, &profile(500.0), 50.0, &assumptions),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_compounding_matches_closed_form_late_in_horizon() {
        let assumptions = ProjectionAssumptions {
            horizon_years: 100,
            ..Default::default()
        };
        let years = annual_costs(0.30, 500.0, 80.0, &assumptions);
        let n = 100;
        let factor = (1.022f64 / 1.04).powi(n);
        let with = 500.0 * 0.30 * 12.0 * (1.0 - 0.8 * 0.995f64.powi(n)) * factor;
        assert!((years[99].annual_cost_with_solar - with).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_no_solar_no_cost_matches_baseline(
            price in 0.0f64..1.0,
            kwh in 0.0f64..5_000.0,
        ) {
            let result = project_20_year(price, &profile(kwh), 0.0, 0.0).unwrap();
            prop_assert_eq!(&result.cumulative_cost_with_solar, &result.cumulative_cost_without_solar);
            prop_assert_eq!(result.payback_year, None);
            prop_assert_eq!(result.total_savings, 0.0);
        }
    }
}
