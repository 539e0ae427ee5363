pub mod outcome;

pub use outcome::*;

use anyhow::{Context, Result};
use std::{fs::File, sync::Arc, time::Duration};
use tracing::{info, warn};

use crate::catalog::RatePlanCatalog;
use crate::config::Config;
use crate::domain::{
    ConsumptionProfile, CostBreakdown, ElectrificationConfig, MonthlySolarSeries, PowerMixSummary,
    ProjectionResult, RatePlan, SolarConfig, ZipCode, SMALL_SLICE_THRESHOLD,
};
use crate::engine::{
    compute_baseline, compute_electrification, compute_solar_offset, ensure_valid, plan_savings,
    project_savings, system_capacity_kw, Assumptions, ElectrificationResult, EngineError,
};
use crate::external::{
    Geocoder, HttpGeocoder, PvWattsClient, SolarEstimate, SolarEstimator, SolarRequest,
    StaticGeocoder,
};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub planner: Arc<Planner>,
}

impl AppState {
    pub async fn new(cfg: Config) -> Result<Self> {
        ensure_valid(&cfg.assumptions).context("invalid planning assumptions")?;
        let catalog = Arc::new(RatePlanCatalog::load(&cfg.catalog)?);

        let solar: Arc<dyn SolarEstimator> = Arc::new(PvWattsClient::new(
            cfg.solar.base_url.clone(),
            cfg.solar.api_key.clone(),
            cfg.solar.dataset.clone(),
            Duration::from_secs(cfg.solar.http_timeout_seconds),
            Duration::from_secs(cfg.solar.cache_ttl_seconds),
        )?);

        let geocoder: Arc<dyn Geocoder> = match &cfg.geocoder.offline_csv {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("opening geocoder table {}", path.display()))?;
                Arc::new(StaticGeocoder::from_reader(file).context("parsing geocoder table")?)
            }
            None => Arc::new(HttpGeocoder::new(
                cfg.geocoder.base_url.clone(),
                Duration::from_secs(cfg.geocoder.http_timeout_seconds),
            )?),
        };

        let planner = Arc::new(Planner::new(catalog, solar, geocoder, cfg.assumptions));
        Ok(Self { cfg, planner })
    }
}

/// Runs the models for a location against the shared reference catalog.
///
/// Holds no per-request state; every call recomputes from its inputs.
pub struct Planner {
    catalog: Arc<RatePlanCatalog>,
    solar: Arc<dyn SolarEstimator>,
    geocoder: Arc<dyn Geocoder>,
    assumptions: Assumptions,
}

impl Planner {
    pub fn new(
        catalog: Arc<RatePlanCatalog>,
        solar: Arc<dyn SolarEstimator>,
        geocoder: Arc<dyn Geocoder>,
        assumptions: Assumptions,
    ) -> Self {
        Self {
            catalog,
            solar,
            geocoder,
            assumptions,
        }
    }

    pub fn catalog(&self) -> &RatePlanCatalog {
        &self.catalog
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Plans offered at `zip`; blank or unknown ZIP codes have none
    pub fn available_plans(&self, zip: &str) -> Vec<&RatePlan> {
        ZipCode::parse(zip)
            .map(|z| self.catalog.plans_for_zip(&z))
            .unwrap_or_default()
    }

    pub fn power_mix(&self, plan_name: &str) -> Option<PowerMixSummary> {
        self.catalog
            .plan(plan_name)
            .map(|p| p.power_mix.summary(SMALL_SLICE_THRESHOLD))
    }

    pub fn compare_baseline(
        &self,
        zip: &str,
        profile: &ConsumptionProfile,
    ) -> Result<Vec<CostBreakdown>, EngineError> {
        ensure_valid(profile)?;
        let gas = self.catalog.gas_tiers();
        let results: Vec<_> = self
            .available_plans(zip)
            .into_iter()
            .map(|plan| compute_baseline(plan, gas, profile))
            .collect();
        info!(zip, plans = results.len(), scenario = "baseline", "computed plan comparison");
        Ok(results)
    }

    pub fn compare_electrification(
        &self,
        zip: &str,
        profile: &ConsumptionProfile,
        config: &ElectrificationConfig,
    ) -> Result<Vec<ElectrificationResult>, EngineError> {
        ensure_valid(profile)?;
        ensure_valid(config)?;
        let gas = self.catalog.gas_tiers();
        let results = self
            .available_plans(zip)
            .into_iter()
            .map(|plan| compute_electrification(plan, gas, profile, config))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            zip,
            plans = results.len(),
            electrification_pct = config.electrification_pct,
            scenario = "electrification",
            "computed plan comparison"
        );
        Ok(results)
    }

    /// Price a solar installation at `zip`.
    ///
    /// The projection uses `plan_name` when given, otherwise the ZIP's
    /// default plan. Lookup and collaborator failures come back as
    /// [`SolarOutcome`] variants; only invalid numeric input is an error.
    pub async fn analyze_solar(
        &self,
        zip: &str,
        profile: &ConsumptionProfile,
        solar: &SolarConfig,
        plan_name: Option<&str>,
    ) -> Result<SolarOutcome, EngineError> {
        ensure_valid(profile)?;
        ensure_valid(solar)?;

        let Some(zip) = ZipCode::parse(zip) else {
            return Ok(SolarOutcome::NoPlans);
        };
        let plans = self.catalog.plans_for_zip(&zip);
        let Some(default_plan) = plans.first() else {
            return Ok(SolarOutcome::NoPlans);
        };
        let projected_plan = match plan_name {
            Some(name) => match plans.iter().find(|p| p.name == name) {
                Some(p) => *p,
                None => {
                    return Ok(SolarOutcome::PlanNotAvailable {
                        plan: name.to_string(),
                    })
                }
            },
            None => *default_plan,
        };

        let coordinates = match self.geocoder.locate(&zip).await {
            Ok(Some(c)) => c,
            Ok(None) => return Ok(SolarOutcome::LocationNotFound),
            Err(e) => {
                warn!(error = %e, %zip, "geocoding failed");
                return Ok(SolarOutcome::GeocodingFailed {
                    reason: e.to_string(),
                });
            }
        };

        let capacity_kw = system_capacity_kw(solar.roof_area_sqft, &self.assumptions.sizing);
        let estimate = if capacity_kw > 0.0 {
            let request = SolarRequest {
                coordinates,
                system_capacity_kw: capacity_kw,
                tilt_deg: solar.tilt_deg,
                azimuth_deg: solar.azimuth_deg,
                array_type: solar.array_type,
                module_type: solar.module_type,
                system_loss_pct: solar.system_loss_pct,
            };
            match self.solar.estimate(&request).await {
                Ok(estimate) => estimate,
                Err(e) => {
                    warn!(error = %e, %zip, capacity_kw, "solar estimate failed");
                    return Ok(SolarOutcome::EstimatorFailed {
                        reason: e.to_string(),
                    });
                }
            }
        } else {
            // No roof area means no array, not a failed estimate
            SolarEstimate {
                monthly: MonthlySolarSeries::zeros(),
                annual_kwh: 0.0,
            }
        };

        let offset = compute_solar_offset(&estimate.monthly, profile, solar)?;
        let savings = plans.iter().map(|p| plan_savings(p, &offset)).collect();
        let projection = project_savings(
            projected_plan.price_per_kwh,
            profile,
            offset.achieved_coverage_pct,
            &self.assumptions.projection,
        )?;

        info!(
            %zip,
            capacity_kw,
            roof_limited = offset.is_roof_limited,
            achieved_coverage_pct = offset.achieved_coverage_pct,
            payback_year = ?projection.payback_year,
            "computed solar analysis"
        );

        Ok(SolarOutcome::Estimated(Box::new(SolarAnalysis {
            coordinates,
            capacity_kw,
            monthly_output: estimate.monthly,
            annual_output_kwh: estimate.annual_kwh,
            offset,
            savings,
            projected_plan: projected_plan.name.clone(),
            projection,
        })))
    }

    /// Projection for an explicit price, with an optional capital cost override
    pub fn project(
        &self,
        price_per_kwh: f64,
        profile: &ConsumptionProfile,
        coverage_pct: f64,
        upfront_cost: Option<f64>,
    ) -> Result<ProjectionResult, EngineError> {
        let assumptions = match upfront_cost {
            Some(cost) => self.assumptions.projection.with_upfront_cost(cost),
            None => self.assumptions.projection,
        };
        project_savings(price_per_kwh, profile, coverage_pct, &assumptions)
    }
}
