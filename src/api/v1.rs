use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{error::ApiError, health::health_check, response::ApiResponse};
use crate::{
    domain::{
        ConsumptionProfile, CostBreakdown, ElectrificationConfig, PowerMixSummary,
        ProjectionResult, RatePlan, Scenario, SolarConfig,
    },
    engine::ElectrificationResult,
    planner::{AppState, SolarOutcome},
};

type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/zip/:zip/plans", get(zip_plans))
        .route("/plans/:name/power-mix", get(power_mix))
        .route("/scenarios/baseline", post(baseline))
        .route("/scenarios/electrification", post(electrification))
        .route("/scenarios/solar", post(solar))
        .route("/projection", post(projection))
        .with_state(state)
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[derive(Debug, Serialize)]
pub struct ZipPlans {
    pub zip: String,
    pub default_plan: Option<String>,
    pub plans: Vec<RatePlan>,
}

/// Unknown ZIP codes answer with an empty plan list
pub async fn zip_plans(State(st): State<AppState>, Path(zip): Path<String>) -> ApiResult<ZipPlans> {
    let plans: Vec<RatePlan> = st
        .planner
        .available_plans(&zip)
        .into_iter()
        .cloned()
        .collect();
    let count = plans.len();
    Ok(ApiResponse::success(ZipPlans {
        zip: zip.trim().to_string(),
        default_plan: plans.first().map(|p| p.name.clone()),
        plans,
    })
    .with_count(count))
}

pub async fn power_mix(
    State(st): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<PowerMixSummary> {
    st.planner
        .power_mix(&name)
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::NotFound(format!("plan '{name}'")))
}

/// One plan under one scenario, with totals precomputed for display
#[derive(Debug, Serialize)]
pub struct CostRow {
    pub label: String,
    #[serde(flatten)]
    pub breakdown: CostBreakdown,
    pub total_cost: f64,
    pub total_emissions_kg: f64,
}

impl CostRow {
    fn new(label: String, breakdown: CostBreakdown) -> Self {
        Self {
            label,
            total_cost: breakdown.total_cost(),
            total_emissions_kg: breakdown.total_emissions_kg(),
            breakdown,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BaselineRequest {
    pub zip: String,
    pub profile: ConsumptionProfile,
}

pub async fn baseline(
    State(st): State<AppState>,
    Json(req): Json<BaselineRequest>,
) -> ApiResult<Vec<CostRow>> {
    let start = Instant::now();
    let rows: Vec<CostRow> = st
        .planner
        .compare_baseline(&req.zip, &req.profile)?
        .into_iter()
        .map(|b| CostRow::new(b.plan_name.clone(), b))
        .collect();
    let count = rows.len();
    Ok(ApiResponse::success(rows)
        .with_count(count)
        .with_duration(elapsed_ms(start)))
}

#[derive(Debug, Deserialize)]
pub struct ElectrificationRequest {
    pub zip: String,
    pub profile: ConsumptionProfile,
    #[serde(default)]
    pub config: ElectrificationConfig,
}

#[derive(Debug, Serialize)]
pub struct ElectrificationRow {
    pub plan_name: String,
    pub additional_kwh: f64,
    pub reduced_therms: f64,
    pub original: CostRow,
    pub electrified: CostRow,
}

impl From<ElectrificationResult> for ElectrificationRow {
    fn from(r: ElectrificationResult) -> Self {
        Self {
            plan_name: r.original.plan_name.clone(),
            additional_kwh: r.additional_kwh,
            reduced_therms: r.reduced_therms,
            original: CostRow::new(r.original.label(Scenario::Original), r.original),
            electrified: CostRow::new(r.electrified.label(Scenario::Electrified), r.electrified),
        }
    }
}

pub async fn electrification(
    State(st): State<AppState>,
    Json(req): Json<ElectrificationRequest>,
) -> ApiResult<Vec<ElectrificationRow>> {
    let start = Instant::now();
    let rows: Vec<ElectrificationRow> = st
        .planner
        .compare_electrification(&req.zip, &req.profile, &req.config)?
        .into_iter()
        .map(ElectrificationRow::from)
        .collect();
    let count = rows.len();
    Ok(ApiResponse::success(rows)
        .with_count(count)
        .with_duration(elapsed_ms(start)))
}

#[derive(Debug, Deserialize)]
pub struct SolarRequestBody {
    pub zip: String,
    pub profile: ConsumptionProfile,
    #[serde(default)]
    pub solar: SolarConfig,
    /// Plan priced in the projection; defaults to the ZIP's first plan
    #[serde(default)]
    pub plan: Option<String>,
}

pub async fn solar(
    State(st): State<AppState>,
    Json(req): Json<SolarRequestBody>,
) -> ApiResult<SolarOutcome> {
    let start = Instant::now();
    if let Some(name) = &req.plan {
        if st.planner.catalog().plan(name).is_none() {
            return Err(ApiError::NotFound(format!("plan '{name}'")));
        }
    }
    let outcome = st
        .planner
        .analyze_solar(&req.zip, &req.profile, &req.solar, req.plan.as_deref())
        .await?;
    Ok(ApiResponse::success(outcome).with_duration(elapsed_ms(start)))
}

/// Exactly one of a catalog plan name or an explicit price is required
#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub price_per_kwh: Option<f64>,
    pub profile: ConsumptionProfile,
    pub coverage_pct: f64,
    #[serde(default)]
    pub upfront_cost: Option<f64>,
}

pub async fn projection(
    State(st): State<AppState>,
    Json(req): Json<ProjectionRequest>,
) -> ApiResult<ProjectionResult> {
    let price = match (&req.plan, req.price_per_kwh) {
        (Some(_), Some(_)) => {
            return Err(ApiError::BadRequest(
                "give either plan or price_per_kwh, not both".to_string(),
            ))
        }
        (None, Some(price)) => price,
        (Some(name), None) => {
            st.planner
                .catalog()
                .plan(name)
                .ok_or_else(|| ApiError::NotFound(format!("plan '{name}'")))?
                .price_per_kwh
        }
        (None, None) => {
            return Err(ApiError::BadRequest(
                "either plan or price_per_kwh is required".to_string(),
            ))
        }
    };
    let result = st
        .planner
        .project(price, &req.profile, req.coverage_pct, req.upfront_cost)?;
    let count = result.years.len();
    Ok(ApiResponse::success(result).with_count(count))
}
