use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::catalog::RatePlanCatalog;
use crate::planner::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    catalog: ComponentHealth,
}

/// Health status of a component
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    plans: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    zip_codes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ComponentHealth {
    fn healthy(plans: usize, zip_codes: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            plans: Some(plans),
            zip_codes: Some(zip_codes),
            error: None,
        }
    }

    fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            plans: None,
            zip_codes: None,
            error: Some(error),
        }
    }
}

/// GET /healthz
///
/// Degraded when the reference catalog has no plans or no ZIP codes, since
/// every scenario would come back empty.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = check_catalog(state.planner.catalog());
    let all_healthy = catalog.status == "healthy";

    let response = HealthResponse {
        status: if all_healthy {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        timestamp: chrono::Utc::now(),
        checks: HealthChecks { catalog },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

fn check_catalog(catalog: &RatePlanCatalog) -> ComponentHealth {
    let plans = catalog.plans().len();
    let zip_codes = catalog.zip_directory().len();
    if plans == 0 {
        ComponentHealth::unhealthy("no rate plans loaded".to_string())
    } else if zip_codes == 0 {
        ComponentHealth::unhealthy("ZIP directory is empty".to_string())
    } else {
        ComponentHealth::healthy(plans, zip_codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{tests::sample_catalog, ZipDirectory};
    use crate::domain::GasTierPricing;

    #[test]
    fn test_loaded_catalog_is_healthy() {
        let health = check_catalog(&sample_catalog());
        assert_eq!(health.status, "healthy");
        assert_eq!(health.plans, Some(4));
        assert_eq!(health.zip_codes, Some(2));
        assert!(health.error.is_none());
    }

    #[test]
    fn test_empty_catalog_is_unhealthy() {
        let catalog = RatePlanCatalog::new(
            Vec::new(),
            GasTierPricing {
                baseline_price_per_therm: 1.0,
                excess_price_per_therm: 2.0,
            },
            ZipDirectory::default(),
        );
        let health = check_catalog(&catalog);
        assert_eq!(health.status, "unhealthy");
        assert!(health.plans.is_none());
        assert_eq!(health.error.as_deref(), Some("no rate plans loaded"));
    }
}
