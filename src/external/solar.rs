use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::{ArrayType, Coordinates, ModuleType, MonthlySolarSeries};

/// System parameters sent to the solar estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarRequest {
    pub coordinates: Coordinates,
    pub system_capacity_kw: f64,
    pub tilt_deg: f64,
    pub azimuth_deg: f64,
    pub array_type: ArrayType,
    pub module_type: ModuleType,
    pub system_loss_pct: f64,
}

impl SolarRequest {
    fn cache_key(&self) -> String {
        format!(
            "{:.4}:{:.4}:{:.3}:{:.1}:{:.1}:{}:{}:{:.1}",
            self.coordinates.latitude,
            self.coordinates.longitude,
            self.system_capacity_kw,
            self.tilt_deg,
            self.azimuth_deg,
            self.array_type,
            self.module_type,
            self.system_loss_pct
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarEstimate {
    pub monthly: MonthlySolarSeries,
    pub annual_kwh: f64,
}

#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("solar estimator unreachable: {0}")]
    Unreachable(String),

    #[error("solar estimator returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("solar estimator rejected the request: {}", .0.join("; "))]
    Rejected(Vec<String>),

    #[error("malformed solar estimator response: {0}")]
    Malformed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SolarEstimator: Send + Sync {
    async fn estimate(&self, request: &SolarRequest) -> Result<SolarEstimate, EstimatorError>;
}

/// Client for a PVWatts v8 compatible endpoint
#[derive(Clone)]
pub struct PvWattsClient {
    base_url: String,
    dataset: String,
    client: reqwest::Client,
    cache: Arc<RwLock<HashMap<String, (Instant, SolarEstimate)>>>,
    ttl: Duration,
}

impl PvWattsClient {
    pub fn new(
        base_url: String,
        api_key: String,
        dataset: String,
        timeout: Duration,
        ttl: Duration,
    ) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("home-energy-planner/0.1"),
        );
        // Kept out of the URL so transport errors cannot echo it
        let mut key = HeaderValue::from_str(&api_key)?;
        key.set_sensitive(true);
        headers.insert(HeaderName::from_static("x-api-key"), key);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            base_url,
            dataset,
            client,
            cache: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        })
    }

    fn url(&self) -> String {
        format!("{}/api/pvwatts/v8.json", self.base_url.trim_end_matches('/'))
    }

    async fn fetch(&self, request: &SolarRequest) -> Result<SolarEstimate, EstimatorError> {
        let query: Vec<(&str, String)> = vec![
            ("lat", request.coordinates.latitude.to_string()),
            ("lon", request.coordinates.longitude.to_string()),
            ("system_capacity", request.system_capacity_kw.to_string()),
            ("tilt", request.tilt_deg.to_string()),
            ("azimuth", request.azimuth_deg.to_string()),
            ("array_type", request.array_type.code().to_string()),
            ("module_type", request.module_type.code().to_string()),
            ("losses", request.system_loss_pct.to_string()),
            ("dataset", self.dataset.clone()),
            ("timeframe", "monthly".to_string()),
        ];

        let url = self.url();
        debug!(%url, capacity_kw = request.system_capacity_kw, "requesting solar estimate");
        let resp = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| EstimatorError::Unreachable(e.without_url().to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| EstimatorError::Unreachable(e.without_url().to_string()))?;

        // Validation failures come back as 422 with a JSON error list
        let parsed: Option<PvWattsResponse> = serde_json::from_str(&body).ok();
        if let Some(errors) = parsed.as_ref().map(|p| &p.errors).filter(|e| !e.is_empty()) {
            warn!(status = status.as_u16(), ?errors, "solar estimator rejected request");
            return Err(EstimatorError::Rejected(errors.clone()));
        }
        if !status.is_success() {
            warn!(status = status.as_u16(), "solar estimator HTTP error");
            return Err(EstimatorError::Http {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let outputs = parsed
            .ok_or_else(|| EstimatorError::Malformed("response is not valid JSON".to_string()))?
            .outputs
            .ok_or_else(|| EstimatorError::Malformed("missing outputs".to_string()))?;
        let monthly = MonthlySolarSeries::try_from(outputs.ac_monthly)
            .map_err(|e| EstimatorError::Malformed(e.to_string()))?;

        Ok(SolarEstimate {
            monthly,
            annual_kwh: outputs.ac_annual,
        })
    }
}

#[async_trait]
impl SolarEstimator for PvWattsClient {
    async fn estimate(&self, request: &SolarRequest) -> Result<SolarEstimate, EstimatorError> {
        let key = request.cache_key();
        {
            let c = self.cache.read().await;
            if let Some((ts, estimate)) = c.get(&key) {
                if ts.elapsed() < self.ttl {
                    return Ok(*estimate);
                }
            }
        }

        let estimate = self.fetch(request).await?;
        info!(
            lat = request.coordinates.latitude,
            lon = request.coordinates.longitude,
            annual_kwh = estimate.annual_kwh,
            "solar estimate retrieved"
        );

        let mut c = self.cache.write().await;
        c.retain(|_, (ts, _)| ts.elapsed() < self.ttl);
        c.insert(key, (Instant::now(), estimate));
        Ok(estimate)
    }
}

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Upstream bodies end up in client-facing failure reasons
fn truncate_body(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(MAX_ERROR_BODY_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[derive(Debug, Deserialize)]
struct PvWattsResponse {
    #[serde(default)]
    errors: Vec<String>,
    outputs: Option<PvWattsOutputs>,
}

#[derive(Debug, Deserialize)]
struct PvWattsOutputs {
    ac_monthly: Vec<f64>,
    ac_annual: f64,
}
