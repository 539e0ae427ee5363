use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::{collections::HashMap, net::SocketAddr, path::PathBuf};

use crate::engine::Assumptions;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub solar: SolarEstimatorConfig,
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub assumptions: Assumptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub enable_cors: bool,
}
impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

fn default_request_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub plans_csv: PathBuf,
    pub gas_tiers_csv: PathBuf,
    #[serde(default = "default_gas_baseline_row")]
    pub gas_baseline_row: String,
    #[serde(default = "default_gas_excess_row")]
    pub gas_excess_row: String,
    /// Prebuilt ZIP → plans map; takes precedence over the provider assignments
    #[serde(default)]
    pub zip_directory_json: Option<PathBuf>,
    #[serde(default)]
    pub zip_providers_csv: Option<PathBuf>,
    #[serde(default)]
    pub provider_plans: HashMap<String, Vec<String>>,
    /// Utility plans offered at every listed ZIP
    #[serde(default)]
    pub default_plans: Vec<String>,
}

fn default_gas_baseline_row() -> String { "baseline".to_string() }
fn default_gas_excess_row() -> String { "excess".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct SolarEstimatorConfig {
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_dataset")]
    pub dataset: String,
    pub http_timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
}

fn default_dataset() -> String { "nsrdb".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub http_timeout_seconds: u64,
    /// Offline ZIP → coordinates table used instead of the HTTP service
    #[serde(default)]
    pub offline_csv: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("HEP__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [catalog]
            plans_csv = "data/plan_details.csv"
            gas_tiers_csv = "data/gas_plan_details.csv"

            [solar]
            base_url = "https://developer.nrel.gov"
            api_key = "DEMO_KEY"
            http_timeout_seconds = 10
            cache_ttl_seconds = 3600

            [geocoder]
            base_url = "https://api.zippopotam.us"
            http_timeout_seconds = 5

            [assumptions.projection]
            upfront_cost = 15000.0
        "#;
        let cfg: Config = Figment::new().merge(Toml::string(toml)).extract().unwrap();
        assert_eq!(cfg.server.request_timeout_secs, 30);
        assert!(!cfg.server.enable_cors);
        assert_eq!(cfg.catalog.gas_baseline_row, "baseline");
        assert!(cfg.catalog.zip_directory_json.is_none());
        assert_eq!(cfg.solar.dataset, "nsrdb");
        assert_eq!(cfg.assumptions.projection.upfront_cost, 15000.0);
        assert_eq!(cfg.assumptions.projection.horizon_years, 20);
        assert_eq!(cfg.assumptions.sizing.sqft_per_kw, 100.0);
        assert_eq!(cfg.server.socket_addr().unwrap().port(), 8080);
    }
}
