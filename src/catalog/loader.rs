use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{info, warn};

use super::{RatePlanCatalog, ZipDirectory};
use crate::config::CatalogConfig;
use crate::domain::{GasTierPricing, PowerMix, RatePlan};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed ZIP directory: {0}")]
    Json(#[from] serde_json::Error),

    #[error("gas tier row '{0}' not found")]
    MissingGasTier(String),
}

// Column names as published in the plan reference table
#[derive(Debug, Deserialize)]
struct RawPlanRow {
    plan: String,
    price_per_kwh: f64,
    emissions_g_per_kwh: f64,
    #[serde(rename = "Coal")]
    coal: f64,
    #[serde(rename = "Large Hydroelectric")]
    large_hydroelectric: f64,
    #[serde(rename = "Natural Gas")]
    natural_gas: f64,
    #[serde(rename = "Nuclear")]
    nuclear: f64,
    #[serde(rename = "Non-Renewable_Others")]
    non_renewable_other: f64,
    #[serde(rename = "Unspecified Power")]
    unspecified: f64,
    #[serde(rename = "Biomass & Biowaste")]
    biomass_and_biowaste: f64,
    #[serde(rename = "Geothermal")]
    geothermal: f64,
    #[serde(rename = "Eligible Hydrelectric")]
    eligible_hydroelectric: f64,
    #[serde(rename = "Solar")]
    solar: f64,
    #[serde(rename = "Wind")]
    wind: f64,
    #[serde(rename = "Renewable_Others")]
    renewable_other: f64,
}

impl From<RawPlanRow> for RatePlan {
    fn from(r: RawPlanRow) -> Self {
        RatePlan {
            name: r.plan.trim().to_string(),
            price_per_kwh: r.price_per_kwh,
            emissions_g_per_kwh: r.emissions_g_per_kwh,
            power_mix: PowerMix {
                coal: r.coal,
                large_hydroelectric: r.large_hydroelectric,
                natural_gas: r.natural_gas,
                nuclear: r.nuclear,
                non_renewable_other: r.non_renewable_other,
                unspecified: r.unspecified,
                biomass_and_biowaste: r.biomass_and_biowaste,
                geothermal: r.geothermal,
                eligible_hydroelectric: r.eligible_hydroelectric,
                solar: r.solar,
                wind: r.wind,
                renewable_other: r.renewable_other,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawGasRow {
    plan: String,
    price_per_therm: f64,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

pub fn read_rate_plans<R: Read>(reader: R) -> Result<Vec<RatePlan>, CatalogError> {
    csv_reader(reader)
        .deserialize::<RawPlanRow>()
        .map(|row| Ok(row?.into()))
        .collect()
}

pub fn read_gas_tiers<R: Read>(
    reader: R,
    baseline_row: &str,
    excess_row: &str,
) -> Result<GasTierPricing, CatalogError> {
    let rows: HashMap<String, f64> = csv_reader(reader)
        .deserialize::<RawGasRow>()
        .map(|row| row.map(|r| (r.plan.trim().to_string(), r.price_per_therm)))
        .collect::<Result<_, _>>()?;

    let price = |name: &str| {
        rows.get(name)
            .copied()
            .ok_or_else(|| CatalogError::MissingGasTier(name.to_string()))
    };
    Ok(GasTierPricing {
        baseline_price_per_therm: price(baseline_row)?,
        excess_price_per_therm: price(excess_row)?,
    })
}

pub fn read_zip_directory<R: Read>(reader: R) -> Result<ZipDirectory, CatalogError> {
    let entries: HashMap<String, Vec<String>> = serde_json::from_reader(reader)?;
    Ok(ZipDirectory::from_entries(entries))
}

/// ZIP → provider rows; the first two columns are used whatever their headers
pub fn read_provider_assignments<R: Read>(
    reader: R,
) -> Result<Vec<(String, String)>, CatalogError> {
    let mut rows = Vec::new();
    for record in csv_reader(reader).records() {
        let record = record?;
        match (record.get(0), record.get(1)) {
            (Some(zip), Some(provider)) if !zip.is_empty() => {
                rows.push((zip.to_string(), provider.to_string()))
            }
            _ => warn!(?record, "skipping incomplete ZIP assignment row"),
        }
    }
    Ok(rows)
}

fn open(path: &Path) -> Result<File, CatalogError> {
    File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl RatePlanCatalog {
    /// Load every reference table named in the configuration
    pub fn load(cfg: &CatalogConfig) -> Result<Self> {
        let plans = read_rate_plans(open(&cfg.plans_csv)?)
            .with_context(|| format!("loading rate plans from {}", cfg.plans_csv.display()))?;
        let gas_tiers = read_gas_tiers(
            open(&cfg.gas_tiers_csv)?,
            &cfg.gas_baseline_row,
            &cfg.gas_excess_row,
        )
        .with_context(|| format!("loading gas tiers from {}", cfg.gas_tiers_csv.display()))?;

        let zips = if let Some(path) = &cfg.zip_directory_json {
            read_zip_directory(open(path)?)
                .with_context(|| format!("loading ZIP directory from {}", path.display()))?
        } else if let Some(path) = &cfg.zip_providers_csv {
            let assignments = read_provider_assignments(open(path)?)
                .with_context(|| format!("loading ZIP providers from {}", path.display()))?;
            ZipDirectory::from_provider_assignments(
                assignments,
                &cfg.provider_plans,
                &cfg.default_plans,
            )
        } else {
            warn!("no ZIP directory configured; every ZIP will report no plans");
            ZipDirectory::default()
        };

        info!(
            plans = plans.len(),
            zips = zips.len(),
            baseline_price = gas_tiers.baseline_price_per_therm,
            excess_price = gas_tiers.excess_price_per_therm,
            "reference catalog loaded"
        );
        Ok(Self::new(plans, gas_tiers, zips))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ZipCode;

    const PLANS: &str = "\
plan,price_per_kwh,emissions_g_per_kwh,Coal,Large Hydroelectric,Natural Gas,Nuclear,Non-Renewable_Others,Unspecified Power,Biomass & Biowaste,Geothermal,Eligible Hydrelectric,Solar,Wind,Renewable_Others
PG&E Base Plan,0.40,190.5,0,0.04,0.06,0.38,0,0.12,0.04,0.04,0.02,0.18,0.12,0
SVCE GreenPrime, 0.36 ,0,0,0,0,0,0,0,0,0,0,0.5,0.5,0
";

    const GAS: &str = "\
plan,price_per_therm
PG&E Baseline,2.10
PG&E Excess,2.55
";

    #[test]
    fn test_read_rate_plans() {
        let plans = read_rate_plans(PLANS.as_bytes()).unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].name, "PG&E Base Plan");
        assert_eq!(plans[0].emissions_g_per_kwh, 190.5);
        assert_eq!(plans[0].power_mix.nuclear, 0.38);
        assert_eq!(plans[1].price_per_kwh, 0.36);
        assert_eq!(plans[1].power_mix.wind, 0.5);
    }

    #[test]
    fn test_malformed_plan_row_is_an_error() {
        let bad = "plan,price_per_kwh\nBroken,abc\n";
        assert!(matches!(read_rate_plans(bad.as_bytes()), Err(CatalogError::Csv(_))));
    }

    #[test]
    fn test_read_gas_tiers_by_row_name() {
        let tiers = read_gas_tiers(GAS.as_bytes(), "PG&E Baseline", "PG&E Excess").unwrap();
        assert_eq!(tiers.baseline_price_per_therm, 2.10);
        assert_eq!(tiers.excess_price_per_therm, 2.55);
    }

    #[test]
    fn test_missing_gas_tier_row() {
        let err = read_gas_tiers(GAS.as_bytes(), "baseline", "excess").unwrap_err();
        assert!(matches!(err, CatalogError::MissingGasTier(name) if name == "baseline"));
    }

    #[test]
    fn test_read_zip_directory() {
        let json = r#"{"94301": ["SVCE GreenStart", "PG&E Base Plan"], " 95014 ": []}"#;
        let dir = read_zip_directory(json.as_bytes()).unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.lookup(&ZipCode::parse("94301").unwrap()).len(), 2);
        assert!(dir.lookup(&ZipCode::parse("95014").unwrap()).is_empty());
    }

    #[test]
    fn test_read_provider_assignments_uses_first_columns() {
        let csv = "ZIP,CCA,County\n94301,Silicon Valley Clean Energy,Santa Clara\n,Orphan,None\n";
        let rows = read_provider_assignments(csv.as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![("94301".to_string(), "Silicon Valley Clean Energy".to_string())]
        );
    }

    #[test]
    fn test_missing_file_is_reported_with_path() {
        let err = open(Path::new("/nonexistent/plans.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/plans.csv"));
    }
}
