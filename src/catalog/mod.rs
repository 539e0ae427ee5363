//! Read-only reference data: rate plans, gas tiers and the ZIP directory.
//!
//! Loaded once at startup and shared behind an `Arc`; nothing mutates it
//! afterwards, so concurrent requests read it without coordination.

pub mod loader;
pub mod zip_directory;

pub use loader::*;
pub use zip_directory::*;

use std::collections::HashMap;

use crate::domain::{GasTierPricing, RatePlan, ZipCode};

#[derive(Debug, Clone)]
pub struct RatePlanCatalog {
    plans: Vec<RatePlan>,
    by_name: HashMap<String, usize>,
    gas_tiers: GasTierPricing,
    zips: ZipDirectory,
}

impl RatePlanCatalog {
    pub fn new(plans: Vec<RatePlan>, gas_tiers: GasTierPricing, zips: ZipDirectory) -> Self {
        let by_name = plans
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        Self {
            plans,
            by_name,
            gas_tiers,
            zips,
        }
    }

    pub fn plan(&self, name: &str) -> Option<&RatePlan> {
        self.by_name.get(name).map(|&i| &self.plans[i])
    }

    pub fn plans(&self) -> &[RatePlan] {
        &self.plans
    }

    pub fn gas_tiers(&self) -> &GasTierPricing {
        &self.gas_tiers
    }

    pub fn zip_directory(&self) -> &ZipDirectory {
        &self.zips
    }

    /// Plans offered at `zip`, in reference-table order.
    ///
    /// Unknown ZIP codes and plan names listed in the directory but missing
    /// from the plan table both yield fewer (possibly zero) plans.
    pub fn plans_for_zip(&self, zip: &ZipCode) -> Vec<&RatePlan> {
        let offered = self.zips.lookup(zip);
        self.plans
            .iter()
            .filter(|p| offered.iter().any(|name| name == &p.name))
            .collect()
    }

    /// The plan selected when the caller does not name one
    pub fn default_plan_for_zip(&self, zip: &ZipCode) -> Option<&RatePlan> {
        self.plans_for_zip(zip).into_iter().next()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::PowerMix;

    pub(crate) fn sample_catalog() -> RatePlanCatalog {
        let plan = |name: &str, price: f64, emissions: f64| RatePlan {
            name: name.to_string(),
            price_per_kwh: price,
            emissions_g_per_kwh: emissions,
            power_mix: PowerMix {
                solar: 0.5,
                natural_gas: 0.5,
                ..Default::default()
            },
        };
        let plans = vec![
            plan("PG&E Base Plan", 0.40, 200.0),
            plan("SVCE GreenStart", 0.35, 50.0),
            plan("SVCE GreenPrime", 0.36, 0.0),
            plan("PG&E 50% Solar Choice", 0.42, 100.0),
        ];
        let zips = ZipDirectory::from_entries([
            (
                "94301".to_string(),
                vec![
                    "SVCE GreenStart".to_string(),
                    "SVCE GreenPrime".to_string(),
                    "PG&E Base Plan".to_string(),
                ],
            ),
            ("95001".to_string(), vec!["Retired Plan".to_string()]),
        ]);
        RatePlanCatalog::new(
            plans,
            GasTierPricing {
                baseline_price_per_therm: 1.50,
                excess_price_per_therm: 3.00,
            },
            zips,
        )
    }

    #[test]
    fn test_plan_lookup_by_name() {
        let catalog = sample_catalog();
        assert_eq!(catalog.plan("SVCE GreenPrime").unwrap().price_per_kwh, 0.36);
        assert!(catalog.plan("Nope").is_none());
    }

    #[test]
    fn test_plans_for_zip_keep_table_order() {
        let catalog = sample_catalog();
        let zip = ZipCode::parse("94301").unwrap();
        let names: Vec<&str> = catalog
            .plans_for_zip(&zip)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["PG&E Base Plan", "SVCE GreenStart", "SVCE GreenPrime"]);
        assert_eq!(catalog.default_plan_for_zip(&zip).unwrap().name, "PG&E Base Plan");
    }

    #[test]
    fn test_unknown_zip_has_no_plans() {
        let catalog = sample_catalog();
        let zip = ZipCode::parse("10001").unwrap();
        assert!(catalog.plans_for_zip(&zip).is_empty());
        assert!(catalog.default_plan_for_zip(&zip).is_none());
    }

    #[test]
    fn test_directory_entries_without_plan_rows_are_skipped() {
        let catalog = sample_catalog();
        let zip = ZipCode::parse("95001").unwrap();
        assert!(catalog.plans_for_zip(&zip).is_empty());
    }
}
