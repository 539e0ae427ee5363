use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Generation sources reported in a plan's power content label.
///
/// The first six are non-renewable, the remaining six renewable. The order
/// matches the columns of the rate-plan reference table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum PowerSource {
    #[strum(serialize = "Coal")]
    Coal,
    #[strum(serialize = "Large Hydroelectric")]
    LargeHydroelectric,
    #[strum(serialize = "Natural Gas")]
    NaturalGas,
    #[strum(serialize = "Nuclear")]
    Nuclear,
    #[strum(serialize = "Non-Renewable Other")]
    NonRenewableOther,
    #[strum(serialize = "Unspecified")]
    Unspecified,
    #[strum(serialize = "Biomass & Biowaste")]
    BiomassAndBiowaste,
    #[strum(serialize = "Geothermal")]
    Geothermal,
    #[strum(serialize = "Eligible Hydroelectric")]
    EligibleHydroelectric,
    #[strum(serialize = "Solar")]
    Solar,
    #[strum(serialize = "Wind")]
    Wind,
    #[strum(serialize = "Renewable Other")]
    RenewableOther,
}

impl PowerSource {
    pub fn is_renewable(&self) -> bool {
        matches!(
            self,
            Self::BiomassAndBiowaste
                | Self::Geothermal
                | Self::EligibleHydroelectric
                | Self::Solar
                | Self::Wind
                | Self::RenewableOther
        )
    }
}

/// Fraction of a plan's supply coming from each source (nominally sums to 1.0)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerMix {
    pub coal: f64,
    pub large_hydroelectric: f64,
    pub natural_gas: f64,
    pub nuclear: f64,
    pub non_renewable_other: f64,
    pub unspecified: f64,
    pub biomass_and_biowaste: f64,
    pub geothermal: f64,
    pub eligible_hydroelectric: f64,
    pub solar: f64,
    pub wind: f64,
    pub renewable_other: f64,
}

/// Sources below this share are folded into an "other" slice
pub const SMALL_SLICE_THRESHOLD: f64 = 0.03;

impl PowerMix {
    pub fn share(&self, source: PowerSource) -> f64 {
        match source {
            PowerSource::Coal => self.coal,
            PowerSource::LargeHydroelectric => self.large_hydroelectric,
            PowerSource::NaturalGas => self.natural_gas,
            PowerSource::Nuclear => self.nuclear,
            PowerSource::NonRenewableOther => self.non_renewable_other,
            PowerSource::Unspecified => self.unspecified,
            PowerSource::BiomassAndBiowaste => self.biomass_and_biowaste,
            PowerSource::Geothermal => self.geothermal,
            PowerSource::EligibleHydroelectric => self.eligible_hydroelectric,
            PowerSource::Solar => self.solar,
            PowerSource::Wind => self.wind,
            PowerSource::RenewableOther => self.renewable_other,
        }
    }

    /// Iterate `(source, share)` pairs in reference-table order
    pub fn iter(&self) -> impl Iterator<Item = (PowerSource, f64)> + '_ {
        PowerSource::iter().map(move |s| (s, self.share(s)))
    }

    pub fn renewable_share(&self) -> f64 {
        self.iter()
            .filter(|(s, _)| s.is_renewable())
            .map(|(_, v)| v)
            .sum()
    }

    pub fn non_renewable_share(&self) -> f64 {
        self.iter()
            .filter(|(s, _)| !s.is_renewable())
            .map(|(_, v)| v)
            .sum()
    }

    /// Summarize the mix for display.
    ///
    /// Percentages are relative to the mix total and rounded to whole
    /// numbers. Every source whose share is below `threshold` is folded into
    /// an "Other Non-Renewable" or "Other Renewable" slice, appended after the
    /// named slices.
    pub fn summary(&self, threshold: f64) -> PowerMixSummary {
        let mut slices = Vec::new();
        let mut small_non_renewable = 0.0;
        let mut small_renewable = 0.0;

        for (source, share) in self.iter() {
            if share < threshold {
                if source.is_renewable() {
                    small_renewable += share;
                } else {
                    small_non_renewable += share;
                }
            } else {
                slices.push(MixSlice {
                    label: source.to_string(),
                    share,
                    renewable: source.is_renewable(),
                });
            }
        }

        if small_non_renewable > 0.0 {
            slices.push(MixSlice {
                label: "Other Non-Renewable".to_string(),
                share: small_non_renewable,
                renewable: false,
            });
        }
        if small_renewable > 0.0 {
            slices.push(MixSlice {
                label: "Other Renewable".to_string(),
                share: small_renewable,
                renewable: true,
            });
        }

        let renewable = self.renewable_share();
        let non_renewable = self.non_renewable_share();
        let total = renewable + non_renewable;
        let (renewable_pct, non_renewable_pct) = if total > 0.0 {
            (
                (renewable / total * 100.0).round(),
                (non_renewable / total * 100.0).round(),
            )
        } else {
            (0.0, 0.0)
        };

        PowerMixSummary {
            renewable_pct,
            non_renewable_pct,
            slices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixSlice {
    pub label: String,
    pub share: f64,
    pub renewable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerMixSummary {
    pub renewable_pct: f64,
    pub non_renewable_pct: f64,
    pub slices: Vec<MixSlice>,
}

/// Electricity rate plan reference row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePlan {
    pub name: String,
    pub price_per_kwh: f64,
    pub emissions_g_per_kwh: f64,
    pub power_mix: PowerMix,
}

/// Two-tier gas schedule; excess pricing applies above the monthly allowance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasTierPricing {
    pub baseline_price_per_therm: f64,
    pub excess_price_per_therm: f64,
}
