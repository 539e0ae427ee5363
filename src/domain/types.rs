use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::EngineError;

/// Normalized postal code used to look up available plans
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZipCode(String);

impl ZipCode {
    /// Trim surrounding whitespace; blank input has no ZIP code
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

pub const MONTHS_PER_YEAR: usize = 12;

/// Modeled AC output per calendar month (kWh), January first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct MonthlySolarSeries([f64; MONTHS_PER_YEAR]);

impl MonthlySolarSeries {
    pub fn zeros() -> Self {
        Self([0.0; MONTHS_PER_YEAR])
    }

    pub fn months(&self) -> &[f64; MONTHS_PER_YEAR] {
        &self.0
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        self.total() / MONTHS_PER_YEAR as f64
    }
}

impl TryFrom<Vec<f64>> for MonthlySolarSeries {
    type Error = EngineError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        let len = values.len();
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(EngineError::MalformedSeries { len });
        }
        let months: [f64; MONTHS_PER_YEAR] = values
            .try_into()
            .map_err(|_| EngineError::MalformedSeries { len })?;
        Ok(Self(months))
    }
}

impl From<MonthlySolarSeries> for Vec<f64> {
    fn from(series: MonthlySolarSeries) -> Self {
        series.0.to_vec()
    }
}
