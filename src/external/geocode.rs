use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::{collections::HashMap, io::Read, time::Duration};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Coordinates, ZipCode};

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoder unreachable: {0}")]
    Unreachable(String),

    #[error("geocoder returned HTTP {0}")]
    Http(u16),

    #[error("malformed geocoder response: {0}")]
    Malformed(String),
}

/// Postal code → coordinates; `Ok(None)` when the code is unknown
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn locate(&self, zip: &ZipCode) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Zippopotam-style postal code lookup (`/us/{zip}`)
pub struct HttpGeocoder {
    client: Client,
    base_url: String,
}

impl HttpGeocoder {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
        })
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn locate(&self, zip: &ZipCode) -> Result<Option<Coordinates>, GeocodeError> {
        let url = format!("{}/us/{}", self.base_url.trim_end_matches('/'), zip);
        debug!(%url, "geocoding postal code");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GeocodeError::Unreachable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), %zip, "geocoder error");
            return Err(GeocodeError::Http(response.status().as_u16()));
        }

        let body: PostalResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Malformed(e.to_string()))?;
        let Some(place) = body.places.into_iter().next() else {
            return Ok(None);
        };
        let parse = |field: &str, raw: &str| {
            raw.trim()
                .parse::<f64>()
                .map_err(|_| GeocodeError::Malformed(format!("{field} '{raw}' is not a number")))
        };
        Ok(Some(Coordinates {
            latitude: parse("latitude", &place.latitude)?,
            longitude: parse("longitude", &place.longitude)?,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct PostalResponse {
    #[serde(default)]
    places: Vec<PostalPlace>,
}

#[derive(Debug, Deserialize)]
struct PostalPlace {
    latitude: String,
    longitude: String,
}

/// In-memory lookup table, for offline deployments and tests
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    table: HashMap<String, Coordinates>,
}

#[derive(Debug, Deserialize)]
struct LocationRow {
    zip: String,
    latitude: f64,
    longitude: f64,
}

impl StaticGeocoder {
    pub fn new(table: HashMap<String, Coordinates>) -> Self {
        Self { table }
    }

    /// Read `zip,latitude,longitude` rows
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let table = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader)
            .deserialize::<LocationRow>()
            .map(|row| {
                row.map(|r| {
                    (
                        r.zip,
                        Coordinates {
                            latitude: r.latitude,
                            longitude: r.longitude,
                        },
                    )
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { table })
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn locate(&self, zip: &ZipCode) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(self.table.get(zip.as_str()).copied())
    }
}
