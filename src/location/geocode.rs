use std::time::Duration;

use serde::Deserialize;

use crate::config::BoundingBox;

#[derive(Debug)]
pub enum GeocoderError {
    NotConfigured,
    Timeout,
    Transport(String),
    NoResult,
    LowConfidence(f64),
    OutOfBounds,
}

#[derive(Debug, Clone, Copy)]
pub struct GeocodeHit {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct PlaceIndexResponse {
    results: Vec<PlaceIndexResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceIndexResult {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    relevance: Option<f64>,
}

/// Thin client over an external, country-filtered place index. The exact
/// provider is an infrastructure decision (e.g. a managed location service
/// reachable over HTTPS); this client only assumes a JSON `{results: [...]}`
/// contract behind a configurable endpoint.
pub struct Geocoder {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
    region: String,
    index_name: Option<String>,
    timeout: Duration,
    min_confidence: f64,
}

impl Geocoder {
    pub fn new(
        endpoint: Option<String>,
        api_key: Option<String>,
        region: String,
        index_name: Option<String>,
        timeout: Duration,
    ) -> Self {
        Geocoder {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            region,
            index_name,
            timeout,
            min_confidence: 0.5,
        }
    }

    pub async fn resolve(
        &self,
        code: &str,
        country: &str,
        bbox: &BoundingBox,
    ) -> Result<GeocodeHit, GeocoderError> {
        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or(GeocoderError::NotConfigured)?;

        let mut req = self
            .client
            .get(endpoint)
            .query(&[("text", format!("{code}, {country}"))])
            .query(&[("region", self.region.as_str())]);

        if let Some(index) = &self.index_name {
            req = req.query(&[("index", index.as_str())]);
        }
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = tokio::time::timeout(self.timeout, req.send())
            .await
            .map_err(|_| GeocoderError::Timeout)?
            .map_err(|e| GeocoderError::Transport(e.to_string()))?;

        let parsed: PlaceIndexResponse = resp
            .json()
            .await
            .map_err(|e| GeocoderError::Transport(e.to_string()))?;

        let best = parsed.results.into_iter().next().ok_or(GeocoderError::NoResult)?;

        if let Some(relevance) = best.relevance {
            if relevance < self.min_confidence {
                return Err(GeocoderError::LowConfidence(relevance));
            }
        }

        if !bbox.contains(best.latitude, best.longitude) {
            return Err(GeocoderError::OutOfBounds);
        }

        Ok(GeocodeHit {
            latitude: best.latitude,
            longitude: best.longitude,
        })
    }
}
