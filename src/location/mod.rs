pub mod cache;
pub mod geocode;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use crate::config::BoundingBox;
use crate::error::AppError;
use crate::store::FacilityStore;

use cache::ResolutionCache;
use geocode::{GeocodeHit, Geocoder};
pub use types::{PostalCodeResolution, Provenance};

const COUNTRY: &str = "IN";

pub struct LocationResolver {
    store: Arc<dyn FacilityStore>,
    geocoder: Geocoder,
    cache: ResolutionCache,
    bbox: BoundingBox,
}

impl LocationResolver {
    pub fn new(
        store: Arc<dyn FacilityStore>,
        geocoder: Geocoder,
        cache_ttl: Duration,
        bbox: BoundingBox,
    ) -> Self {
        LocationResolver {
            store,
            geocoder,
            cache: ResolutionCache::new(cache_ttl),
            bbox,
        }
    }

    /// Three-strategy fallback chain (§4.3): external geocoding, then local
    /// exact centroid, then district centroid. First success wins.
    pub async fn resolve(&self, code: &str) -> Result<PostalCodeResolution, AppError> {
        if let Some(hit) = self.cache.get(code, COUNTRY).await {
            return Ok(hit);
        }

        if let Some(resolution) = self.try_external_geocode(code).await {
            self.cache.put(code, COUNTRY, resolution.clone()).await;
            return Ok(resolution);
        }

        if let Some(resolution) = self.try_local_exact_centroid(code).await? {
            self.cache.put(code, COUNTRY, resolution.clone()).await;
            return Ok(resolution);
        }

        if let Some(resolution) = self.try_district_centroid(code).await? {
            self.cache.put(code, COUNTRY, resolution.clone()).await;
            return Ok(resolution);
        }

        Err(AppError::CodeNotFound)
    }

    async fn try_external_geocode(&self, code: &str) -> Option<PostalCodeResolution> {
        match self.geocoder.resolve(code, COUNTRY, &self.bbox).await {
            Ok(GeocodeHit { latitude, longitude }) => {
                let hospital_count = self
                    .store
                    .centroid_by_postal_code(code)
                    .await
                    .ok()
                    .flatten()
                    .map(|c| c.count)
                    .unwrap_or(0);
                Some(PostalCodeResolution {
                    pincode: code.to_string(),
                    latitude,
                    longitude,
                    state: None,
                    district: None,
                    hospital_count,
                    source: Provenance::ExternalGeocode,
                })
            }
            Err(err) => {
                // Geocoder failures are recovered by strategy fallthrough;
                // the spec treats this as a logged, non-surfaced condition.
                tracing::warn!(?err, code, "geocoder strategy failed, falling through");
                None
            }
        }
    }

    async fn try_local_exact_centroid(
        &self,
        code: &str,
    ) -> Result<Option<PostalCodeResolution>, AppError> {
        let Some(centroid) = self.store.centroid_by_postal_code(code).await? else {
            return Ok(None);
        };

        let (state, district) = self
            .store
            .district_for_postal_code(code)
            .await?
            .map(|(s, d)| (Some(s), Some(d)))
            .unwrap_or((None, None));

        Ok(Some(PostalCodeResolution {
            pincode: code.to_string(),
            latitude: centroid.latitude,
            longitude: centroid.longitude,
            state,
            district,
            hospital_count: centroid.count,
            source: Provenance::LocalExactCentroid,
        }))
    }

    async fn try_district_centroid(
        &self,
        code: &str,
    ) -> Result<Option<PostalCodeResolution>, AppError> {
        let Some((state, district)) = self.store.district_for_postal_code(code).await? else {
            return Ok(None);
        };

        let Some(centroid) = self.store.centroid_by_district(&state, &district).await? else {
            return Ok(None);
        };

        Ok(Some(PostalCodeResolution {
            pincode: code.to_string(),
            latitude: centroid.latitude,
            longitude: centroid.longitude,
            state: Some(state),
            district: Some(district),
            hospital_count: centroid.count,
            source: Provenance::LocalDistrictCentroid,
        }))
    }
}

/// Validates the six-digit Indian PIN code shape required at the HTTP
/// boundary (§4.1).
pub fn is_valid_postal_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_six_digit_codes() {
        assert!(is_valid_postal_code("560001"));
        assert!(!is_valid_postal_code("56001"));
        assert!(!is_valid_postal_code("5600011"));
        assert!(!is_valid_postal_code("56O001"));
        assert!(!is_valid_postal_code(""));
    }
}
