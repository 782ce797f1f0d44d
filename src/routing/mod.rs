pub mod config;
pub mod ranking;

use std::sync::Arc;

use crate::classifier::types::SeverityLevel;
use crate::error::AppError;
use crate::store::{Facility, FacilityStore, NearestFilters};

use config::{level_config, radii_from};

#[derive(Debug, Clone)]
pub struct RoutingResult {
    pub facilities: Vec<Facility>,
    pub radius_used_km: f64,
    pub initial_radius_km: f64,
    pub was_expanded: bool,
    pub specialty_filtered: bool,
}

pub struct SeverityRouter {
    store: Arc<dyn FacilityStore>,
    quality_threshold: f64,
    min_results_before_relax: usize,
    max_radius_km: f64,
}

impl SeverityRouter {
    pub fn new(
        store: Arc<dyn FacilityStore>,
        quality_threshold: f64,
        min_results_before_relax: usize,
        max_radius_km: f64,
    ) -> Self {
        SeverityRouter {
            store,
            quality_threshold,
            min_results_before_relax,
            max_radius_km,
        }
    }

    /// Progressive-radius, two-pass search (§4.4). A store failure at one
    /// radius does not short-circuit the whole search: it is logged and the
    /// router advances to the next radius; only when every radius raises an
    /// error does the search fail.
    pub async fn search(
        &self,
        lat: f64,
        lng: f64,
        severity_level: SeverityLevel,
        specialty: Option<&str>,
    ) -> Result<RoutingResult, AppError> {
        let level_cfg = level_config(severity_level);
        let radii: Vec<f64> = radii_from(level_cfg.initial_radius_km)
            .into_iter()
            .filter(|r| *r <= self.max_radius_km)
            .collect();

        let mut last_error: Option<AppError> = None;
        let mut last_pass2: Vec<Facility> = Vec::new();
        let mut any_success = false;

        for (idx, radius_km) in radii.iter().copied().enumerate() {
            let is_last_radius = idx == radii.len() - 1;
            let radius_m = radius_km * 1000.0;

            let strict_filters = NearestFilters {
                quality_threshold: self.quality_threshold,
                emergency_only: level_cfg.prefer_emergency_available,
                specialty: specialty.map(|s| s.to_string()),
                ayush_only: false,
            };

            let pass1 = match self.store.nearest_within(lat, lng, radius_m, &strict_filters).await {
                Ok(results) => {
                    any_success = true;
                    results
                }
                Err(e) => {
                    tracing::warn!(radius_km, error = %e, "pass-1 query failed, advancing radius");
                    last_error = Some(e);
                    continue;
                }
            };

            if pass1.len() >= self.min_results_before_relax {
                return Ok(RoutingResult {
                    facilities: pass1,
                    radius_used_km: radius_km,
                    initial_radius_km: level_cfg.initial_radius_km,
                    was_expanded: radius_km > level_cfg.initial_radius_km,
                    specialty_filtered: true,
                });
            }

            let has_relaxable_filter = specialty.is_some() || level_cfg.prefer_emergency_available;
            let pass2 = if has_relaxable_filter {
                let relaxed_filters = NearestFilters {
                    quality_threshold: self.quality_threshold,
                    emergency_only: false,
                    specialty: None,
                    ayush_only: false,
                };
                match self.store.nearest_within(lat, lng, radius_m, &relaxed_filters).await {
                    Ok(results) => results,
                    Err(e) => {
                        tracing::warn!(radius_km, error = %e, "pass-2 query failed, advancing radius");
                        last_error = Some(e);
                        pass1
                    }
                }
            } else {
                pass1
            };

            if pass2.len() >= self.min_results_before_relax {
                return Ok(RoutingResult {
                    facilities: pass2,
                    radius_used_km: radius_km,
                    initial_radius_km: level_cfg.initial_radius_km,
                    was_expanded: radius_km > level_cfg.initial_radius_km,
                    specialty_filtered: false,
                });
            }

            last_pass2 = pass2;

            if is_last_radius {
                if !last_pass2.is_empty() {
                    return Ok(RoutingResult {
                        facilities: last_pass2,
                        radius_used_km: radius_km,
                        initial_radius_km: level_cfg.initial_radius_km,
                        was_expanded: radius_km > level_cfg.initial_radius_km,
                        specialty_filtered: false,
                    });
                }
            }
        }

        if let Some(err) = last_error {
            if !any_success {
                return Err(err);
            }
        }

        Ok(RoutingResult {
            facilities: Vec::new(),
            radius_used_km: self.max_radius_km,
            initial_radius_km: level_cfg.initial_radius_km,
            was_expanded: true,
            specialty_filtered: false,
        })
    }
}

pub use config::LevelConfig;

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::store::{Centroid, FacilityStats};

    struct MockStore {
        /// One result list per call, popped in order.
        responses: Mutex<Vec<Result<Vec<Facility>, String>>>,
    }

    fn facility(id: &str, distance_km: f64, emergency: bool) -> Facility {
        Facility {
            id: id.to_string(),
            name: id.to_string(),
            latitude: Some(12.0),
            longitude: Some(77.0),
            care_type: None,
            category: None,
            ayush_flag: None,
            discipline: vec![],
            specialties: vec![],
            facilities: vec![],
            emergency_available: Some(emergency),
            emergency_phone: None,
            ambulance_phone: None,
            blood_bank_phone: None,
            general_phone: None,
            total_beds: None,
            postal_code: None,
            district: None,
            state: None,
            address: None,
            data_quality: 0.9,
            distance_km: Some(distance_km),
        }
    }

    #[async_trait]
    impl FacilityStore for MockStore {
        async fn nearest_within(
            &self,
            _lat: f64,
            _lng: f64,
            _radius_m: f64,
            _filters: &NearestFilters,
        ) -> Result<Vec<Facility>, AppError> {
            let mut guard = self.responses.lock().unwrap();
            if guard.is_empty() {
                return Ok(vec![]);
            }
            match guard.remove(0) {
                Ok(v) => Ok(v),
                Err(e) => Err(AppError::StoreError(e)),
            }
        }

        async fn stats(&self) -> Result<FacilityStats, AppError> {
            Ok(FacilityStats::default())
        }

        async fn centroid_by_postal_code(&self, _code: &str) -> Result<Option<Centroid>, AppError> {
            Ok(None)
        }

        async fn centroid_by_district(
            &self,
            _state: &str,
            _district: &str,
        ) -> Result<Option<Centroid>, AppError> {
            Ok(None)
        }

        async fn district_for_postal_code(
            &self,
            _code: &str,
        ) -> Result<Option<(String, String)>, AppError> {
            Ok(None)
        }

        async fn fuzzy_name_search(
            &self,
            _query: &str,
            _state: Option<&str>,
        ) -> Result<Vec<Facility>, AppError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn pass1_sufficient_at_initial_radius() {
        let store = Arc::new(MockStore {
            responses: Mutex::new(vec![Ok(vec![
                facility("a", 1.0, false),
                facility("b", 2.0, false),
                facility("c", 3.0, false),
            ])]),
        });
        let router = SeverityRouter::new(store, 0.3, 3, 20.0);
        let result = router
            .search(12.0, 77.0, SeverityLevel::Mild, None)
            .await
            .unwrap();
        assert_eq!(result.radius_used_km, 5.0);
        assert!(result.specialty_filtered);
        assert!(!result.was_expanded);
        assert_eq!(result.facilities.len(), 3);
    }

    #[tokio::test]
    async fn expands_radius_when_pass2_insufficient() {
        let store = Arc::new(MockStore {
            responses: Mutex::new(vec![
                Ok(vec![facility("a", 1.0, false)]), // pass1 @5km: 1 result, no relaxable filter to retry
                Ok(vec![
                    facility("a", 1.0, false),
                    facility("b", 2.0, false),
                    facility("c", 3.0, false),
                ]), // pass1 @8km: 3 results
            ]),
        });
        let router = SeverityRouter::new(store, 0.3, 3, 20.0);
        let result = router
            .search(12.0, 77.0, SeverityLevel::Mild, None)
            .await
            .unwrap();
        assert_eq!(result.radius_used_km, 8.0);
        assert!(result.was_expanded);
    }

    #[tokio::test]
    async fn empty_at_max_radius_reports_max_radius_used() {
        let store = Arc::new(MockStore {
            responses: Mutex::new(vec![]),
        });
        let router = SeverityRouter::new(store, 0.3, 3, 20.0);
        let result = router
            .search(12.0, 77.0, SeverityLevel::Mild, None)
            .await
            .unwrap();
        assert_eq!(result.radius_used_km, 20.0);
        assert!(result.facilities.is_empty());
    }

    #[tokio::test]
    async fn store_error_at_one_radius_does_not_abort_expansion() {
        let store = Arc::new(MockStore {
            responses: Mutex::new(vec![
                Err("db down".to_string()),
                Err("db down".to_string()),
                Ok(vec![
                    facility("a", 1.0, false),
                    facility("b", 2.0, false),
                    facility("c", 3.0, false),
                ]),
            ]),
        });
        let router = SeverityRouter::new(store, 0.3, 3, 20.0);
        let result = router
            .search(12.0, 77.0, SeverityLevel::Mild, None)
            .await
            .unwrap();
        assert_eq!(result.radius_used_km, 12.0);
    }

    #[tokio::test]
    async fn succeeds_with_empty_result_when_only_later_radii_error() {
        let store = Arc::new(MockStore {
            responses: Mutex::new(vec![
                Ok(vec![]),                       // pass1 @5km: succeeds, 0 results
                Err("db down".to_string()),       // pass1 @8km: errors
                Err("db down".to_string()),       // pass1 @12km: errors
                Err("db down".to_string()),       // pass1 @20km: errors
            ]),
        });
        let router = SeverityRouter::new(store, 0.3, 3, 20.0);
        let result = router
            .search(12.0, 77.0, SeverityLevel::Mild, None)
            .await
            .unwrap();
        assert_eq!(result.radius_used_km, 20.0);
        assert!(result.facilities.is_empty());
    }
}
