pub mod model;
pub mod postgres;

use async_trait::async_trait;

pub use model::{Centroid, Facility, FacilityStats, NearestFilters};

use crate::error::AppError;

/// Minimum operation set the severity router and location resolver need
/// from the backing geospatial store (§4.5). The adapter is the only layer
/// aware of spatial SQL; everything above it speaks this trait.
#[async_trait]
pub trait FacilityStore: Send + Sync {
    async fn nearest_within(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
        filters: &NearestFilters,
    ) -> Result<Vec<Facility>, AppError>;

    async fn stats(&self) -> Result<FacilityStats, AppError>;

    async fn centroid_by_postal_code(&self, code: &str) -> Result<Option<Centroid>, AppError>;

    async fn centroid_by_district(
        &self,
        state: &str,
        district: &str,
    ) -> Result<Option<Centroid>, AppError>;

    /// Returns the `(state, district)` pair for any facility sharing `code`,
    /// used to seed the district-centroid fallback (§4.3 strategy 3).
    async fn district_for_postal_code(
        &self,
        code: &str,
    ) -> Result<Option<(String, String)>, AppError>;

    async fn fuzzy_name_search(
        &self,
        query: &str,
        state: Option<&str>,
    ) -> Result<Vec<Facility>, AppError>;
}
