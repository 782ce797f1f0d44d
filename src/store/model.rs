use serde::{Deserialize, Serialize};

/// The canonical facility record as read from the geospatial store.
///
/// `location` is `None` for records the import pipeline could not geocode;
/// such records are excluded from every spatial query (§3 invariant).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub care_type: Option<String>,
    pub category: Option<String>,
    pub ayush_flag: Option<bool>,
    #[sqlx(json)]
    pub discipline: Vec<String>,
    #[sqlx(json)]
    pub specialties: Vec<String>,
    #[sqlx(json)]
    pub facilities: Vec<String>,
    pub emergency_available: Option<bool>,
    pub emergency_phone: Option<String>,
    pub ambulance_phone: Option<String>,
    pub blood_bank_phone: Option<String>,
    pub general_phone: Option<String>,
    pub total_beds: Option<i32>,
    pub postal_code: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub data_quality: f64,

    /// Populated by queries that compute it; not a stored column.
    #[sqlx(default)]
    pub distance_km: Option<f64>,
}

impl Facility {
    pub fn is_government(&self) -> bool {
        self.category
            .as_deref()
            .map(|c| {
                let lower = c.to_lowercase();
                lower.contains("gov") || lower.contains("public")
            })
            .unwrap_or(false)
    }
}

/// Aggregate counts reported by `GET /hospitals/stats`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FacilityStats {
    pub total: i64,
    pub with_coordinates: i64,
    pub emergency: i64,
    pub ayush: i64,
    pub government: i64,
    pub quality_passed: i64,
}

/// Resolved centroid plus the count of facilities it was computed from.
#[derive(Debug, Clone, Copy)]
pub struct Centroid {
    pub latitude: f64,
    pub longitude: f64,
    pub count: i64,
}

/// Filters accepted by [`crate::store::FacilityStore::nearest_within`].
#[derive(Debug, Clone, Default)]
pub struct NearestFilters {
    pub quality_threshold: f64,
    pub emergency_only: bool,
    pub specialty: Option<String>,
    pub ayush_only: bool,
}
