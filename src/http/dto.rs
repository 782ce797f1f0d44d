use serde::{Deserialize, Serialize};

use crate::classifier::types::SeverityLevel;
use crate::store::Facility;

/// Wire shape for a facility: all §3 fields plus computed distance and
/// flattened coordinates, as promised by §6.
#[derive(Debug, Clone, Serialize)]
pub struct FacilityDto {
    pub id: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub care_type: Option<String>,
    pub category: Option<String>,
    pub ayush_flag: Option<bool>,
    pub discipline: Vec<String>,
    pub specialties: Vec<String>,
    pub facilities: Vec<String>,
    pub emergency_available: Option<bool>,
    pub total_beds: Option<i32>,
    pub postal_code: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub data_quality: f64,
    pub distance_km: Option<f64>,
}

impl From<Facility> for FacilityDto {
    fn from(f: Facility) -> Self {
        FacilityDto {
            id: f.id,
            name: f.name,
            latitude: f.latitude,
            longitude: f.longitude,
            care_type: f.care_type,
            category: f.category,
            ayush_flag: f.ayush_flag,
            discipline: f.discipline,
            specialties: f.specialties,
            facilities: f.facilities,
            emergency_available: f.emergency_available,
            total_beds: f.total_beds,
            postal_code: f.postal_code,
            district: f.district,
            state: f.state,
            address: f.address,
            data_quality: f.data_quality,
            distance_km: f.distance_km.map(round_km),
        }
    }
}

fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityBasedRequest {
    #[serde(default)]
    pub pincode: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub severity_level: String,
    #[serde(default)]
    pub specialties: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfigDto {
    pub level: String,
    pub initial_radius: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityBasedResponse {
    pub facilities: Vec<FacilityDto>,
    pub radius_used: f64,
    pub was_expanded: bool,
    pub specialty_filtered: bool,
    pub severity_level: String,
    pub config: LevelConfigDto,
}

#[derive(Debug, Deserialize)]
pub struct HospitalsQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius: f64,
    #[serde(default)]
    pub emergency: Option<bool>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub ayush: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalsResponse {
    pub hospitals: Vec<FacilityDto>,
    pub count: usize,
    pub radius: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

pub fn severity_level_label(level: SeverityLevel) -> &'static str {
    match level {
        SeverityLevel::Mild => "Mild",
        SeverityLevel::Moderate => "Moderate",
        SeverityLevel::High => "High",
        SeverityLevel::Emergency => "Emergency",
    }
}
